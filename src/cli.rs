use clap::{Parser, Subcommand};

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// OAuth2 login flow
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Fetch and print feed pages
    Feed {
        /// Number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Toggle the like state of a photo in the loaded feed
    Like {
        /// Id of the photo to toggle
        photo_id: String,
        /// The photo's current like state, toggled away from
        #[arg(long)]
        liked: bool,
    },
    /// Show the authenticated user's profile and avatar URL
    Profile,
    /// Clear the stored session
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Print the authorize URL to open in a browser
    Url,
    /// Exchange an authorization code for a bearer token
    Exchange {
        /// The code from the redirect URL
        #[arg(short, long)]
        code: String,
    },
}
