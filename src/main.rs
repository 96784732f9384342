#![deny(warnings)]

use clap::Parser;
use color_eyre::eyre::Result;
use std::sync::Arc;

use splashfeed::{
    api::transport::{HttpTransport, ReqwestTransport},
    cli::{AuthCommand, Cli, Command},
    config::Config,
    services::{AvatarService, FeedPager, FeedService, LogoutService, OAuth2Service, ProfileService},
    token::{FileTokenStore, TokenStore},
    utils::{get_data_dir, initialize_logging, initialize_panic_handler},
};

struct Services {
    token_store: Arc<dyn TokenStore>,
    oauth: OAuth2Service,
    feed: Arc<FeedService>,
    profile: Arc<ProfileService>,
    avatar: Arc<AvatarService>,
}

fn build_services(config: &Config) -> Result<Services> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config.request_timeout())?);
    let token_store: Arc<dyn TokenStore> =
        Arc::new(FileTokenStore::new(get_data_dir().join("token")));
    let api_base = config.api_base()?;

    let oauth = OAuth2Service::new(
        Arc::clone(&transport),
        Arc::clone(&token_store),
        config.auth_configuration()?,
    );
    let feed = Arc::new(FeedService::new(
        Arc::clone(&transport),
        Arc::clone(&token_store),
        api_base.clone(),
        config.page_size,
    ));
    let profile = Arc::new(ProfileService::new(
        Arc::clone(&transport),
        Arc::clone(&token_store),
        api_base.clone(),
    ));
    let avatar = Arc::new(AvatarService::new(
        Arc::clone(&transport),
        Arc::clone(&token_store),
        api_base,
    ));

    Ok(Services {
        token_store,
        oauth,
        feed,
        profile,
        avatar,
    })
}

async fn run_feed(services: &Services, pages: u32) -> Result<()> {
    let mut pager = FeedPager::new(Arc::clone(&services.feed));
    pager.start().await?;
    for _ in 1..pages {
        services.feed.fetch_next_page().await?;
    }

    if let Some(range) = pager.appended_range().await {
        println!("Loaded photos {}..{}", range.start, range.end);
    }
    for photo in services.feed.photos().await {
        let liked = if photo.is_liked { "♥" } else { " " };
        let description = photo.description.unwrap_or_default();
        println!("{liked} {}  {}", photo.id, description);
    }
    Ok(())
}

async fn run_command(services: &Services, command: Command) -> Result<()> {
    match command {
        Command::Auth { command } => match command {
            AuthCommand::Url => {
                println!("{}", services.oauth.authorize_url());
            }
            AuthCommand::Exchange { code } => {
                services.oauth.exchange_code(&code).await?;
                println!("Logged in; token stored.");
            }
        },
        Command::Feed { pages } => run_feed(services, pages).await?,
        Command::Like { photo_id, liked } => {
            services.feed.set_liked(&photo_id, liked).await?;
            println!("Like state updated for {photo_id}");
        }
        Command::Profile => {
            let profile = services.profile.fetch_profile().await?;
            println!("{} ({})", profile.name, profile.login_name);
            if !profile.bio.is_empty() {
                println!("{}", profile.bio);
            }
            if !profile.username.is_empty() {
                let avatar_url = services.avatar.fetch_avatar_url(&profile.username).await?;
                println!("Avatar: {avatar_url}");
            }
        }
        Command::Logout => {
            let logout = LogoutService::new(
                Arc::clone(&services.token_store),
                Arc::clone(&services.feed),
                Arc::clone(&services.profile),
                Arc::clone(&services.avatar),
            );
            logout.logout().await;
            println!("Session cleared.");
        }
    }
    Ok(())
}

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    // Load configuration (file-based)
    let config = Config::new()?;

    let services = build_services(&config)?;
    run_command(&services, args.command).await
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}
