/// A user profile as shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub name: String,
    pub login_name: String,
    pub bio: String,
}

impl Profile {
    /// Builds a profile from the optional fields the API returns.
    ///
    /// The display name joins the non-empty parts of `first_name` and
    /// `last_name` with a single space; `login_name` is the username
    /// prefixed with `@`.
    pub fn new(
        username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        bio: Option<String>,
    ) -> Self {
        let username = username.unwrap_or_default();
        let name = [first_name, last_name]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            login_name: format!("@{username}"),
            username,
            name,
            bio: bio.unwrap_or_default(),
        }
    }
}
