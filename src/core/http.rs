use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

pub const APP_USER_AGENT: &str = "ModRefresh/0.1.0";

/// Shared client for registry queries and release downloads.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(user_agent)
        .default_headers(default_headers)
        .build()
}
