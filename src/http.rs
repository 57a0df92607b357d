use reqwest::{header, Client};

use crate::error::Result;

const USER_AGENT: &str = concat!("vk_photo_backup/", env!("CARGO_PKG_VERSION"));

/// Client shared by both APIs. Credentials are added per request.
pub fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(USER_AGENT),
    );

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .build()?)
}
