use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::VkConfig;
use crate::error::{Error, Result};
use crate::http::build_client;
use crate::model::{Album, ItemPage, Photo, VkEnvelope};
use crate::orchestrator::PhotoSource;

/// Album id the photo API uses for an owner's wall photos.
pub const WALL_ALBUM: &str = "wall";

pub struct VkClient {
    config: VkConfig,
    client: Client,
}

impl VkClient {
    pub fn new(config: VkConfig) -> Result<VkClient> {
        Ok(VkClient {
            config,
            client: build_client()?,
        })
    }

    fn common_params(&self) -> [(&'static str, &str); 3] {
        [
            ("access_token", self.config.access_token.as_str()),
            ("v", self.config.api_version.as_str()),
            ("owner_id", self.config.owner_id.as_str()),
        ]
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(format!("{api_url}/{method}", api_url = self.config.api_url))
            .query(&self.common_params())
            .query(params)
            .send()
            .await?;

        let body = response.text().await?;
        decode_envelope(method, &body)
    }

    pub async fn list_album_ids(&self) -> Result<Vec<i64>> {
        let page: ItemPage<Album> = self.call("photos.getAlbums", &[]).await?;
        for album in &page.items {
            log::debug!(
                "album {id} '{title}' holds {size} photos",
                id = album.id,
                title = album.title.as_deref().unwrap_or_default(),
                size = album.size.unwrap_or_default()
            );
        }
        let ids = album_ids(page);

        log::info!(
            "fetched {count} albums of owner {owner}",
            count = ids.len(),
            owner = self.config.owner_id
        );
        Ok(ids)
    }

    pub async fn fetch_photos(&self, count: u32, album_id: &str) -> Result<Vec<Photo>> {
        let params = [
            ("album_id", album_id.to_string()),
            ("extended", "1".to_string()),
            ("photo_sizes", "1".to_string()),
            ("count", count.to_string()),
        ];
        let page: ItemPage<Photo> = self.call("photos.get", &params).await?;

        log::info!(
            "fetched {fetched} of {total} photos from album {album_id}",
            fetched = page.items.len(),
            total = page.count
        );
        Ok(page.items)
    }

    pub async fn fetch_bytes(&self, photo: &Photo) -> Result<Vec<u8>> {
        let url = &photo.largest_rendition()?.url;
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        log::info!(
            "downloaded {file} ({len} bytes)",
            file = photo.file_name(),
            len = bytes.len()
        );
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PhotoSource for VkClient {
    async fn list_album_ids(&self) -> Result<Vec<i64>> {
        VkClient::list_album_ids(self).await
    }

    async fn fetch_photos(&self, count: u32, album_id: &str) -> Result<Vec<Photo>> {
        VkClient::fetch_photos(self, count, album_id).await
    }

    async fn fetch_bytes(&self, photo: &Photo) -> Result<Vec<u8>> {
        VkClient::fetch_bytes(self, photo).await
    }
}

/// Unwraps the `{response}` / `{error}` body the photo API returns for `method`.
pub fn decode_envelope<T: DeserializeOwned>(method: &str, body: &str) -> Result<T> {
    let envelope = serde_json::from_str::<VkEnvelope<T>>(body).map_err(|e| {
        Error::MalformedResponse {
            endpoint: method.to_string(),
            reason: e.to_string(),
        }
    })?;

    match (envelope.response, envelope.error) {
        (_, Some(error)) => {
            log::error!(
                "{method} failed, token is not correct or album id is not valid: {code} {message}",
                code = error.code,
                message = error.message
            );
            Err(Error::AuthOrRequest {
                code: error.code,
                message: error.message,
            })
        }
        (Some(response), None) => Ok(response),
        (None, None) => Err(Error::MalformedResponse {
            endpoint: method.to_string(),
            reason: "body has neither response nor error".to_string(),
        }),
    }
}

pub fn album_ids(page: ItemPage<Album>) -> Vec<i64> {
    page.items.into_iter().map(|album| album.id).collect()
}
