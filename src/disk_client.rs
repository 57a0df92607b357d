use async_trait::async_trait;
use reqwest::{
    header,
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde::Deserialize;

use crate::config::DiskConfig;
use crate::error::{Error, Result};
use crate::http::build_client;
use crate::orchestrator::PhotoStorage;

/// Body of the upload negotiation call. Failed calls carry `error` and `message` instead of `href`.
#[derive(Deserialize, Debug)]
pub struct UploadLink {
    pub href: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

pub struct DiskClient {
    config: DiskConfig,
    client: Client,
}

impl DiskClient {
    pub fn new(config: DiskConfig) -> Result<DiskClient> {
        Ok(DiskClient {
            config,
            client: build_client()?,
        })
    }

    fn resources_url(&self) -> String {
        format!("{api_url}/v1/disk/resources", api_url = self.config.api_url)
    }

    pub async fn create_folder(&self, name: &str) -> Result<String> {
        let response = self
            .client
            .put(self.resources_url())
            .query(&[("path", name)])
            .header(header::AUTHORIZATION, self.config.auth_header())
            .send()
            .await?;

        folder_outcome(response.status(), name)
    }

    /// Negotiates an upload target for `{folder_name}/{file_name}` and transfers the bytes to it.
    pub async fn upload_file(&self, folder_name: &str, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let path = format!("{folder_name}/{file_name}");
        let href = self.negotiate_upload(&path).await?;

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self.client.put(href).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("upload of {path} failed: {status}");
            return Err(Error::UnexpectedStatus {
                status,
                context: format!("uploading {path}"),
            });
        }

        log::info!("uploaded {path}");
        Ok(())
    }

    async fn negotiate_upload(&self, path: &str) -> Result<String> {
        let overwrite = if self.config.overwrite { "true" } else { "false" };
        let response = self
            .client
            .get(format!("{resources}/upload", resources = self.resources_url()))
            .query(&[("path", path), ("overwrite", overwrite)])
            .header(header::AUTHORIZATION, self.config.auth_header())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        upload_target(status, path, &body)
    }
}

#[async_trait]
impl PhotoStorage for DiskClient {
    async fn create_folder(&self, name: &str) -> Result<String> {
        DiskClient::create_folder(self, name).await
    }

    async fn upload_file(&self, folder_name: &str, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        DiskClient::upload_file(self, folder_name, file_name, bytes).await
    }
}

pub fn folder_outcome(status: StatusCode, name: &str) -> Result<String> {
    match status {
        StatusCode::OK | StatusCode::CREATED => {
            log::info!("folder {name} is created");
            Ok(name.to_string())
        }
        StatusCode::CONFLICT => {
            log::error!("the folder {name} already exists");
            Err(Error::FolderExists(name.to_string()))
        }
        _ => {
            log::error!("creating folder {name} failed: {status}");
            Err(Error::UnexpectedStatus {
                status,
                context: format!("creating folder {name}"),
            })
        }
    }
}

/// Maps the negotiation reply to an upload href. A 409 means the file is already on the disk.
pub fn upload_target(status: StatusCode, path: &str, body: &str) -> Result<String> {
    if status == StatusCode::CONFLICT {
        log::warn!("file {path} already exists");
        return Err(Error::FileExists(path.to_string()));
    }
    upload_href(path, body)
}

pub fn upload_href(path: &str, body: &str) -> Result<String> {
    let link = serde_json::from_str::<UploadLink>(body).map_err(|e| Error::MissingUploadHref {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    match link.href {
        Some(href) => Ok(href),
        None => {
            let reason = link
                .message
                .or(link.error)
                .unwrap_or_else(|| "href is absent".to_string());
            log::error!("upload negotiation for {path} failed: {reason}");
            Err(Error::MissingUploadHref {
                path: path.to_string(),
                reason,
            })
        }
    }
}
