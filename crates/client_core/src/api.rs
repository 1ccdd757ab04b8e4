//! Palette API collaborators: the trait the controller depends on and its
//! reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{FolderId, PaletteId},
    error::ApiErrorBody,
    protocol::{RawFolder, RawPalette},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PALETTES_PATH: &str = "api/v1/palettes";
const FOLDERS_PATH: &str = "api/v1/folders";

#[async_trait]
pub trait PaletteApi: Send + Sync {
    async fn get_palettes(&self) -> Result<Vec<RawPalette>, ClientError>;
    async fn get_folders(&self) -> Result<Vec<RawFolder>, ClientError>;
    async fn delete_palette(&self, id: PaletteId) -> Result<(), ClientError>;
    async fn delete_folder(&self, id: FolderId) -> Result<(), ClientError>;
}

pub struct MissingPaletteApi;

#[async_trait]
impl PaletteApi for MissingPaletteApi {
    async fn get_palettes(&self) -> Result<Vec<RawPalette>, ClientError> {
        Err(ClientError::Unavailable(
            "no palette api configured".to_string(),
        ))
    }

    async fn get_folders(&self) -> Result<Vec<RawFolder>, ClientError> {
        Err(ClientError::Unavailable(
            "no palette api configured".to_string(),
        ))
    }

    async fn delete_palette(&self, id: PaletteId) -> Result<(), ClientError> {
        Err(ClientError::Unavailable(format!(
            "no palette api configured to delete palette {id}"
        )))
    }

    async fn delete_folder(&self, id: FolderId) -> Result<(), ClientError> {
        Err(ClientError::Unavailable(format!(
            "no palette api configured to delete folder {id}"
        )))
    }
}

pub struct HttpPaletteApi {
    http: Client,
    base_url: Url,
}

impl HttpPaletteApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        debug!(%url, "palette api GET");
        let response = self.http.get(url).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.endpoint(path)?;
        debug!(%url, "palette api DELETE");
        let response = self.http.delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PaletteApi for HttpPaletteApi {
    async fn get_palettes(&self) -> Result<Vec<RawPalette>, ClientError> {
        self.get_json(PALETTES_PATH).await
    }

    async fn get_folders(&self) -> Result<Vec<RawFolder>, ClientError> {
        self.get_json(FOLDERS_PATH).await
    }

    async fn delete_palette(&self, id: PaletteId) -> Result<(), ClientError> {
        self.delete(&format!("{PALETTES_PATH}/{id}")).await
    }

    async fn delete_folder(&self, id: FolderId) -> Result<(), ClientError> {
        self.delete(&format!("{FOLDERS_PATH}/{id}")).await
    }
}

/// `Url::join` drops the last path segment unless it ends with `/`, so a base
/// like `http://host/picker` must be normalized before endpoints are joined.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Ok(Url::parse(&format!("{trimmed}/"))?)
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
