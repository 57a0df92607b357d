use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metadata::PhotoMetadata;

/// Top level body of every photo API call, either `response` or `error` is set.
#[derive(Deserialize)]
pub struct VkEnvelope<T> {
    pub response: Option<T>,
    pub error: Option<VkApiError>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct VkApiError {
    #[serde(rename = "error_code")]
    pub code: i64,
    #[serde(rename = "error_msg", default)]
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ItemPage<T> {
    #[serde(default)]
    pub count: i64,
    pub items: Vec<T>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Album {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Photo {
    pub id: i64,
    #[serde(default)]
    pub likes: Likes,
    pub sizes: Vec<PhotoSize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Likes {
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PhotoSize {
    #[serde(rename = "type")]
    pub size_type: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
}

impl PhotoSize {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Photo {
    /// The rendition with the most pixels. On a tie the earliest one in API order wins.
    pub fn largest_rendition(&self) -> Result<&PhotoSize> {
        self.sizes
            .iter()
            .reduce(|best, size| if size.area() > best.area() { size } else { best })
            .ok_or(Error::MalformedPhoto { photo_id: self.id })
    }

    pub fn like_count(&self) -> i64 {
        self.likes.count
    }

    pub fn photo_id(&self) -> i64 {
        self.id
    }

    pub fn file_name(&self) -> String {
        let likes = self.like_count();
        let id = self.photo_id();
        format!("{likes}_{id}.jpg")
    }

    pub fn metadata(&self) -> Result<PhotoMetadata> {
        let largest = self.largest_rendition()?;
        Ok(PhotoMetadata {
            file_name: self.file_name(),
            size: largest.size_type.clone(),
        })
    }
}
