use std::{
    collections::HashSet,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhotoMetadata {
    pub file_name: String,
    pub size: String,
}

/// How an album's metadata file is treated when it already exists.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Append another JSON array to the file. Repeated runs leave several arrays back to back.
    Append,
    /// Replace the file with the latest array.
    Overwrite,
    /// Fold existing arrays and the new records into one array, skipping known file names.
    #[default]
    Merge,
}

pub fn metadata_path(output_directory: &Path, album_id: &str) -> PathBuf {
    output_directory.join(format!("vk_photos_album_{album_id}.json"))
}

/// Writes the records for one album. Returns the file written, or `None` when there was nothing to write.
pub fn write_album_metadata(
    output_directory: &Path,
    album_id: &str,
    records: &[PhotoMetadata],
    mode: OutputMode,
) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        log::error!("cannot save metadata for album {album_id}: photo list is empty");
        return Ok(None);
    }

    fs::create_dir_all(output_directory)?;
    let path = metadata_path(output_directory, album_id);

    match mode {
        OutputMode::Append => {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(serde_json::to_string_pretty(records)?.as_bytes())?;
        }
        OutputMode::Overwrite => {
            fs::write(&path, serde_json::to_string_pretty(records)?)?;
        }
        OutputMode::Merge => {
            let existing = if path.exists() {
                read_metadata(&path)?
            } else {
                Vec::new()
            };
            let mut known = HashSet::new();
            let merged: Vec<PhotoMetadata> = existing
                .into_iter()
                .chain(records.iter().cloned())
                .filter(|record| known.insert(record.file_name.clone()))
                .collect();
            fs::write(&path, serde_json::to_string_pretty(&merged)?)?;
        }
    }

    log::info!(
        "saved {count} metadata records to {path}",
        count = records.len(),
        path = path.display()
    );
    Ok(Some(path))
}

/// Reads every JSON array in the file, including back to back arrays left by append mode.
pub fn read_metadata(path: &Path) -> Result<Vec<PhotoMetadata>> {
    let text = fs::read_to_string(path)?;
    let mut records = Vec::new();
    for chunk in serde_json::Deserializer::from_str(&text).into_iter::<Vec<PhotoMetadata>>() {
        records.extend(chunk?);
    }
    Ok(records)
}
