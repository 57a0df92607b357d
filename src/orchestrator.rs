use std::path::PathBuf;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

use crate::error::{Error, Result};
use crate::metadata::{write_album_metadata, OutputMode};
use crate::model::Photo;

const PROGRESS_TEMPLATE: &str = "{msg} [{bar:40}] {pos}/{len}";

/// Where photos come from.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn list_album_ids(&self) -> Result<Vec<i64>>;
    async fn fetch_photos(&self, count: u32, album_id: &str) -> Result<Vec<Photo>>;
    async fn fetch_bytes(&self, photo: &Photo) -> Result<Vec<u8>>;
}

/// Where photos go.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn create_folder(&self, name: &str) -> Result<String>;
    async fn upload_file(&self, folder_name: &str, file_name: &str, bytes: Vec<u8>) -> Result<()>;
}

#[derive(Debug, Clone)]
pub enum AlbumSelection {
    /// Pick `picks` albums at random from the owner's album list.
    Random { picks: usize, distinct: bool },
    /// Copy exactly these albums, in order.
    Fixed(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub selection: AlbumSelection,
    pub photos_per_album: u32,
    pub output_directory: PathBuf,
    pub output_mode: OutputMode,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            selection: AlbumSelection::Random {
                picks: 2,
                distinct: false,
            },
            photos_per_album: 5,
            output_directory: PathBuf::from("."),
            output_mode: OutputMode::default(),
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    Created(String),
    Existing(String),
    Failed(String),
}

#[derive(Debug)]
pub struct AlbumReport {
    pub album_id: String,
    pub photo_count: usize,
    pub metadata_path: Option<PathBuf>,
    pub folder: FolderOutcome,
    pub uploaded: usize,
    /// Photos left alone because the disk already had them.
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub albums: Vec<AlbumReport>,
}

impl RunReport {
    pub fn uploaded(&self) -> usize {
        self.albums.iter().map(|a| a.uploaded).sum()
    }
}

/// Chooses album ids from `albums`. Without `distinct` the same album can come up more than once.
pub fn select_album_ids<R: Rng>(
    albums: &[i64],
    picks: usize,
    distinct: bool,
    rng: &mut R,
) -> Vec<i64> {
    if albums.is_empty() {
        return Vec::new();
    }

    if distinct {
        let mut pool = albums.to_vec();
        let mut chosen = Vec::new();
        while chosen.len() < picks && !pool.is_empty() {
            let index = rng.random_range(0..pool.len());
            chosen.push(pool.swap_remove(index));
        }
        chosen
    } else {
        (0..picks)
            .map(|_| albums[rng.random_range(0..albums.len())])
            .collect()
    }
}

pub async fn run<S, D, R>(
    source: &S,
    storage: &D,
    options: &RunOptions,
    rng: &mut R,
) -> Result<RunReport>
where
    S: PhotoSource + ?Sized,
    D: PhotoStorage + ?Sized,
    R: Rng,
{
    let album_ids = match &options.selection {
        AlbumSelection::Fixed(ids) => ids.clone(),
        AlbumSelection::Random { picks, distinct } => {
            let albums = match source.list_album_ids().await {
                Ok(albums) => albums,
                Err(e) => {
                    log::error!("album list is unavailable, nothing to copy: {e}");
                    Vec::new()
                }
            };
            if albums.is_empty() {
                log::info!("no albums to pick from, skipping {picks} picks");
            }
            select_album_ids(&albums, *picks, *distinct, rng)
                .iter()
                .map(|id| id.to_string())
                .collect()
        }
    };

    let mut report = RunReport::default();
    for album_id in album_ids {
        let album = copy_album(source, storage, options, &album_id).await?;
        report.albums.push(album);
    }

    Ok(report)
}

async fn copy_album<S, D>(
    source: &S,
    storage: &D,
    options: &RunOptions,
    album_id: &str,
) -> Result<AlbumReport>
where
    S: PhotoSource + ?Sized,
    D: PhotoStorage + ?Sized,
{
    log::info!("copying album {album_id}");
    let photos = source.fetch_photos(options.photos_per_album, album_id).await?;

    let records = photos
        .iter()
        .map(Photo::metadata)
        .collect::<Result<Vec<_>>>()?;
    let metadata_path = write_album_metadata(
        &options.output_directory,
        album_id,
        &records,
        options.output_mode,
    )?;

    let folder = match storage.create_folder(album_id).await {
        Ok(name) => FolderOutcome::Created(name),
        Err(Error::FolderExists(name)) => {
            log::info!("uploading into existing folder {name}");
            FolderOutcome::Existing(name)
        }
        Err(e @ Error::UnexpectedStatus { .. }) => {
            log::error!("skipping uploads for album {album_id}: {e}");
            FolderOutcome::Failed(e.to_string())
        }
        Err(e) => return Err(e),
    };

    let mut uploaded = 0;
    let mut skipped = 0;
    if let FolderOutcome::Created(folder_name) | FolderOutcome::Existing(folder_name) = &folder {
        let bar = progress_bar(options.show_progress, photos.len(), album_id);
        for photo in &photos {
            let bytes = source.fetch_bytes(photo).await?;
            match storage
                .upload_file(folder_name, &photo.file_name(), bytes)
                .await
            {
                Ok(()) => uploaded += 1,
                Err(Error::FileExists(path)) => {
                    log::info!("skipping {path}, already on the disk");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
            bar.inc(1);
        }
        bar.finish();
    }

    Ok(AlbumReport {
        album_id: album_id.to_string(),
        photo_count: photos.len(),
        metadata_path,
        folder,
        uploaded,
        skipped,
    })
}

fn progress_bar(visible: bool, len: usize, album_id: &str) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(format!("album {album_id}"));
    bar
}
