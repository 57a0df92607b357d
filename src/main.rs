mod config;
mod disk_client;
mod error;
mod http;
mod logging;
mod metadata;
mod model;
mod orchestrator;
#[cfg(test)]
mod test_support;
mod vk_client;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use git_version::git_version;

use crate::config::{DiskConfig, VkConfig, DEFAULT_DISK_API_URL, DEFAULT_VK_API_URL, DEFAULT_VK_API_VERSION};
use crate::disk_client::DiskClient;
use crate::metadata::OutputMode;
use crate::orchestrator::{AlbumSelection, FolderOutcome, RunOptions};
use crate::vk_client::{VkClient, WALL_ALBUM};

pub const GIT_VERSION: &str = git_version!(fallback = "unknown");

/// Copies a random sample of VK albums to Yandex.Disk
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// VK API access token
    #[clap(long, env = "VK_ACCESS_TOKEN", hide_env_values = true)]
    vk_token: String,

    /// Yandex.Disk OAuth token
    #[clap(long, env = "YANDEX_DISK_TOKEN", hide_env_values = true)]
    disk_token: String,

    /// Owner of the albums, negative for communities
    #[clap(long, env = "VK_OWNER_ID", default_value = "-143792183", allow_hyphen_values = true)]
    owner_id: String,

    /// Number of random album picks
    #[clap(short, long, default_value_t = 2)]
    albums: usize,

    /// Photos taken from each album
    #[clap(short, long, default_value_t = 5)]
    photos: u32,

    /// Never pick the same album twice in one run
    #[clap(long)]
    distinct_albums: bool,

    /// Copy this album instead of picking at random, may be repeated
    #[clap(long, allow_hyphen_values = true)]
    album: Vec<String>,

    /// Copy the owner's wall photos
    #[clap(long)]
    wall: bool,

    #[clap(short, long, default_value = ".")]
    output_directory: PathBuf,

    /// What to do with an album's metadata file from an earlier run
    #[clap(long, value_enum, default_value_t = OutputMode::Merge)]
    output_mode: OutputMode,

    /// Replace files that already exist on the disk
    #[clap(long)]
    overwrite_uploads: bool,

    #[clap(long, default_value = "vk_photo_backup.log")]
    log_file: PathBuf,

    #[clap(long, default_value = DEFAULT_VK_API_URL, hide = true)]
    vk_api_url: String,

    #[clap(long, default_value = DEFAULT_VK_API_VERSION, hide = true)]
    vk_api_version: String,

    #[clap(long, default_value = DEFAULT_DISK_API_URL, hide = true)]
    disk_api_url: String,
}

impl Args {
    fn vk_config(&self) -> VkConfig {
        VkConfig {
            api_url: self.vk_api_url.clone(),
            api_version: self.vk_api_version.clone(),
            ..VkConfig::new(&self.vk_token, &self.owner_id)
        }
    }

    fn disk_config(&self) -> DiskConfig {
        DiskConfig {
            api_url: self.disk_api_url.clone(),
            overwrite: self.overwrite_uploads,
            ..DiskConfig::new(&self.disk_token)
        }
    }

    fn selection(&self) -> AlbumSelection {
        let mut fixed = self.album.clone();
        if self.wall {
            fixed.push(WALL_ALBUM.to_string());
        }

        if fixed.is_empty() {
            AlbumSelection::Random {
                picks: self.albums,
                distinct: self.distinct_albums,
            }
        } else {
            AlbumSelection::Fixed(fixed)
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            selection: self.selection(),
            photos_per_album: self.photos,
            output_directory: self.output_directory.clone(),
            output_mode: self.output_mode,
            show_progress: true,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    println!("VK Photo Backup");
    println!("{GIT_VERSION}");

    logging::init(&args.log_file)?;

    let source = VkClient::new(args.vk_config()).context("could not build VK client")?;
    let storage = DiskClient::new(args.disk_config()).context("could not build disk client")?;

    println!("Copying photos of owner {owner}...", owner = args.owner_id);
    let report = match orchestrator::run(&source, &storage, &args.run_options(), &mut rand::rng()).await {
        Ok(report) => report,
        Err(e) => {
            log::error!("run aborted: {e}");
            return Err(e).context("photo copy failed");
        }
    };

    for album in &report.albums {
        let folder = match &album.folder {
            FolderOutcome::Created(name) => format!("created folder {name}"),
            FolderOutcome::Existing(name) => format!("existing folder {name}"),
            FolderOutcome::Failed(reason) => format!("no folder ({reason})"),
        };
        println!(
            "Album {id}: {uploaded} of {total} photos uploaded, {skipped} already there, {folder}.",
            id = album.album_id,
            uploaded = album.uploaded,
            skipped = album.skipped,
            total = album.photo_count
        );
    }
    println!(
        "Finished. {count} photos uploaded. Details in {log}.",
        count = report.uploaded(),
        log = args.log_file.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["VkPhotoBackup", "--vk-token", "vk", "--disk-token", "disk"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_pick_two_albums_of_five_photos() {
        let args = parse(&[]);
        let options = args.run_options();

        match options.selection {
            AlbumSelection::Random { picks, distinct } => {
                assert_eq!(2, picks);
                assert!(!distinct);
            }
            _ => panic!("expected random selection"),
        }
        assert_eq!(5, options.photos_per_album);
        assert_eq!(OutputMode::Merge, options.output_mode);
        assert_eq!("-143792183", args.vk_config().owner_id);
        assert_eq!("5.199", args.vk_config().api_version);
        assert!(!args.disk_config().overwrite);
    }

    #[test]
    fn explicit_albums_and_wall() {
        let args = parse(&["--album", "-6", "--album", "271", "--wall"]);

        match args.selection() {
            AlbumSelection::Fixed(ids) => assert_eq!(vec!["-6", "271", "wall"], ids),
            _ => panic!("expected fixed selection"),
        }
    }

    #[test]
    fn append_mode_and_overwrite_uploads() {
        let args = parse(&["--output-mode", "append", "--overwrite-uploads", "--owner-id", "-1"]);

        assert_eq!(OutputMode::Append, args.output_mode);
        assert!(args.disk_config().overwrite);
        assert_eq!("-1", args.vk_config().owner_id);
    }
}
