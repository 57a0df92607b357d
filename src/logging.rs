use std::{fs::File, io::Write, path::Path};

use anyhow::Context;
use chrono::{DateTime, Local};
use env_logger::{Builder, Env, Target};
use log::Level;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Sends log records to `log_file`, truncating whatever the previous run left there.
/// `RUST_LOG` overrides the default `info` level.
pub fn init(log_file: &Path) -> anyhow::Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("could not create log file {}", log_file.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                line(Local::now(), record.level(), &record.args().to_string())
            )
        })
        .try_init()
        .context("could not install logger")?;

    Ok(())
}

fn line(timestamp: DateTime<Local>, level: Level, message: &str) -> String {
    let timestamp = timestamp.format(TIMESTAMP_FORMAT);
    format!("{timestamp} {level} {message}")
}
