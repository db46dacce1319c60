use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use schedule_host_core::ScheduleHost;

use super::require;

pub fn run(host: &ScheduleHost, name: &str, file: Option<PathBuf>) -> Result<()> {
    let payload = match file {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("Could not read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Could not read stdin")?;
            buf
        }
    };

    require(host.publish(name, &payload)?, name)?;

    eprintln!("{} {}", "Stored".green(), name);
    Ok(())
}
