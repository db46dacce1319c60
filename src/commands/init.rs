use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use schedule_host_core::config::HostConfig;

pub fn run(
    config_path: &Path,
    data_dir: Option<PathBuf>,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let nothing_given = data_dir.is_none() && username.is_none() && password.is_none();

    if nothing_given && !config_path.exists() {
        HostConfig::create_default_config(config_path)?;
    } else if !nothing_given {
        let mut config = HostConfig::load_from(config_path)?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        if username.is_some() {
            config.username = username;
        }
        if password.is_some() {
            config.password = password;
        }
        config.save(config_path)?;
    }

    let config = HostConfig::load_from(config_path)?;
    let data_path = config.data_path()?;
    std::fs::create_dir_all(&data_path)
        .with_context(|| format!("Could not create {}", data_path.display()))?;

    println!("{}", "Initialized".green());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", data_path.display());
    Ok(())
}
