use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use schedule_host_core::config::HostConfig;

pub fn run(config_path: &Path) -> Result<()> {
    let config = HostConfig::load_from(config_path)?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_path()?.display());

    println!("{}", "Store".bold());
    println!("  Cipher:  {}", config.cipher);
    println!(
        "  User:    {}",
        config.username.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  Password: {}",
        if config.password.is_some() { "set" } else { "(not set)" }
    );

    println!("{}", "Render".bold());
    println!("  Base URL:      {}", config.render.base_url);
    println!("  Max attendees: {}", config.render.max_attendees);
    println!("  Alarms:        {:?}", config.render.alarms);
    println!("  Skip:          {:?}", config.render.skip_keywords);

    Ok(())
}
