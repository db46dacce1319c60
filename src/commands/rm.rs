use anyhow::Result;
use owo_colors::OwoColorize;
use schedule_host_core::ScheduleHost;

use super::require;

pub fn run(host: &ScheduleHost, name: &str) -> Result<()> {
    if require(host.remove(name)?, name)? {
        eprintln!("{} {}", "Deleted".red(), name);
    }
    Ok(())
}
