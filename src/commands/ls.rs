use anyhow::Result;
use owo_colors::OwoColorize;
use schedule_host_core::ScheduleHost;

pub fn run(host: &ScheduleHost, raw: bool) -> Result<()> {
    let names = if raw {
        host.store().list()?
    } else {
        host.names()?
    };

    if names.is_empty() {
        eprintln!("{}", "No records found".dimmed());
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}
