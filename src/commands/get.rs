use std::io::Write;

use anyhow::Result;
use schedule_host_core::ScheduleHost;
use schedule_host_core::render::{OutputFormat, RenderOptions};

use super::require;

/// Per-invocation rendering overrides. Unset fields fall back to the config.
pub struct Overrides {
    pub url: Option<String>,
    pub max_attendees: Option<usize>,
    pub alarms: Vec<i64>,
    pub skip_keywords: Vec<String>,
}

impl Overrides {
    fn apply(self, defaults: &RenderOptions) -> Result<RenderOptions> {
        let mut options = defaults.clone();

        if let Some(url) = self.url {
            options = options.with_base_url(&url);
        }
        if let Some(max) = self.max_attendees {
            options = options.with_max_attendees(max)?;
        }
        if !self.alarms.is_empty() {
            options = options.with_alarms(self.alarms);
        }
        if !self.skip_keywords.is_empty() {
            options = options.with_skip_keywords(self.skip_keywords);
        }

        Ok(options)
    }
}

pub fn run(host: &ScheduleHost, name: &str, format: OutputFormat, overrides: Overrides) -> Result<()> {
    let options = overrides.apply(host.defaults())?;
    let rendered = require(host.fetch_with(name, format, &options)?, name)?;

    tracing::info!(content_type = rendered.content_type, "writing {}", name);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.body.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Alarm offset: plain seconds ("600", "-600") or a duration ("10m", "1h 30m").
pub fn parse_alarm(s: &str) -> Result<i64, String> {
    if let Ok(seconds) = s.parse::<i64>() {
        return Ok(seconds);
    }

    let duration = humantime::parse_duration(s.trim_start_matches('-'))
        .map_err(|e| format!("Invalid alarm '{}': {}", s, e))?;
    i64::try_from(duration.as_secs()).map_err(|_| format!("Alarm '{}' is too large", s))
}
