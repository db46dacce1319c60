//! Output formats and the options that shape calendar rendering.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_ATTENDEES;
use crate::error::{HostError, HostResult};
use crate::ics::{render_calendar, render_json};
use crate::schedule::Schedule;

/// How a schedule is rendered for a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    base_url: String,
    max_attendees: usize,
    alarms: BTreeSet<u64>,
    skip_keywords: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            base_url: String::new(),
            max_attendees: DEFAULT_MAX_ATTENDEES,
            alarms: BTreeSet::new(),
            skip_keywords: Vec::new(),
        }
    }
}

impl RenderOptions {
    /// Groupware base URL used for UIDs and event links. Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Attendees listed before the overflow marker. Must be positive.
    pub fn with_max_attendees(mut self, max_attendees: usize) -> HostResult<Self> {
        if max_attendees == 0 {
            return Err(HostError::Validation(
                "max attendees must be a positive integer".into(),
            ));
        }
        self.max_attendees = max_attendees;
        Ok(self)
    }

    /// Alarm offsets in seconds before the start. Signs are dropped, duplicates merged.
    pub fn with_alarms(mut self, alarms: impl IntoIterator<Item = i64>) -> Self {
        self.alarms = alarms.into_iter().map(i64::unsigned_abs).collect();
        self
    }

    /// Case-insensitive substrings; matching events are left out. Empty keywords are ignored.
    pub fn with_skip_keywords<S: AsRef<str>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.skip_keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_attendees(&self) -> usize {
        self.max_attendees
    }

    pub fn alarms(&self) -> &BTreeSet<u64> {
        &self.alarms
    }

    pub fn skip_keywords(&self) -> &[String] {
        &self.skip_keywords
    }

    pub fn is_skipped(&self, summary: &str) -> bool {
        if self.skip_keywords.is_empty() {
            return false;
        }
        let summary = summary.to_lowercase();
        self.skip_keywords.iter().any(|k| summary.contains(k.as_str()))
    }
}

/// Requested output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Ics,
    Txt,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Ics => "text/calendar",
            OutputFormat::Txt => "text/plain",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "ics" => Ok(OutputFormat::Ics),
            "txt" => Ok(OutputFormat::Txt),
            other => Err(HostError::Validation(format!(
                "Unsupported output format '{other}' (expected json, ics or txt)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Ics => "ics",
            OutputFormat::Txt => "txt",
        };
        write!(f, "{name}")
    }
}

/// A fully rendered response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

/// Render `schedule` in `format`. Nothing is returned unless the whole document rendered.
pub fn render(
    schedule: &Schedule,
    format: OutputFormat,
    options: &RenderOptions,
) -> HostResult<Rendered> {
    let body = match format {
        OutputFormat::Json => render_json(schedule)?,
        OutputFormat::Ics | OutputFormat::Txt => render_calendar(schedule, options)?,
    };

    Ok(Rendered {
        content_type: format.content_type(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.base_url(), "");
        assert_eq!(options.max_attendees(), 5);
        assert!(options.alarms().is_empty());
        assert!(!options.is_skipped("anything"));
    }

    #[test]
    fn test_base_url_trailing_slashes_stripped() {
        let options = RenderOptions::default().with_base_url("https://example.com/g//");
        assert_eq!(options.base_url(), "https://example.com/g");
    }

    #[test]
    fn test_zero_max_attendees_rejected() {
        let err = RenderOptions::default().with_max_attendees(0).unwrap_err();
        assert!(matches!(err, HostError::Validation(_)));
    }

    #[test]
    fn test_alarms_are_sign_normalized_and_deduplicated() {
        let options = RenderOptions::default().with_alarms([-600, 600, 300]);
        assert_eq!(options.alarms().iter().copied().collect::<Vec<_>>(), vec![300, 600]);
    }

    #[test]
    fn test_empty_skip_keyword_matches_nothing() {
        let options = RenderOptions::default().with_skip_keywords(["", "Lunch"]);
        assert_eq!(options.skip_keywords(), ["lunch".to_string()]);
        assert!(options.is_skipped("Team LUNCH"));
        assert!(!options.is_skipped("Standup"));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("ics".parse::<OutputFormat>().unwrap(), OutputFormat::Ics);
        assert_eq!("txt".parse::<OutputFormat>().unwrap().content_type(), "text/plain");
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(HostError::Validation(_))
        ));
    }

    #[test]
    fn test_ics_and_txt_share_body() {
        let schedule = Schedule::from_json(r#"{"events": []}"#).unwrap();
        let options = RenderOptions::default();

        let ics = render(&schedule, OutputFormat::Ics, &options).unwrap();
        let txt = render(&schedule, OutputFormat::Txt, &options).unwrap();

        assert_eq!(ics.body, txt.body);
        assert_eq!(ics.content_type, "text/calendar");
        assert_eq!(txt.content_type, "text/plain");
    }
}
