//! Schedule document types.
//!
//! These mirror the JSON exported from the groupware schedule: a root object
//! holding an `events` array. The typed view only carries what rendering
//! needs; the parsed document is kept alongside it so JSON output is the
//! stored document itself, nulls and unknown members included.
//!
//! Exports write `null` for many members, so those read as their empty value.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{HostError, HostResult};

/// The root document stored (encrypted) under a record name.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    events: Vec<Event>,
    source: Value,
}

#[derive(Deserialize)]
struct Root {
    #[serde(default, deserialize_with = "null_as_default")]
    events: Vec<Event>,
}

/// A single schedule entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub subject: String,

    /// Category label shown in front of the subject ("Meeting", "Out of office", ...)
    #[serde(default)]
    pub event_menu: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: Person,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updater: Person,

    pub created_at: String,
    pub updated_at: String,

    pub start: EventTime,
    #[serde(default)]
    pub end: Option<EventTime>,

    /// When set, the event has no meaningful end and `start` stands in for it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_start_only: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attendees: Vec<Person>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facilities: Vec<Facility>,
}

/// A user reference (creator, updater, attendee)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Person {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// A room or piece of equipment booked for an event
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Facility {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A wall-clock timestamp together with the zone it should be displayed in
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: String,
    #[serde(default)]
    pub time_zone: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            events: Vec::new(),
            source: Value::Object(Map::new()),
        }
    }
}

impl Schedule {
    pub fn from_json(text: &str) -> HostResult<Self> {
        let format_err = |e: serde_json::Error| HostError::Format(format!("Invalid schedule document: {e}"));

        let source: Value = serde_json::from_str(text).map_err(format_err)?;
        let root = Root::deserialize(&source).map_err(format_err)?;

        Ok(Schedule {
            events: root.events,
            source,
        })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The loaded document re-serialized with sorted keys.
    pub fn to_json(&self) -> HostResult<String> {
        serde_json::to_string(&self.source).map_err(|e| HostError::Serialization(e.to_string()))
    }
}

impl Event {
    /// Display title: `"{eventMenu}: {subject}"`, or just the subject.
    pub fn summary(&self) -> String {
        match self.event_menu.as_deref() {
            Some(menu) if !menu.is_empty() => format!("{}: {}", menu, self.subject),
            _ => self.subject.clone(),
        }
    }

    /// The end to render. Start-only events (and events missing an end) end when they start.
    pub fn effective_end(&self) -> &EventTime {
        match &self.end {
            Some(end) if !self.is_start_only => end,
            _ => &self.start,
        }
    }
}

impl EventTime {
    pub fn new(date_time: &str, time_zone: &str) -> Self {
        EventTime {
            date_time: date_time.to_string(),
            time_zone: Some(time_zone.to_string()),
        }
    }

    pub fn zone(&self) -> Option<&str> {
        self.time_zone.as_deref().filter(|z| !z.is_empty())
    }
}
