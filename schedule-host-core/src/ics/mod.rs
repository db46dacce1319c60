//! iCalendar generation.
//!
//! Produces RFC 5545 style text from a [`Schedule`](crate::schedule::Schedule),
//! folding content lines by byte length.

mod calendar;
mod event;
mod fold;
mod time;

pub use calendar::{render_calendar, render_json};
pub use event::{render_event, trigger_duration};
pub use fold::{encode_field, fold};
pub use time::{format_ical_time, local_date, parse_timestamp, resolve_zone};
