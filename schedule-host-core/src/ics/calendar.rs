//! VCALENDAR assembly and JSON canonicalization.

use crate::constants::PRODUCT_ID;
use crate::error::HostResult;
use crate::ics::event::render_event;
use crate::render::RenderOptions;
use crate::schedule::Schedule;

/// Calendar properties and the organizational VTIMEZONE (JST, no daylight saving).
fn header() -> Vec<String> {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
    ];
    lines.extend(
        [
            "METHOD:PUBLISH",
            "VERSION:2.0",
            "X-WR-CALNAME:Garoon Schedule",
            "X-WR-CALDESC:Hosted Garoon Schedule",
            "X-WR-TIMEZONE:Asia/Tokyo",
            "BEGIN:VTIMEZONE",
            "TZID:Asia/Tokyo",
            "BEGIN:STANDARD",
            "DTSTART:19390101T000000",
            "TZOFFSETFROM:+0900",
            "TZOFFSETTO:+0900",
            "TZNAME:JST",
            "END:STANDARD",
            "END:VTIMEZONE",
        ]
        .map(String::from),
    );
    lines
}

/// Render the whole schedule as CRLF-joined iCalendar text with a trailing CRLF.
///
/// Any event that fails to render fails the whole calendar.
pub fn render_calendar(schedule: &Schedule, options: &RenderOptions) -> HostResult<String> {
    let mut lines = header();

    for event in schedule.events() {
        lines.extend(render_event(event, options)?);
    }
    lines.push("END:VCALENDAR".to_string());

    tracing::debug!(
        events = schedule.events().len(),
        lines = lines.len(),
        "rendered calendar"
    );

    let mut ics = lines.join("\r\n");
    ics.push_str("\r\n");
    Ok(ics)
}

/// Canonical JSON for the schedule. Re-rendering parsed output gives the same text.
pub fn render_json(schedule: &Schedule) -> HostResult<String> {
    schedule.to_json()
}
