//! VEVENT rendering for a single schedule entry.

use url::Url;

use crate::error::HostResult;
use crate::ics::fold::encode_field;
use crate::ics::time::{format_ical_time, local_date};
use crate::render::RenderOptions;
use crate::schedule::{Event, Person};

/// Render one event as its VEVENT content lines.
///
/// Returns no lines when the summary matches one of the skip keywords.
/// Empty-valued properties are left out.
pub fn render_event(event: &Event, options: &RenderOptions) -> HostResult<Vec<String>> {
    let summary = event.summary();
    if options.is_skipped(&summary) {
        tracing::debug!(event = %event.id, "skipping event matched by keyword");
        return Ok(Vec::new());
    }

    let end = event.effective_end();
    let mut lines = vec!["BEGIN:VEVENT".to_string()];

    lines.extend(encode_field("UID", &uid(event, options.base_url())));
    lines.extend(organizer(&event.creator));
    lines.push(format_ical_time("CREATED", &event.created_at, Some("UTC"))?);
    lines.push(format_ical_time("LAST-MODIFIED", &event.updated_at, Some("UTC"))?);
    lines.push(format_ical_time("DTSTAMP", &event.updated_at, Some("UTC"))?);
    lines.push(format_ical_time(
        "DTSTART",
        &event.start.date_time,
        event.start.zone(),
    )?);
    lines.push(format_ical_time("DTEND", &end.date_time, end.zone())?);
    lines.extend(encode_field("CLASS", "PRIVATE"));
    lines.extend(encode_field("SUMMARY", &summary));
    lines.extend(encode_field(
        "DESCRIPTION",
        &description(event, options.max_attendees()),
    ));
    lines.extend(encode_field("LOCATION", &location(event)));
    lines.extend(encode_field("URL", &event_url(event, options.base_url())?));

    for &offset in options.alarms() {
        lines.push("BEGIN:VALARM".to_string());
        lines.extend(encode_field("ACTION", "DISPLAY"));
        lines.extend(encode_field("DESCRIPTION", &summary));
        lines.extend(encode_field("TRIGGER", &trigger_duration(offset)));
        lines.push("END:VALARM".to_string());
    }

    lines.push("END:VEVENT".to_string());
    Ok(lines)
}

/// `grn.ev.<id>[@<host>]/<start>`
fn uid(event: &Event, base_url: &str) -> String {
    let mut uid = format!("grn.ev.{}", event.id);
    if !base_url.is_empty() {
        uid.push('@');
        uid.push_str(&host_of(base_url));
    }
    uid.push('/');
    uid.push_str(&event.start.date_time);
    uid
}

/// Host part of the base URL, or the URL itself when it doesn't parse.
fn host_of(base_url: &str) -> String {
    Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| base_url.to_string())
}

fn organizer(creator: &Person) -> Option<String> {
    let code = creator.code.as_deref().unwrap_or_default();
    encode_field(&format!("ORGANIZER;CN={}", creator.name), code)
}

fn description(event: &Event, max_attendees: usize) -> String {
    let names: Vec<&str> = event
        .attendees
        .iter()
        .take(max_attendees)
        .map(|a| a.name.as_str())
        .collect();

    let mut attendees = format!("Attendees: {}", names.join(", "));
    if event.attendees.len() > max_attendees {
        let more = event.attendees.len() - max_attendees;
        attendees.push_str(&format!(", ...more {more} attendees"));
    }

    let parts = [
        event.notes.trim().to_string(),
        "- - -".to_string(),
        format!("Created by: {} ({})", event.creator.name, event.created_at),
        format!("Updated by: {} ({})", event.updater.name, event.updated_at),
        attendees,
    ];

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn location(event: &Event) -> String {
    event
        .facilities
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Link back to the event in the groupware UI, dated by the local start day.
fn event_url(event: &Event, base_url: &str) -> HostResult<String> {
    if base_url.is_empty() {
        return Ok(String::new());
    }

    let bdate = local_date(&event.start.date_time, event.start.zone())?;
    Ok(format!(
        "{}/schedule/view?event={}&bdate={}",
        base_url, event.id, bdate
    ))
}

/// Negative ISO-8601 duration for an alarm `seconds` before the start.
pub fn trigger_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3_600;
    let minutes = seconds % 3_600 / 60;
    let secs = seconds % 60;

    format!("-P{days}DT{hours}H{minutes}M{secs}S")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{EventTime, Facility};

    fn person(name: &str, code: &str) -> Person {
        Person {
            name: name.to_string(),
            code: Some(code.to_string()),
        }
    }

    fn make_test_event() -> Event {
        Event {
            id: "42".to_string(),
            subject: "Standup".to_string(),
            event_menu: None,
            notes: String::new(),
            creator: person("Alice", "alice"),
            updater: person("Alice", "alice"),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            start: EventTime::new("2024-01-10T09:00:00+09:00", "Asia/Tokyo"),
            end: Some(EventTime::new("2024-01-10T09:30:00+09:00", "Asia/Tokyo")),
            is_start_only: false,
            attendees: vec![],
            facilities: vec![],
        }
    }

    fn find<'a>(lines: &'a [String], prefix: &str) -> Option<&'a str> {
        lines
            .iter()
            .find(|l| l.starts_with(prefix))
            .map(String::as_str)
    }

    #[test]
    fn test_minimal_event_layout() {
        let lines = render_event(&make_test_event(), &RenderOptions::default()).unwrap();

        assert_eq!(
            lines,
            vec![
                "BEGIN:VEVENT",
                "UID:grn.ev.42/2024-01-10T09:00:00+09:00",
                "ORGANIZER;CN=Alice:alice",
                "CREATED:20240101T000000Z",
                "LAST-MODIFIED:20240101T000000Z",
                "DTSTAMP:20240101T000000Z",
                "DTSTART;TZID=Asia/Tokyo:20240110T090000",
                "DTEND;TZID=Asia/Tokyo:20240110T093000",
                "CLASS:PRIVATE",
                "SUMMARY:Standup",
                "DESCRIPTION:- - -\\nCreated by: Alice (2024-01-01T00:00:00Z)\\nUpdated by:\n\t \
                 Alice (2024-01-01T00:00:00Z)\\nAttendees: ",
                "END:VEVENT",
            ]
        );
    }

    #[test]
    fn test_uid_and_url_with_base_url() {
        let options = RenderOptions::default().with_base_url("https://grn.example.com/g/");
        let lines = render_event(&make_test_event(), &options).unwrap();

        assert_eq!(
            find(&lines, "UID:").unwrap(),
            "UID:grn.ev.42@grn.example.com/2024-01-10T09:00:00+09:00"
        );
        let url = find(&lines, "URL:").unwrap().replace("\n\t", "");
        assert_eq!(
            url,
            "URL:https://grn.example.com/g/schedule/view?event=42&bdate=2024-01-10"
        );
    }

    #[test]
    fn test_no_url_without_base_url() {
        let lines = render_event(&make_test_event(), &RenderOptions::default()).unwrap();
        assert!(find(&lines, "URL").is_none());
    }

    #[test]
    fn test_attendee_overflow_counts_remaining() {
        let mut event = make_test_event();
        event.attendees = (1..=25).map(|i| person(&format!("P{i}"), "x")).collect();
        let options = RenderOptions::default().with_max_attendees(20).unwrap();

        let lines = render_event(&event, &options).unwrap();
        let description = find(&lines, "DESCRIPTION:").unwrap().replace("\n\t", "");
        let listed: Vec<String> = (1..=20).map(|i| format!("P{i}")).collect();

        assert!(description.ends_with(&format!(
            "Attendees: {}, ...more 5 attendees",
            listed.join(", ")
        )));
        assert!(!description.contains("P21"));
    }

    #[test]
    fn test_default_attendee_cap_is_five() {
        let mut event = make_test_event();
        event.attendees = (1..=6).map(|i| person(&format!("P{i}"), "x")).collect();

        let lines = render_event(&event, &RenderOptions::default()).unwrap();
        let description = find(&lines, "DESCRIPTION:").unwrap().replace("\n\t", "");
        assert!(description.ends_with("Attendees: P1, P2, P3, P4, P5, ...more 1 attendees"));
    }

    #[test]
    fn test_start_only_event_ends_at_start() {
        let mut event = make_test_event();
        event.is_start_only = true;
        event.end = Some(EventTime::new("2024-01-10T18:00:00+09:00", "UTC"));

        let lines = render_event(&event, &RenderOptions::default()).unwrap();
        assert_eq!(
            find(&lines, "DTEND").unwrap(),
            "DTEND;TZID=Asia/Tokyo:20240110T090000"
        );
    }

    #[test]
    fn test_notes_menu_and_facilities() {
        let mut event = make_test_event();
        event.notes = "  bring laptop\n".to_string();
        event.event_menu = Some("Meeting".to_string());
        event.facilities = vec![
            Facility { name: "Room A".to_string() },
            Facility { name: "Projector".to_string() },
        ];

        let lines = render_event(&event, &RenderOptions::default()).unwrap();
        assert_eq!(find(&lines, "SUMMARY:").unwrap(), "SUMMARY:Meeting: Standup");
        assert_eq!(find(&lines, "LOCATION:").unwrap(), "LOCATION:Room A, Projector");
        assert!(find(&lines, "DESCRIPTION:")
            .unwrap()
            .starts_with("DESCRIPTION:bring laptop\\n- - -\\n"));
    }

    #[test]
    fn test_alarm_blocks() {
        let options = RenderOptions::default().with_alarms([600, -90_061]);
        let lines = render_event(&make_test_event(), &options).unwrap();

        let triggers: Vec<&str> = lines
            .iter()
            .filter(|l| l.starts_with("TRIGGER:"))
            .map(String::as_str)
            .collect();
        assert_eq!(triggers, vec!["TRIGGER:-P0DT0H10M0S", "TRIGGER:-P1DT1H1M1S"]);
        assert_eq!(lines.iter().filter(|l| *l == "BEGIN:VALARM").count(), 2);
        assert!(lines.iter().any(|l| l == "DESCRIPTION:Standup"));
        assert!(lines.iter().any(|l| l == "ACTION:DISPLAY"));
    }

    #[test]
    fn test_skip_keyword_is_case_insensitive() {
        let mut event = make_test_event();
        event.event_menu = Some("Holiday".to_string());

        let options = RenderOptions::default().with_skip_keywords(["HOLIDAY"]);
        assert!(render_event(&event, &options).unwrap().is_empty());

        let options = RenderOptions::default().with_skip_keywords(["review"]);
        assert!(!render_event(&event, &options).unwrap().is_empty());
    }

    #[test]
    fn test_bad_zone_fails_the_event() {
        let mut event = make_test_event();
        event.start.time_zone = Some("Nowhere/City".to_string());
        assert!(render_event(&event, &RenderOptions::default()).is_err());
    }

    #[test]
    fn test_trigger_duration_decomposition() {
        assert_eq!(trigger_duration(0), "-P0DT0H0M0S");
        assert_eq!(trigger_duration(600), "-P0DT0H10M0S");
        assert_eq!(trigger_duration(86_400 + 3_600 + 61), "-P1DT1H1M1S");
    }
}
