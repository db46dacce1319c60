//! Content line encoding and folding.
//!
//! Lines are folded by UTF-8 byte length, never splitting a code point.
//! Breaks are a bare `\n` followed by a tab; the calendar renderer joins
//! whole content lines with CRLF.

use crate::constants::{FOLD_INDENT, FOLD_WIDTH};

/// Build a folded `NAME:VALUE` content line.
///
/// Returns `None` when the value is empty, meaning the property is left out.
/// CR and LF inside the line are written as the two-character escapes `\r` and `\n`.
pub fn encode_field(name: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let line = format!("{name}:{value}")
        .replace('\r', "\\r")
        .replace('\n', "\\n");

    Some(fold(&line, FOLD_WIDTH))
}

/// Insert a break plus indent whenever the next code point would push the
/// current physical line past `width` bytes.
pub fn fold(line: &str, width: usize) -> String {
    let breaks = line.len().checked_div(width).unwrap_or(line.len());
    let mut folded = String::with_capacity(line.len() + breaks * 2);
    let mut bytes = 0;

    for ch in line.chars() {
        bytes += ch.len_utf8();
        if bytes > width {
            folded.push('\n');
            folded.push_str(FOLD_INDENT);
            bytes = FOLD_INDENT.len() + ch.len_utf8();
        }
        folded.push(ch);
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_value_is_omitted() {
        assert_eq!(encode_field("LOCATION", ""), None);
    }

    #[test]
    fn test_short_line_is_untouched() {
        assert_eq!(
            encode_field("SUMMARY", "Standup").as_deref(),
            Some("SUMMARY:Standup")
        );
    }

    #[test]
    fn test_newlines_are_escaped() {
        assert_eq!(
            encode_field("DESCRIPTION", "one\r\ntwo\nthree").as_deref(),
            Some("DESCRIPTION:one\\r\\ntwo\\nthree")
        );
    }

    #[test]
    fn test_ascii_fold_at_72_bytes() {
        let value = "a".repeat(100);
        let folded = encode_field("SUMMARY", &value).unwrap();
        let lines: Vec<&str> = folded.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 72);
        assert_eq!(lines[0], format!("SUMMARY:{}", "a".repeat(64)));
        assert_eq!(lines[1], format!("\t{}", "a".repeat(36)));
    }

    #[test]
    fn test_exactly_72_bytes_does_not_fold() {
        let line = "x".repeat(72);
        assert_eq!(fold(&line, 72), line);
    }

    #[test]
    fn test_multibyte_character_moves_to_next_line() {
        // 70 ASCII bytes leave room for 2 more; a 3-byte character must move down.
        let line = format!("{}会議", "x".repeat(70));
        let folded = fold(&line, 72);

        assert_eq!(folded, format!("{}\n\t会議", "x".repeat(70)));
    }

    #[test]
    fn test_japanese_text_lines_stay_within_budget() {
        let folded = encode_field("SUMMARY", &"定例会議".repeat(20)).unwrap();
        for line in folded.split('\n') {
            assert!(line.len() <= 72, "line too long: {} bytes", line.len());
        }
        assert_eq!(folded.replace("\n\t", ""), format!("SUMMARY:{}", "定例会議".repeat(20)));
    }

    #[test]
    fn test_zero_width_breaks_before_every_char() {
        assert_eq!(fold("abc", 0), "\n\ta\n\tb\n\tc");
        assert_eq!(fold("", 0), "");
    }

    proptest! {
        #[test]
        fn folded_lines_never_exceed_width(value in "\\PC{1,300}") {
            let folded = encode_field("DESCRIPTION", &value).unwrap();

            for (i, line) in folded.split('\n').enumerate() {
                prop_assert!(line.len() <= FOLD_WIDTH);
                if i > 0 {
                    prop_assert!(line.starts_with('\t'));
                }
            }
        }

        #[test]
        fn unfolding_restores_the_escaped_line(value in "[a-zA-Z0-9 äöü会議\\n]{0,200}") {
            match encode_field("X-TEST", &value) {
                None => prop_assert!(value.is_empty()),
                Some(folded) => {
                    let expected = format!("X-TEST:{}", value.replace('\n', "\\n"));
                    prop_assert_eq!(folded.replace("\n\t", ""), expected);
                }
            }
        }
    }
}
