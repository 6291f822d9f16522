//! Progress extraction from the tool's diagnostic output.
//!
//! ffmpeg reports encoding status on stderr as repeated `key=value` tokens,
//! e.g. `frame=  100 fps=25 size=    1024kB time=00:00:04.00
//! bitrate=2097.2kbits/s speed=1.00x`. This module scans one line at a time
//! for the known fields and keeps the raw string values as emitted.

mod lines;

pub use lines::LineReader;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PROGRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(frame|fps|size|time|bitrate|speed)\s*=\s*(\S+)").unwrap()
});

/// Known progress fields of one diagnostic line, raw values as emitted.
///
/// Absent fields stay `None`; they are never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub frame: Option<String>,
    pub fps: Option<String>,
    pub size: Option<String>,
    pub time: Option<String>,
    pub bitrate: Option<String>,
    pub speed: Option<String>,
}

/// Scan a line for progress fields.
///
/// Returns `None` when the line carries none of the known fields. If a field
/// repeats within one line, the last occurrence wins. Arbitrary surrounding
/// text and whitespace around `=` are tolerated.
pub fn parse_progress(line: &str) -> Option<ProgressSnapshot> {
    let mut snapshot = ProgressSnapshot::default();
    let mut matched = false;

    for caps in PROGRESS_RE.captures_iter(line) {
        let value = Some(caps[2].to_string());
        match &caps[1] {
            "frame" => snapshot.frame = value,
            "fps" => snapshot.fps = value,
            "size" => snapshot.size = value,
            "time" => snapshot.time = value,
            "bitrate" => snapshot.bitrate = value,
            "speed" => snapshot.speed = value,
            _ => unreachable!("regex only captures known fields"),
        }
        matched = true;
    }

    matched.then_some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_status_line() {
        let line = "frame=100 fps=30 size=2048kB time=00:00:10.00 bitrate=900kbit/s speed=1.5x";
        let p = parse_progress(line).unwrap();
        assert_eq!(p.frame.as_deref(), Some("100"));
        assert_eq!(p.fps.as_deref(), Some("30"));
        assert_eq!(p.size.as_deref(), Some("2048kB"));
        assert_eq!(p.time.as_deref(), Some("00:00:10.00"));
        assert_eq!(p.bitrate.as_deref(), Some("900kbit/s"));
        assert_eq!(p.speed.as_deref(), Some("1.5x"));
    }

    #[test]
    fn test_parse_tolerates_whitespace_around_equals() {
        let p = parse_progress("size =    1024kB time = 00:00:04.00").unwrap();
        assert_eq!(p.size.as_deref(), Some("1024kB"));
        assert_eq!(p.time.as_deref(), Some("00:00:04.00"));
        assert!(p.frame.is_none());
    }

    #[test]
    fn test_parse_no_known_field() {
        assert_eq!(parse_progress("Stream mapping:"), None);
        assert_eq!(parse_progress("Press [q] to stop, [?] for help"), None);
        assert_eq!(parse_progress(""), None);
    }

    #[test]
    fn test_parse_last_occurrence_wins() {
        let p = parse_progress("frame=1 frame=2 frame=3").unwrap();
        assert_eq!(p.frame.as_deref(), Some("3"));
    }

    #[test]
    fn test_parse_surrounding_text_ignored() {
        let p = parse_progress("[mux] stats: speed=0.98x (still running)").unwrap();
        assert_eq!(p.speed.as_deref(), Some("0.98x"));
        assert!(p.size.is_none());
    }
}
