//! Check-digit annotation of id triples.
//!
//! Input is a header line followed by one `TTTTT, SSSSS, BBBBB` triple of
//! five-digit payloads per line. Each triple is written back with its check
//! digits appended, or as `INVALID ENTRY` if the line is malformed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

pub const OUTPUT_HEADER: &str = "TID   ; SID   ; BID    #This is the output format";
pub const INVALID_ENTRY: &str = "INVALID ENTRY";

const FIELDS: usize = 3;
const PAYLOAD_DIGITS: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AnnotateSummary {
    pub annotated: usize,
    pub invalid: usize,
}

/// Parse one triple. `None` unless the line is exactly three comma
/// separated payloads of at most five digits, each within range.
pub fn parse_line(line: &str) -> Option<[u32; FIELDS]> {
    let mut payloads = [0u32; FIELDS];
    let mut fields = line.split(',');
    for slot in &mut payloads {
        let field = fields.next()?.trim();
        if field.is_empty() || field.len() > PAYLOAD_DIGITS || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let payload: u32 = field.parse().ok()?;
        if !(etx_check::PAYLOAD_MIN..=etx_check::PAYLOAD_MAX).contains(&payload) {
            return None;
        }
        *slot = payload;
    }
    if fields.next().is_some() {
        return None;
    }
    Some(payloads)
}

/// The output line for one input line.
pub fn annotate_line(line: &str) -> String {
    let Some(payloads) = parse_line(line) else {
        return INVALID_ENTRY.to_string();
    };
    let mut rendered = Vec::with_capacity(FIELDS);
    for payload in payloads {
        match etx_check::check_digit(payload) {
            Ok(digit) => rendered.push(format!("{payload:05}{digit}")),
            Err(_) => return INVALID_ENTRY.to_string(),
        }
    }
    rendered.join(", ")
}

/// Annotate every line after the header of `input`.
///
/// Lines are read as raw bytes; one that is not UTF-8 is an invalid entry
/// like any other malformed line.
pub fn annotate<R: BufRead, W: Write>(input: R, mut output: W) -> io::Result<AnnotateSummary> {
    let mut summary = AnnotateSummary::default();
    writeln!(output, "{OUTPUT_HEADER}")?;
    for line in input.split(b'\n').skip(1) {
        let line = line?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line);
        let annotated = match std::str::from_utf8(line) {
            Ok(text) => annotate_line(text),
            Err(_) => INVALID_ENTRY.to_string(),
        };
        if annotated == INVALID_ENTRY {
            summary.invalid += 1;
        } else {
            summary.annotated += 1;
        }
        writeln!(output, "{annotated}")?;
    }
    output.flush()?;
    debug!(annotated = summary.annotated, invalid = summary.invalid, "annotation finished");
    Ok(summary)
}

pub fn annotate_file(input: &Path, output: &Path) -> anyhow::Result<AnnotateSummary> {
    let reader = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let writer = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    annotate(BufReader::new(reader), BufWriter::new(writer))
        .with_context(|| format!("annotating {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_lines() {
        assert_eq!(parse_line("12345, 56789, 10000"), Some([12345, 56789, 10000]));
        assert_eq!(parse_line("  12345 ,56789 ,  10000  "), Some([12345, 56789, 10000]));
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in [
            "",
            "12345, 56789",
            "12345, 56789, 10000, 11111",
            "12345, 56789, 1000",
            "123456, 56789, 10000",
            "12a45, 56789, 10000",
            "12345 56789 10000",
            "12345, 56789, 10000 x",
            "-1234, 56789, 10000",
        ] {
            assert_eq!(parse_line(line), None, "{line:?}");
        }
    }

    #[test]
    fn annotates_with_check_digits() {
        assert_eq!(annotate_line("12345, 56789, 10000"), "123455, 567898, 100004");
        assert_eq!(annotate_line("oops"), INVALID_ENTRY);
    }

    #[test]
    fn skips_header_and_counts() {
        let input = "TID, SID, BID\n12345, 56789, 10000\nbad\n99999,11111,12345\n";
        let mut out = Vec::new();
        let summary = annotate(input.as_bytes(), &mut out).unwrap();
        assert_eq!(summary, AnnotateSummary { annotated: 2, invalid: 1 });
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![OUTPUT_HEADER, "123455, 567898, 100004", INVALID_ENTRY, "999996, 111110, 123455"]
        );
    }

    #[test]
    fn non_utf8_line_is_invalid_and_run_continues() {
        let mut input = b"TID, SID, BID\r\n12345, 56789, 10000\r\n".to_vec();
        input.extend_from_slice(&[0xFF, 0xFE, b'\n']);
        input.extend_from_slice(b"99999, 11111, 12345\n");
        let mut out = Vec::new();
        let summary = annotate(input.as_slice(), &mut out).unwrap();
        assert_eq!(summary, AnnotateSummary { annotated: 2, invalid: 1 });
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![OUTPUT_HEADER, "123455, 567898, 100004", INVALID_ENTRY, "999996, 111110, 123455"]
        );
    }

    #[test]
    fn header_only_input() {
        let mut out = Vec::new();
        let summary = annotate("header\n".as_bytes(), &mut out).unwrap();
        assert_eq!(summary, AnnotateSummary::default());
        assert_eq!(String::from_utf8(out).unwrap(), format!("{OUTPUT_HEADER}\n"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        std::fs::write(&input, "TID, SID, BID\n12345, 12340, 56789\n").unwrap();
        let summary = annotate_file(&input, &output).unwrap();
        assert_eq!(summary.annotated, 1);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.ends_with("123455, 123400, 567898\n"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = annotate_file(&dir.path().join("nope.txt"), &dir.path().join("out.txt")).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }
}
