//! Line-numbered shader listings for diagnostics.
//!
//! Driver logs and ordering errors refer to line numbers, so every
//! diagnostic that quotes assembled text quotes it numbered.

/// Prepends right-aligned 1-based line numbers to each line of `source`,
/// then appends `note` after a blank line.
///
/// Either argument may be empty.
pub fn format_listing(source: &str, note: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), note.is_empty()) {
        (true, _) => note.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{note}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_each_line() {
        let out = format_listing("#version 150\nvoid main() {\n}", "");
        assert_eq!(out, "1: #version 150\n2: void main() {\n3: }");
    }

    #[test]
    fn appends_note_after_blank_line() {
        let out = format_listing("a", "ERROR: 0:1: oops");
        assert_eq!(out, "1: a\n\nERROR: 0:1: oops");
    }

    #[test]
    fn empty_source_yields_note_only() {
        assert_eq!(format_listing("", "just the note"), "just the note");
        assert!(format_listing("", "").is_empty());
    }

    #[test]
    fn right_aligns_numbers_past_nine_lines() {
        let source = (1..=12).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let out = format_listing(&source, "");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 1: l1");
        assert_eq!(lines[11], "12: l12");
    }

    #[test]
    fn blank_source_lines_are_kept() {
        let out = format_listing("a\n\nb", "");
        assert_eq!(out, "1: a\n2: \n3: b");
    }
}
