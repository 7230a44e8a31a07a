//! Pure parsers from raw model text to structured records.
//!
//! Nothing here calls a model. Each job block parses independently into a
//! `Result`, so one malformed block never affects its siblings.

mod jobs;
mod skills;

pub use jobs::{MIN_BLOCK_LINES, ParsedJob, parse_job_blocks};
pub use skills::parse_skills;

/// Leading list markers models put in front of items.
const BULLETS: &[char] = &['•', '◦', '▪', '‣', '-', '–', '—', '*'];

/// Trim whitespace and leading list markers.
pub(crate) fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || BULLETS.contains(&c)).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ascii_and_unicode_markers() {
        assert_eq!(strip_bullet("  - SQL "), "SQL");
        assert_eq!(strip_bullet("• Python"), "Python");
        assert_eq!(strip_bullet("\t– Excel"), "Excel");
        assert_eq!(strip_bullet("◦ ▪ Tableau"), "Tableau");
        assert_eq!(strip_bullet("C#"), "C#");
        assert_eq!(strip_bullet(" - "), "");
    }
}
