use super::strip_bullet;

/// One skill per non-empty line, markers and surrounding whitespace removed.
///
/// Order follows the model's output and the list is not capped.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.lines().map(strip_bullet).filter(|s| !s.is_empty()).map(str::to_string).collect()
}
