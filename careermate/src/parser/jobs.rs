//! Job-listing blocks.
//!
//! The expected shape of one block is
//!
//! ```text
//! 1. **Data Analyst** at Acme (Delhi, DL)
//!    - Type: full-time, remote
//!    - Requirements: SQL, Python, Excel
//!    - Description: Analyze data.
//!    - Contact information: jobs@acme.example
//! ```
//!
//! Labels match case-insensitively and may be bolded. Lines without a known
//! label are treated as description text.

use super::strip_bullet;
use crate::error::ParseError;
use crate::records::JobListing;

/// Blocks with fewer non-empty lines cannot hold a header, requirements, and
/// a description.
pub const MIN_BLOCK_LINES: usize = 3;

/// A job listing plus the `Type:` tokens the model reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedJob {
    pub listing: JobListing,
    /// Involvement and work-type tokens, e.g. `["full-time", "remote"]`.
    pub job_types: Vec<String>,
}

/// Split `raw` on blank lines and parse every block, in order.
pub fn parse_job_blocks(raw: &str) -> Vec<Result<ParsedJob, ParseError>> {
    split_blocks(raw).iter().map(|block| parse_block(block)).collect()
}

fn split_blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                push_block(&mut blocks, std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        push_block(&mut blocks, current);
    }
    blocks
}

/// A block holding only contact lines belongs to the job above it.
fn push_block<'a>(blocks: &mut Vec<Vec<&'a str>>, block: Vec<&'a str>) {
    let contact_only = block.iter().all(|line| contact_value(&normalize(line)).is_some());
    match blocks.last_mut() {
        Some(previous) if contact_only => previous.extend(block),
        _ => blocks.push(block),
    }
}

fn parse_block(lines: &[&str]) -> Result<ParsedJob, ParseError> {
    if lines.len() < MIN_BLOCK_LINES {
        return Err(ParseError::malformed(format!(
            "block has {} non-empty lines, expected at least {MIN_BLOCK_LINES}",
            lines.len()
        )));
    }

    let (title, company, location) = parse_header(lines[0])?;

    let mut job_types = Vec::new();
    let mut requirements = None;
    let mut description: Vec<String> = Vec::new();
    let mut contact = None;

    for raw_line in &lines[1..] {
        let line = normalize(raw_line);
        if let Some(value) = label_value(&line, "type:") {
            job_types = split_list(value);
        } else if let Some(value) = label_value(&line, "requirements:") {
            requirements = Some(split_list(value));
        } else if let Some(value) = contact_value(&line) {
            if !value.is_empty() {
                contact = Some(value.to_string());
            }
        } else if let Some(value) = label_value(&line, "description:") {
            if !value.is_empty() {
                description.push(value.to_string());
            }
        } else {
            description.push(line);
        }
    }

    let requirements = requirements
        .filter(|r| !r.is_empty())
        .ok_or(ParseError::MissingField { field: "requirements" })?;
    let description = description.join(" ");
    if description.is_empty() {
        return Err(ParseError::MissingField { field: "description" });
    }

    Ok(ParsedJob {
        listing: JobListing { title, company, location, requirements, description, contact },
        job_types,
    })
}

/// `**Title** at Company (Location)`, with anything before the first `**`
/// (list numbering) ignored.
fn parse_header(header: &str) -> Result<(String, String, String), ParseError> {
    let (_, after_open) = header
        .split_once("**")
        .ok_or_else(|| ParseError::malformed("header has no **title** marker"))?;
    let (title, rest) = after_open
        .split_once("**")
        .ok_or_else(|| ParseError::malformed("title marker is not closed"))?;

    let rest = rest
        .trim()
        .strip_prefix("at ")
        .ok_or_else(|| ParseError::malformed("header has no `at {company} ({location})` part"))?;
    let inner = rest
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| ParseError::malformed("header location is not parenthesized"))?;
    let (company, location) = split_location(inner)
        .ok_or_else(|| ParseError::malformed("header location is not parenthesized"))?;

    let required = |value: &str, field: &'static str| {
        let value = value.trim();
        if value.is_empty() {
            Err(ParseError::MissingField { field })
        } else {
            Ok(value.to_string())
        }
    };
    Ok((
        required(title, "title")?,
        required(company, "company")?,
        required(location, "location")?,
    ))
}

/// Split `Company (Location` at the `(` matching the header's final `)`,
/// so nested groups stay inside the location.
fn split_location(inner: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (index, c) in inner.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => return Some((&inner[..index], &inner[index + 1..])),
            '(' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn normalize(line: &str) -> String {
    strip_bullet(&line.replace("**", "")).to_string()
}

fn label_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label).then(|| line[label.len()..].trim())
}

fn contact_value(line: &str) -> Option<&str> {
    label_value(line, "contact information:").or_else(|| label_value(line, "contact:"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '[' || c == ']').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
