use std::sync::OnceLock;

use regex::Regex;

use super::types::{
    LineAttribution, NOT_COMMITTED_AUTHOR, UNCOMMITTED_AUTHOR, UNCOMMITTED_SUMMARY,
    UNKNOWN_AUTHOR,
};

/// Parse single-line `git blame --porcelain` output into a [`LineAttribution`].
///
/// The porcelain format for one line looks like:
/// ```text
/// <40-char sha> <orig_line> <final_line> <num_lines>
/// author <name>
/// author-mail <<email>>
/// author-time <epoch>
/// author-tz <tz>
/// committer <name>
/// ...
/// summary <text>
/// filename <path>
/// \t<line content>
/// ```
///
/// The first occurrence of each record wins. Bytes that are not UTF-8 are
/// replaced, since the blamed source line may use any encoding. Returns
/// `None` when there is no parseable `author-time` record.
pub fn parse_line_attribution(raw: &[u8]) -> Option<LineAttribution> {
    let input = String::from_utf8_lossy(raw);

    let mut commit: Option<String> = None;
    let mut author: Option<&str> = None;
    let mut author_mail: Option<&str> = None;
    let mut author_time: Option<Option<i64>> = None;
    let mut summary: Option<&str> = None;

    for line in input.lines() {
        // Content lines carry the source text, which may look like a record.
        if line.starts_with('\t') {
            continue;
        }
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if commit.is_none() {
            if let Some(sha) = header_sha(line) {
                commit = Some(sha.to_string());
                continue;
            }
        }

        if let Some(val) = line.strip_prefix("author-mail ") {
            author_mail.get_or_insert(val);
        } else if let Some(val) = line.strip_prefix("author-time ") {
            author_time.get_or_insert_with(|| val.trim().parse().ok());
        } else if let Some(val) = line.strip_prefix("author ") {
            author.get_or_insert(val);
        } else if let Some(val) = line.strip_prefix("summary ") {
            summary.get_or_insert(val);
        }
    }

    let author_time = author_time.flatten()?;
    let author = author.unwrap_or(UNKNOWN_AUTHOR);
    let is_uncommitted = author == NOT_COMMITTED_AUTHOR;

    let (author, summary) = if is_uncommitted {
        (UNCOMMITTED_AUTHOR, UNCOMMITTED_SUMMARY)
    } else {
        (author, summary.unwrap_or(""))
    };

    Some(LineAttribution {
        commit: commit.unwrap_or_default(),
        author: author.to_string(),
        author_mail: author_mail
            .map(|m| m.trim_start_matches('<').trim_end_matches('>').to_string()),
        author_time,
        summary: summary.to_string(),
        is_uncommitted,
    })
}

/// Return the commit id if `line` is a porcelain header.
///
/// A header starts with 40 hex characters followed by the original and final
/// line numbers, and optionally the number of lines in the group.
fn header_sha(line: &str) -> Option<&str> {
    static HEADER: OnceLock<Option<Regex>> = OnceLock::new();
    let re = HEADER
        .get_or_init(|| Regex::new(r"^([0-9a-fA-F]{40}) \d+ \d+(?: \d+)?$").ok())
        .as_ref()?;
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
