//! Line filters applied before nesting.

use crate::SourceLine;

/// Comment marker. Only starts a comment at the beginning of a line or
/// after whitespace, so values like `http://host` survive.
const COMMENT: &str = "//";

/// Drop comments, keeping line numbers intact.
pub fn strip_comments<I>(lines: I) -> impl Iterator<Item = SourceLine>
where
    I: IntoIterator<Item = SourceLine>,
{
    lines.into_iter().map(|mut line| {
        let kept = strip_comment(&line.text).len();
        line.text.truncate(kept);
        line
    })
}

/// The part of `text` before its comment, if any, without trailing
/// whitespace. Text without a comment is returned unchanged.
pub fn strip_comment(text: &str) -> &str {
    match comment_start(text) {
        Some(start) => text[..start].trim_end(),
        None => text,
    }
}

/// Drop lines that contain only whitespace.
pub fn strip_empty_lines<I>(lines: I) -> impl Iterator<Item = SourceLine>
where
    I: IntoIterator<Item = SourceLine>,
{
    lines.into_iter().filter(|line| !line.text.trim().is_empty())
}

fn comment_start(text: &str) -> Option<usize> {
    text.match_indices(COMMENT)
        .map(|(i, _)| i)
        .find(|&i| text[..i].chars().next_back().map_or(true, char::is_whitespace))
}
