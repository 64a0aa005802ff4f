//! Wrapping and boundary helpers for the input box.
//!
//! Stateless; everything takes the buffer explicitly.

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before the box scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to the first content cell (border + padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

/// Wrap options matching the paragraph rendering of the box.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Inner content width for an outer width; 0 if the area is too narrow.
pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Number of wrapped lines `text` occupies, counting a trailing newline
/// as an extra (empty) line. Never less than 1.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

/// (line, column) of byte offset `pos` within the wrapped layout of `text`.
pub(super) fn cursor_line_col(text: &str, pos: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }

    let before = &text[..pos];
    let line = wrap_line_count(before, width).saturating_sub(1);

    // Column: characters since the start of the current wrapped segment.
    // textwrap drops trailing spaces, so count from the logical line instead.
    let logical_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let logical = &before[logical_start..];
    let segments = textwrap::wrap(logical, wrap_options(width));
    let consumed: usize = segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .map(|seg| seg.chars().count())
        .sum();
    let col = logical.chars().count().saturating_sub(consumed);

    (line, col as u16)
}

/// Byte offset of the character boundary before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary after `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word at or before `pos` (readline `backward-word`).
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let trimmed = before.trim_end_matches(|c: char| !is_word_char(c));
    trimmed
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_word_char(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

/// End of the word at or after `pos` (readline `forward-word`).
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let after = &text[pos..];
    let skipped = after.len() - after.trim_start_matches(|c: char| !is_word_char(c)).len();
    after[skipped..]
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map(|(i, _)| pos + skipped + i)
        .unwrap_or(text.len())
}
