//! Structural block extraction
//!
//! Recovers nested `name = { ... }` blocks from raw configuration text by
//! brace-depth counting. The scanner treats the contents of double-quoted
//! strings as opaque, so a brace inside a string value is never counted and
//! never terminates a block early. No grammar is evaluated; the only
//! structure recognized is balanced braces and quoted strings with `\"`
//! escapes.

use crate::error::ParseError;

/// Given the index of an opening brace, returns the index one past the
/// matching closing brace.
///
/// Works at any nesting depth. Returns [`ParseError::UnterminatedBlock`]
/// when end of input is reached before the depth returns to zero.
pub fn block_span(text: &str, open: usize) -> Result<usize, ParseError> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::UnterminatedBlock { offset: open })
}

/// Finds a top-level `name = {` assignment and returns the brace-delimited
/// block span, or `None` when no such assignment exists.
///
/// The name must match as a whole identifier, so searching for `size` never
/// matches `disk_size`. Quoted strings are skipped during the search.
pub fn find_named_block<'a>(text: &'a str, name: &str) -> Result<Option<&'a str>, ParseError> {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' {
            // Skip the whole string literal
            i = skip_string(bytes, i);
        } else if is_ident_byte(b) {
            let start = i;
            while i < bytes.len() && is_ident_byte(bytes[i]) {
                i += 1;
            }
            if &text[start..i] == name {
                if let Some(open) = assignment_open_brace(bytes, i) {
                    let end = block_span(text, open)?;
                    return Ok(Some(&text[open..end]));
                }
            }
        } else {
            i += 1;
        }
    }

    Ok(None)
}

/// Enumerates the direct `"name" = { ... }` children of a block.
///
/// `block` must be a full brace-delimited span as returned by [`block_span`]
/// or [`find_named_block`]. Each child block is consumed wholesale, so keys
/// nested deeper than one level are never reported.
pub fn named_children(block: &str) -> Result<Vec<(String, &str)>, ParseError> {
    let bytes = block.as_bytes();
    let mut children = Vec::new();
    // Skip the block's own opening brace
    let mut i = 1;

    while i < bytes.len() {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }
        let key_start = i + 1;
        let after_quote = skip_string(bytes, i);
        // skip_string stops one past the closing quote
        let key_end = after_quote.saturating_sub(1);

        match assignment_open_brace(bytes, after_quote) {
            Some(open) => {
                let end = block_span(block, open)?;
                children.push((block[key_start..key_end].to_string(), &block[open..end]));
                i = end;
            }
            // A quoted scalar value, not a child block
            None => i = after_quote,
        }
    }

    Ok(children)
}

/// After an identifier or quoted key ending at `pos`, returns the index of
/// the opening brace of an `= {` assignment, or `None` when the text that
/// follows is not one.
fn assignment_open_brace(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut i = skip_whitespace(bytes, pos);
    if bytes.get(i) != Some(&b'=') {
        return None;
    }
    i = skip_whitespace(bytes, i + 1);
    (bytes.get(i) == Some(&b'{')).then_some(i)
}

/// Advances past a string literal whose opening quote is at `quote`,
/// honoring `\"` escapes. Returns the index one past the closing quote, or
/// the end of input for an unterminated string.
pub(crate) fn skip_string(bytes: &[u8], quote: usize) -> usize {
    let mut i = quote + 1;
    let mut escaped = false;
    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            return i;
        }
    }
    i
}

pub(crate) fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
