//! Typed scalar field extraction from a block span
//!
//! All lookups operate on an already-extracted block span, so a field in a
//! later sibling block can never be mistaken for the current block's field.
//! An absent field returns `None` and the caller supplies the default; a
//! field that is present but does not decode as the requested type is a
//! [`ParseError::MalformedField`] rather than a silent default.

use crate::error::ParseError;
use crate::parser::block::{is_ident_byte, skip_string, skip_whitespace};

/// Extracts a double-quoted string field, quotes stripped.
pub fn string_field(block: &str, key: &str) -> Result<Option<String>, ParseError> {
    let Some(value_at) = find_assignment(block, key) else {
        return Ok(None);
    };
    let bytes = block.as_bytes();
    if bytes.get(value_at) != Some(&b'"') {
        return Err(malformed(key, "quoted string"));
    }
    let after = skip_string(bytes, value_at);
    if bytes.get(after.wrapping_sub(1)) != Some(&b'"') || after == value_at + 1 {
        // Ran off the end of the block without a closing quote
        return Err(malformed(key, "quoted string"));
    }
    Ok(Some(block[value_at + 1..after - 1].to_string()))
}

/// Extracts a base-10 non-negative integer field.
pub fn int_field(block: &str, key: &str) -> Result<Option<u64>, ParseError> {
    let Some(value_at) = find_assignment(block, key) else {
        return Ok(None);
    };
    let bytes = block.as_bytes();
    let mut end = value_at;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == value_at {
        return Err(malformed(key, "integer"));
    }
    block[value_at..end]
        .parse()
        .map(Some)
        .map_err(|_| malformed(key, "integer"))
}

/// Extracts a `true`/`false` field, case-insensitive.
pub fn bool_field(block: &str, key: &str) -> Result<Option<bool>, ParseError> {
    let Some(value_at) = find_assignment(block, key) else {
        return Ok(None);
    };
    let bytes = block.as_bytes();
    let mut end = value_at;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    let word = &block[value_at..end];
    if word.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if word.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(malformed(key, "boolean"))
    }
}

/// Finds the first `key = value` assignment in the block and returns the
/// index of the first value character. The key must match as a whole
/// identifier (`cpu` never matches inside `vcpu`), and quoted strings are
/// skipped so a key-shaped substring inside a value is ignored.
fn find_assignment(block: &str, key: &str) -> Option<usize> {
    let bytes = block.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' {
            i = skip_string(bytes, i);
        } else if is_ident_byte(b) {
            let start = i;
            while i < bytes.len() && is_ident_byte(bytes[i]) {
                i += 1;
            }
            if &block[start..i] == key {
                let mut j = skip_whitespace(bytes, i);
                if bytes.get(j) == Some(&b'=') {
                    j = skip_whitespace(bytes, j + 1);
                    return Some(j);
                }
            }
        } else {
            i += 1;
        }
    }

    None
}

fn malformed(key: &str, expected: &'static str) -> ParseError {
    ParseError::MalformedField {
        key: key.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = r#"{
  ip            = "10.0.0.10"
  cpu           = 4
  cpu_affinity  = ""
  numa          = true
  ram_dedicated = 8192
  workload      = "etcd"
}"#;

    #[test]
    fn test_string_field() {
        assert_eq!(
            string_field(BLOCK, "ip").unwrap(),
            Some("10.0.0.10".to_string())
        );
        assert_eq!(string_field(BLOCK, "datastore_id").unwrap(), None);
    }

    #[test]
    fn test_string_field_present_but_empty() {
        // Distinct from absent
        assert_eq!(
            string_field(BLOCK, "cpu_affinity").unwrap(),
            Some(String::new())
        );
    }

    #[test]
    fn test_int_field() {
        assert_eq!(int_field(BLOCK, "cpu").unwrap(), Some(4));
        assert_eq!(int_field(BLOCK, "ram_dedicated").unwrap(), Some(8192));
        assert_eq!(int_field(BLOCK, "disk_size").unwrap(), None);
    }

    #[test]
    fn test_bool_field() {
        assert_eq!(bool_field(BLOCK, "numa").unwrap(), Some(true));
        assert_eq!(bool_field("{ numa = TRUE }", "numa").unwrap(), Some(true));
        assert_eq!(bool_field(BLOCK, "missing").unwrap(), None);
    }

    #[test]
    fn test_whole_word_key_match() {
        let block = "{ vcpu = 8\n  cpu = 2 }";
        assert_eq!(int_field(block, "cpu").unwrap(), Some(2));
    }

    #[test]
    fn test_key_inside_string_value_ignored() {
        let block = r#"{ note = "cpu = 99" cpu = 3 }"#;
        assert_eq!(int_field(block, "cpu").unwrap(), Some(3));
    }

    #[test]
    fn test_malformed_int_is_error() {
        let err = int_field("{ cpu = lots }", "cpu").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedField {
                key: "cpu".to_string(),
                expected: "integer",
            }
        );
    }

    #[test]
    fn test_malformed_bool_is_error() {
        assert!(bool_field("{ numa = maybe }", "numa").is_err());
    }

    #[test]
    fn test_malformed_string_is_error() {
        assert!(string_field("{ ip = 42 }", "ip").is_err());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let block = "{ cpu = 1\n  cpu = 2 }";
        assert_eq!(int_field(block, "cpu").unwrap(), Some(1));
    }
}
