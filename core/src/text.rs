//! Immutable hashed byte strings
//!
//! Text is used for every string-like datum in Iris: symbols read from
//! source, string literals, error messages and environment keys. The bytes
//! carry no encoding by themselves; the hash is computed once at
//! construction and reused for every lookup.

use std::fmt;
use std::hash::{Hash, Hasher};

use unicode_segmentation::UnicodeSegmentation;

const DJB2_SEED: u64 = 5381;

/// djb2 multiplicative string hash: `hash = hash * 33 + byte`.
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |hash, &byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte))
    })
}

#[derive(Clone)]
pub struct Text {
    bytes: Box<[u8]>,
    hash: u64,
    literal: bool,
}

impl Text {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        let bytes = bytes.into();
        let hash = djb2(&bytes);
        Text {
            bytes,
            hash,
            literal: false,
        }
    }

    /// A string literal as written in source. Resolution never looks it up.
    pub fn literal(bytes: impl Into<Box<[u8]>>) -> Self {
        Text {
            literal: true,
            ..Text::new(bytes)
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow the text as `str` if its bytes are UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn hash_key(&self) -> u64 {
        self.hash
    }

    /// Byte at `idx`. Indexing past the end is a contract violation.
    pub fn nth(&self, idx: usize) -> u8 {
        assert!(
            idx < self.bytes.len(),
            "index {idx} outside of text of length {}",
            self.bytes.len()
        );
        self.bytes[idx]
    }

    /// Number of user-perceived characters (extended grapheme clusters).
    pub fn char_count(&self) -> usize {
        String::from_utf8_lossy(&self.bytes).graphemes(true).count()
    }

    /// The cached hash still matches the bytes.
    pub fn is_valid(&self) -> bool {
        self.hash == djb2(&self.bytes)
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::new(Vec::new())
    }
}

#[cfg(not(feature = "secure"))]
impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

#[cfg(feature = "secure")]
impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Text {}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::new(s.as_bytes())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::new(s.into_bytes())
    }
}

impl From<&[u8]> for Text {
    fn from(bytes: &[u8]) -> Self {
        Text::new(bytes)
    }
}

impl From<Vec<u8>> for Text {
    fn from(bytes: Vec<u8>) -> Self {
        Text::new(bytes)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text({:?})", String::from_utf8_lossy(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_djb2_known_values() {
        assert_eq!(djb2(b""), 5381);
        assert_eq!(djb2(b"a"), 5381 * 33 + 97);
        assert_eq!(djb2(b"ab"), (5381 * 33 + 97) * 33 + 98);
    }

    #[test]
    fn test_hash_is_cached_at_construction() {
        let text = Text::from("echo");
        assert_eq!(text.hash_key(), djb2(b"echo"));
        assert!(text.is_valid());
    }

    #[test]
    fn test_empty_text() {
        let text = Text::default();
        assert!(text.is_empty());
        assert_eq!(text.len(), 0);
        assert_eq!(text.hash_key(), 5381);
    }

    #[test]
    fn test_equality_and_copy() {
        let a = Text::from("quote!");
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a.as_bytes().as_ptr(), b.as_bytes().as_ptr());
        assert_ne!(a, Text::from("quote"));
    }

    #[test]
    fn test_nth() {
        let text = Text::from("abc");
        assert_eq!(text.nth(0), b'a');
        assert_eq!(text.nth(2), b'c');
    }

    #[test]
    #[should_panic(expected = "outside of text")]
    fn test_nth_out_of_bounds_is_fatal() {
        Text::from("abc").nth(3);
    }

    #[test]
    fn test_char_count_counts_graphemes() {
        assert_eq!(Text::from("héllo").char_count(), 5);
        assert_eq!(Text::from("héllo").len(), 6);
        assert_eq!(Text::from("e\u{301}").char_count(), 1);
    }

    #[test]
    fn test_literal_marker_survives_copy_but_not_equality() {
        let lit = Text::literal(b"echo".as_slice());
        assert!(lit.is_literal());
        assert!(lit.clone().is_literal());
        assert!(!Text::from("echo").is_literal());
        assert_eq!(lit, Text::from("echo"));
        assert_eq!(lit.hash_key(), djb2(b"echo"));
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Text::from("iris").as_str(), Some("iris"));
        assert_eq!(Text::from(vec![0xff, 0xfe]).as_str(), None);
    }
}
