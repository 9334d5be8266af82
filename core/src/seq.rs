//! Growable ordered sequences
//!
//! A Seq is at once a list literal, the reader's code tree and the
//! argument vector handed to natives.

use std::ops::Range;

use crate::value::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Seq {
    items: Vec<Value>,
}

impl Seq {
    pub fn new() -> Self {
        Seq { items: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Seq {
            items: Vec::with_capacity(cap),
        }
    }

    /// Build a sequence of Text values from host strings (e.g. process argv).
    pub fn from_strs<I, S>(strs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        strs.into_iter()
            .map(|s| Value::from(s.as_ref()))
            .collect()
    }

    /// Move a value to the end of the sequence.
    pub fn push(&mut self, value: Value) {
        debug_assert!(value.is_valid(), "pushing ill-formed value");
        self.items.push(value);
    }

    /// New sequence holding copies of the items in `range`.
    ///
    /// A range reaching outside of the sequence is a contract violation.
    pub fn slice(&self, range: Range<usize>) -> Seq {
        assert!(
            range.start <= range.end && range.end <= self.items.len(),
            "slice {range:?} outside of sequence of length {}",
            self.items.len()
        );
        Seq {
            items: self.items[range].to_vec(),
        }
    }

    /// Replace the item at `idx`, destroying the previous one.
    pub fn nth_set(&mut self, idx: usize, value: Value) {
        assert!(
            idx < self.items.len(),
            "index {idx} outside of sequence of length {}",
            self.items.len()
        );
        self.items[idx] = value;
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.items.get(idx)
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    pub fn find(&self, value: &Value) -> Option<usize> {
        self.items.iter().position(|item| item == value)
    }

    pub fn has(&self, value: &Value) -> bool {
        self.find(value).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    pub fn is_valid(&self) -> bool {
        self.items.len() <= self.items.capacity() && self.items.iter().all(Value::is_valid)
    }
}

impl From<Vec<Value>> for Seq {
    fn from(items: Vec<Value>) -> Self {
        Seq { items }
    }
}

impl FromIterator<Value> for Seq {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Seq {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Seq {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Seq {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
