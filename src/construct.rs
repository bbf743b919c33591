//! Constructed values.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.
//!
//! A constructed value carries other encoded values as its content. The
//! common machinery for the ordered child list lives in [`Construct`];
//! SEQUENCE and SET values use it directly, while [`ExplicitTag`] and
//! [`UnknownConstructed`] wrap it with their own identifier handling.

use std::cell::Cell;
use std::slice;
use bytes::Bytes;
use crate::error::{DecodeError, ErrorKind, Pos};
use crate::ident::{Class, Ident, Tag};
use crate::source::Source;
use crate::value::Value;


//------------ Construct -----------------------------------------------------

/// An ordered list of child values.
///
/// The content of a constructed value is the concatenation of its
/// children's full encodings in insertion order. The construct keeps the
/// total length of that content cached since computing it requires walking
/// the whole subtree; the cache is dropped whenever a child is appended.
#[derive(Clone, Debug, Default)]
pub struct Construct {
    /// The child values in insertion order.
    children: Vec<Value>,

    /// The cached length of the encoded content.
    content_len: Cell<Option<usize>>,
}

impl Construct {
    /// Creates an empty construct.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child value.
    pub fn push(&mut self, child: Value) {
        self.content_len.set(None);
        self.children.push(child);
    }

    /// Returns the child values.
    pub fn children(&self) -> &[Value] {
        &self.children
    }

    /// Returns the child value at the given index, if present.
    pub fn child(&self, index: usize) -> Option<&Value> {
        self.children.get(index)
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns whether the construct has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the length of the encoded content.
    pub(crate) fn content_len(&self) -> usize {
        if let Some(len) = self.content_len.get() {
            return len
        }
        let len = self.children.iter().map(Value::encoded_len).sum();
        self.content_len.set(Some(len));
        len
    }

    /// Appends the encoded content to the end of `target`.
    pub(crate) fn append_content(&self, target: &mut Vec<u8>) {
        for child in &self.children {
            child.append_encoded(target)
        }
    }

    /// Decodes `len` octets of content into a child list.
    ///
    /// The declared length has already been checked against the remaining
    /// input, so every child read stays within the source. A child that
    /// reads past the declared content or content left over after the
    /// last child both fail with
    /// [`ErrorKind::InconsistentConstructLength`] referring to `pos`, the
    /// position at which the construct began.
    pub(crate) fn take_from(
        source: &mut Source, len: usize, pos: Pos
    ) -> Result<Self, DecodeError> {
        let end = source.offset() + len;
        let mut res = Construct::new();
        while source.offset() < end {
            res.push(Value::take_from(source)?);
            if source.offset() > end {
                return Err(DecodeError::new(
                    ErrorKind::InconsistentConstructLength, pos
                ))
            }
        }
        res.content_len.set(Some(len));
        Ok(res)
    }
}

impl From<Vec<Value>> for Construct {
    fn from(children: Vec<Value>) -> Self {
        Construct { children, content_len: Cell::new(None) }
    }
}

impl FromIterator<Value> for Construct {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Vec::from_iter(iter).into()
    }
}

impl<'a> IntoIterator for &'a Construct {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl PartialEq for Construct {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
    }
}

impl Eq for Construct { }


//------------ ExplicitTag ---------------------------------------------------

/// A context-specific constructed wrapper around other values.
///
/// Explicit tagging wraps the full encoding of zero or more values in a
/// constructed value with a context-specific tag chosen by the
/// application. Apart from its identifier the wrapper behaves exactly
/// like any other construct.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExplicitTag {
    /// The context-specific tag number.
    number: u32,

    /// The wrapped values.
    inner: Construct,
}

impl ExplicitTag {
    /// Creates a new wrapper with the given tag number.
    pub fn new(number: u32, inner: impl Into<Construct>) -> Self {
        ExplicitTag { number, inner: inner.into() }
    }

    /// Returns the tag number of the wrapper.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the wrapped values.
    pub fn inner(&self) -> &Construct {
        &self.inner
    }

    /// Returns the wrapped values for modification.
    pub fn inner_mut(&mut self) -> &mut Construct {
        &mut self.inner
    }

    /// Returns the identifier octets of the wrapper.
    pub(crate) fn ident(&self) -> Ident {
        Ident::new(Class::Context, true, self.number)
    }
}


//------------ Unknown -------------------------------------------------------

/// A primitive value with a tag we have no codec for.
///
/// The value keeps its identifier and content octets verbatim so that
/// re-encoding reproduces the original input byte for byte.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Unknown {
    /// The identifier octets as they appeared in the input.
    ident: Ident,

    /// The raw content octets.
    content: Bytes,
}

impl Unknown {
    /// Creates a new unknown value from its parts.
    pub(crate) fn new(ident: Ident, content: Bytes) -> Self {
        Unknown { ident, content }
    }

    /// Returns the identifier octets of the value.
    pub(crate) fn ident(&self) -> Ident {
        self.ident
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.ident.tag()
    }

    /// Returns the raw content octets.
    pub fn content(&self) -> &[u8] {
        self.content.as_ref()
    }
}


//------------ UnknownConstructed --------------------------------------------

/// A constructed value with a tag we have no codec for.
///
/// Whether a value is constructed is taken from the constructed bit of
/// its identifier octets alone. The content of a constructed value is
/// well-formed nested values by definition, so an unknown constructed
/// value still decodes its children recursively and only preserves the
/// identifier verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownConstructed {
    /// The identifier octets as they appeared in the input.
    ident: Ident,

    /// The child values.
    inner: Construct,
}

impl UnknownConstructed {
    /// Creates a new unknown constructed value from its parts.
    pub(crate) fn new(ident: Ident, inner: Construct) -> Self {
        UnknownConstructed { ident, inner }
    }

    /// Returns the identifier octets of the value.
    pub(crate) fn ident(&self) -> Ident {
        self.ident
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.ident.tag()
    }

    /// Returns the child values.
    pub fn inner(&self) -> &Construct {
        &self.inner
    }

    /// Returns the child values for modification.
    pub fn inner_mut(&mut self) -> &mut Construct {
        &mut self.inner
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn content_len_tracks_mutation() {
        let mut construct = Construct::new();
        assert_eq!(construct.content_len(), 0);

        // Appending after the length has been observed must be reflected.
        construct.push(Value::from(false));
        assert_eq!(construct.content_len(), 3);
        construct.push(Value::from(300));
        assert_eq!(construct.content_len(), 7);
        assert_eq!(construct.len(), 2);
    }

    #[test]
    fn construct_equality() {
        let left = Construct::from(vec![Value::from(1), Value::Null]);
        let mut right = Construct::new();
        right.push(Value::from(1));

        // Observing the length caches it on one side only; equality
        // still must only look at the children.
        let _ = left.content_len();
        assert_ne!(left, right);
        right.push(Value::Null);
        assert_eq!(left, right);
    }

    #[test]
    fn iteration() {
        let construct = Construct::from(
            vec![Value::from(true), Value::Null]
        );
        let tags: Vec<_> = construct.into_iter().map(Value::tag).collect();
        assert_eq!(tags, [Tag::BOOLEAN, Tag::NULL]);
        assert_eq!(construct.child(1), Some(&Value::Null));
        assert_eq!(construct.child(2), None);
    }
}
