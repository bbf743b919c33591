//! The tree of decoded values.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.
//!
//! Every encoded value, whatever its type, is one [`Value`]. Decoding
//! starts at [`Value::decode`] which reads the identifier and length
//! octets and then dispatches on the tag: registered universal tags go to
//! their leaf codec, constructed values recurse through
//! [`Construct`][crate::Construct], and everything else is preserved
//! verbatim as an unknown value.

use bytes::Bytes;
use crate::bigint::Int;
use crate::construct::{Construct, ExplicitTag, Unknown, UnknownConstructed};
use crate::error::{DecodeError, ErrorKind, Pos};
use crate::ident::{Class, Ident, Tag};
use crate::int;
use crate::length::Length;
use crate::source::Source;
use crate::string::{CharString, StrKind};


//------------ Value ---------------------------------------------------------

/// A single ASN.1 value of any supported type.
///
/// Values form a tree: constructed variants carry child values, primitive
/// variants carry their payload directly. Equality between values is
/// defined as equality of their full binary encodings.
#[derive(Clone, Debug)]
pub enum Value {
    /// A BOOLEAN value.
    Boolean(bool),

    /// An INTEGER value.
    Integer(Int),

    /// A NULL value.
    Null,

    /// An ENUMERATED value.
    Enumerated(Int),

    /// A restricted character string value of any supported kind.
    CharString(CharString),

    /// A SEQUENCE or SEQUENCE OF value.
    Sequence(Construct),

    /// A SET or SET OF value.
    Set(Construct),

    /// An explicitly tagged value.
    ExplicitlyTagged(ExplicitTag),

    /// A primitive value with an unregistered tag.
    Unknown(Unknown),

    /// A constructed value with an unregistered tag.
    UnknownConstructed(UnknownConstructed),
}

/// # Decoding
///
impl Value {
    /// Decodes a single value from the start of `data`.
    ///
    /// On success, returns the value together with the number of octets
    /// its encoding occupied. Input past that point is not touched, so
    /// several values can be read from one buffer by slicing.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        let mut source = Source::new(data);
        let value = Self::take_from(&mut source)?;
        Ok((value, source.offset()))
    }

    /// Takes a single value from the beginning of a source.
    pub(crate) fn take_from(source: &mut Source) -> Result<Self, DecodeError> {
        let start = source.pos();
        let ident = Ident::take_from(source)?;
        let length = Length::take_from(source)?.to_usize();

        if ident.is_constructed() {
            let tag = ident.tag();
            if tag == Tag::SEQUENCE {
                Construct::take_from(source, length, start).map(Value::Sequence)
            }
            else if tag == Tag::SET {
                Construct::take_from(source, length, start).map(Value::Set)
            }
            else if tag.class() == Class::Context {
                let inner = Construct::take_from(source, length, start)?;
                Ok(Value::ExplicitlyTagged(
                    ExplicitTag::new(tag.number(), inner)
                ))
            }
            else {
                let inner = Construct::take_from(source, length, start)?;
                Ok(Value::UnknownConstructed(
                    UnknownConstructed::new(ident, inner)
                ))
            }
        }
        else {
            let pos = source.pos();
            let content = source.take_slice(length)?;
            if ident.class() == Class::Universal {
                if let Some(decode) = registered(ident.number()) {
                    return decode(ident.tag(), content, pos)
                }
            }
            Ok(Value::Unknown(Unknown::new(
                ident, Bytes::copy_from_slice(content)
            )))
        }
    }
}

/// # Encoding
///
impl Value {
    /// Returns the full binary encoding of the value.
    pub fn encode(&self) -> Bytes {
        let mut target = Vec::with_capacity(self.encoded_len());
        self.append_encoded(&mut target);
        target.into()
    }

    /// Appends the full binary encoding to the end of `target`.
    pub fn append_encoded(&self, target: &mut Vec<u8>) {
        self.ident().append_encoded(target);
        Length::new(self.content_len()).append_encoded(target);
        self.append_content(target);
    }

    /// Returns the number of octets the full encoding will occupy.
    pub fn encoded_len(&self) -> usize {
        let content_len = self.content_len();
        self.ident().encoded_len()
            + Length::new(content_len).encoded_len()
            + content_len
    }

    /// Returns the number of content octets of the encoding.
    pub fn content_len(&self) -> usize {
        match *self {
            Value::Boolean(_) => 1,
            Value::Integer(ref value) | Value::Enumerated(ref value) => {
                int::encode(value.as_backend()).len()
            }
            Value::Null => 0,
            Value::CharString(ref value) => value.len(),
            Value::Sequence(ref inner) | Value::Set(ref inner) => {
                inner.content_len()
            }
            Value::ExplicitlyTagged(ref value) => value.inner().content_len(),
            Value::Unknown(ref value) => value.content().len(),
            Value::UnknownConstructed(ref value) => {
                value.inner().content_len()
            }
        }
    }

    /// Appends the content octets of the encoding to the end of `target`.
    fn append_content(&self, target: &mut Vec<u8>) {
        match *self {
            Value::Boolean(true) => target.push(0xFF),
            Value::Boolean(false) => target.push(0x00),
            Value::Integer(ref value) | Value::Enumerated(ref value) => {
                target.extend_from_slice(&int::encode(value.as_backend()))
            }
            Value::Null => { }
            Value::CharString(ref value) => {
                target.extend_from_slice(value.as_bytes())
            }
            Value::Sequence(ref inner) | Value::Set(ref inner) => {
                inner.append_content(target)
            }
            Value::ExplicitlyTagged(ref value) => {
                value.inner().append_content(target)
            }
            Value::Unknown(ref value) => {
                target.extend_from_slice(value.content())
            }
            Value::UnknownConstructed(ref value) => {
                value.inner().append_content(target)
            }
        }
    }

    /// Returns the identifier octets of the value.
    pub fn ident(&self) -> Ident {
        match *self {
            Value::Boolean(_) => Ident::from_tag(Tag::BOOLEAN, false),
            Value::Integer(_) => Ident::from_tag(Tag::INTEGER, false),
            Value::Null => Ident::from_tag(Tag::NULL, false),
            Value::Enumerated(_) => Ident::from_tag(Tag::ENUMERATED, false),
            Value::CharString(ref value) => {
                Ident::from_tag(value.kind().tag(), false)
            }
            Value::Sequence(_) => Ident::from_tag(Tag::SEQUENCE, true),
            Value::Set(_) => Ident::from_tag(Tag::SET, true),
            Value::ExplicitlyTagged(ref value) => value.ident(),
            Value::Unknown(ref value) => value.ident(),
            Value::UnknownConstructed(ref value) => value.ident(),
        }
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.ident().tag()
    }
}

/// # Tree Access
///
impl Value {
    /// Creates a SEQUENCE value from a list of children.
    pub fn sequence(children: Vec<Value>) -> Self {
        Value::Sequence(children.into())
    }

    /// Creates a SET value from a list of children.
    pub fn set(children: Vec<Value>) -> Self {
        Value::Set(children.into())
    }

    /// Returns whether the value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.ident().is_constructed()
    }

    /// Returns the child values.
    ///
    /// For primitive values, the returned slice is empty.
    pub fn children(&self) -> &[Value] {
        match *self {
            Value::Sequence(ref inner) | Value::Set(ref inner) => {
                inner.children()
            }
            Value::ExplicitlyTagged(ref value) => value.inner().children(),
            Value::UnknownConstructed(ref value) => value.inner().children(),
            _ => &[]
        }
    }

    /// Appends a child value.
    ///
    /// # Panics
    ///
    /// Panics when called on a primitive value.
    pub fn push(&mut self, child: Value) {
        match *self {
            Value::Sequence(ref mut inner) | Value::Set(ref mut inner) => {
                inner.push(child)
            }
            Value::ExplicitlyTagged(ref mut value) => {
                value.inner_mut().push(child)
            }
            Value::UnknownConstructed(ref mut value) => {
                value.inner_mut().push(child)
            }
            _ => panic!("appending a child to a primitive value")
        }
    }
}


//--- From

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<Int> for Value {
    fn from(value: Int) -> Self {
        Value::Integer(value)
    }
}

impl From<CharString> for Value {
    fn from(value: CharString) -> Self {
        Value::CharString(value)
    }
}


//--- PartialEq and Eq

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for Value { }


//------------ The tag registry ----------------------------------------------

/// The decode function of a leaf codec.
///
/// The function receives the tag the content was announced with, the
/// content octets, and the position of the first content octet for error
/// reporting.
type LeafDecoder = fn(Tag, &[u8], Pos) -> Result<Value, DecodeError>;

/// Returns the leaf codec registered for a universal tag number.
///
/// Only primitive values are dispatched through the registry; constructed
/// values are matched directly in [`Value::take_from`]. A tag number
/// without a registered codec results in an [`Unknown`] value.
fn registered(number: u32) -> Option<LeafDecoder> {
    match number {
        1 => Some(decode_boolean),
        2 => Some(decode_integer),
        5 => Some(decode_null),
        10 => Some(decode_enumerated),
        12 | 18 | 19 | 22 | 26 => Some(decode_string),
        _ => None
    }
}

/// Decodes the content of a BOOLEAN value.
///
/// The single content octet is 0xFF for true; everything else reads as
/// false under BER rules.
fn decode_boolean(
    tag: Tag, content: &[u8], pos: Pos
) -> Result<Value, DecodeError> {
    if content.len() != 1 {
        return Err(DecodeError::new(
            ErrorKind::InvalidLength { tag, found: content.len() }, pos
        ))
    }
    Ok(Value::Boolean(content[0] == 0xFF))
}

/// Decodes the content of an INTEGER value.
fn decode_integer(
    tag: Tag, content: &[u8], pos: Pos
) -> Result<Value, DecodeError> {
    int::decode(tag, content, pos).map(
        |value| Value::Integer(Int::from_backend(value))
    )
}

/// Decodes the content of a NULL value.
fn decode_null(
    tag: Tag, content: &[u8], pos: Pos
) -> Result<Value, DecodeError> {
    if !content.is_empty() {
        return Err(DecodeError::new(
            ErrorKind::InvalidLength { tag, found: content.len() }, pos
        ))
    }
    Ok(Value::Null)
}

/// Decodes the content of an ENUMERATED value.
fn decode_enumerated(
    tag: Tag, content: &[u8], pos: Pos
) -> Result<Value, DecodeError> {
    int::decode(tag, content, pos).map(
        |value| Value::Enumerated(Int::from_backend(value))
    )
}

/// Decodes the content of any of the character string values.
fn decode_string(
    tag: Tag, content: &[u8], pos: Pos
) -> Result<Value, DecodeError> {
    let kind = match StrKind::from_tag_number(tag.number()) {
        Some(kind) => kind,
        None => unreachable!("registry only routes string tags here"),
    };
    CharString::take_content(kind, content, pos).map(Value::CharString)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn decode(data: &[u8]) -> Value {
        let (value, consumed) = Value::decode(data).unwrap();
        assert_eq!(consumed, data.len(), "input {data:?}");
        value
    }

    fn decode_err(data: &[u8]) -> DecodeError {
        Value::decode(data).unwrap_err()
    }

    fn assert_roundtrip(data: &[u8]) -> Value {
        let value = decode(data);
        assert_eq!(value.encode(), data, "re-encode of {data:?}");
        assert_eq!(value.encoded_len(), data.len());
        value
    }

    #[test]
    fn decode_integers() {
        assert_eq!(decode(b"\x02\x01\x00"), Value::from(0));
        assert_eq!(decode(b"\x02\x02\x00\x80"), Value::from(128));
        assert_eq!(decode(b"\x02\x01\x80"), Value::from(-128));
        assert_eq!(
            decode(b"\x02\x09\x01\x00\x00\x00\x00\x00\x00\x00\x00"),
            Value::from(Int::from(2).pow(64))
        );
    }

    #[test]
    fn decode_sequence() {
        let value = decode(b"\x30\x06\x01\x01\x00\x02\x01\x03");
        assert_eq!(
            value,
            Value::sequence(vec![Value::from(false), Value::from(3)])
        );
        assert_eq!(value.children().len(), 2);
        assert_eq!(value.children()[0], Value::Boolean(false));
        assert_eq!(value.children()[1], Value::Integer(Int::from(3)));
    }

    #[test]
    fn decode_rejects_non_minimal_integer() {
        let err = decode_err(b"\x02\x02\x00\x01");
        assert_eq!(err.kind(), ErrorKind::NonMinimalEncoding);
        assert_eq!(err.pos(), 2.into());
    }

    #[test]
    fn decode_rejects_indefinite_length() {
        let err = decode_err(b"\x30\x80");
        assert_eq!(err.kind(), ErrorKind::LengthOverflow);
        assert_eq!(err.pos(), 1.into());
    }

    #[test]
    fn decode_boolean_and_null() {
        assert_eq!(decode(b"\x01\x01\xFF"), Value::Boolean(true));
        assert_eq!(decode(b"\x01\x01\x00"), Value::Boolean(false));
        // BER: anything other than 0xFF reads as false.
        assert_eq!(decode(b"\x01\x01\x01"), Value::Boolean(false));
        assert_eq!(decode(b"\x05\x00"), Value::Null);

        assert_eq!(
            decode_err(b"\x01\x02\x00\x00").kind(),
            ErrorKind::InvalidLength { tag: Tag::BOOLEAN, found: 2 }
        );
        assert_eq!(
            decode_err(b"\x05\x01\x00").kind(),
            ErrorKind::InvalidLength { tag: Tag::NULL, found: 1 }
        );
    }

    #[test]
    fn decode_strings() {
        let value = decode(b"\x13\x05Hello");
        match value {
            Value::CharString(ref s) => {
                assert_eq!(s.kind(), StrKind::Printable);
                assert_eq!(s.to_str(), Some("Hello"));
            }
            _ => panic!("expected a character string, got {value:?}")
        }
        assert_roundtrip(b"\x0C\x02\xC3\xA4");
        assert_roundtrip(b"\x12\x03123");
        assert_roundtrip(b"\x16\x07a@b.com");
        assert_roundtrip(b"\x1A\x03x y");

        let err = decode_err(b"\x12\x03\x31\x41\x33");
        assert_eq!(
            err.kind(),
            ErrorKind::IllegalCharacter { kind: StrKind::Numeric }
        );
        assert_eq!(err.pos(), 2.into());
    }

    #[test]
    fn decode_explicit_tag() {
        // [1] EXPLICIT wrapping INTEGER 5.
        let value = assert_roundtrip(b"\xA1\x03\x02\x01\x05");
        match value {
            Value::ExplicitlyTagged(ref wrapper) => {
                assert_eq!(wrapper.number(), 1);
                assert_eq!(wrapper.inner().len(), 1);
                assert_eq!(
                    wrapper.inner().child(0), Some(&Value::from(5))
                );
            }
            _ => panic!("expected an explicit tag, got {value:?}")
        }

        // An empty wrapper and one with two children.
        assert_roundtrip(b"\xA0\x00");
        assert_roundtrip(b"\xA2\x05\x01\x01\xFF\x05\x00");
    }

    #[test]
    fn unknown_primitive_fidelity() {
        // OCTET STRING has no registered codec.
        let value = assert_roundtrip(b"\x04\x03\x01\x02\x03");
        match value {
            Value::Unknown(ref inner) => {
                assert_eq!(inner.tag(), Tag::OCTET_STRING);
                assert_eq!(inner.content(), b"\x01\x02\x03");
            }
            _ => panic!("expected an unknown value, got {value:?}")
        }

        // A private-class tag in high-tag-number form.
        let value = assert_roundtrip(b"\xDF\x82\x14\x02\xBE\xEF");
        assert!(matches!(value, Value::Unknown(_)));
        assert!(!value.is_constructed());
    }

    #[test]
    fn unknown_constructed_fidelity() {
        // An application-class constructed value; context class would
        // become an explicit tag instead.
        let value = assert_roundtrip(b"\x6A\x05\x02\x01\x2A\x05\x00");
        match value {
            Value::UnknownConstructed(ref inner) => {
                assert_eq!(inner.tag().class(), Class::Application);
                assert_eq!(inner.tag().number(), 10);
                assert_eq!(inner.inner().len(), 2);
            }
            _ => panic!("expected unknown constructed, got {value:?}")
        }

        // High-tag-number form on a constructed private-class value.
        let value = assert_roundtrip(b"\xFF\x81\x00\x03\x02\x01\x07");
        assert!(matches!(value, Value::UnknownConstructed(_)));
        assert_eq!(value.children().len(), 1);
    }

    #[test]
    fn inconsistent_construct_length() {
        // The declared three octets end in the middle of the child.
        let err = decode_err(b"\x30\x03\x02\x03\x01\x02\x03");
        assert_eq!(err.kind(), ErrorKind::InconsistentConstructLength);
        assert_eq!(err.pos(), 0.into());

        // Nested: the inner sequence is the one that is off.
        let err = decode_err(b"\x30\x07\x05\x00\x30\x03\x02\x03\x01\x02\x03");
        assert_eq!(err.kind(), ErrorKind::InconsistentConstructLength);
        assert_eq!(err.pos(), 4.into());
    }

    #[test]
    fn truncated_content() {
        assert_eq!(
            decode_err(b"\x02\x05\x01\x02").kind(),
            ErrorKind::LengthExceedsInput
        );
        assert_eq!(decode_err(b"\x02").kind(), ErrorKind::TruncatedInput);
        assert_eq!(decode_err(b"").kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn encode_built_values() {
        let mut value = Value::sequence(vec![Value::from(true)]);
        value.push(Value::from(127));
        value.push(Value::Null);
        assert_eq!(
            value.encode(),
            b"\x30\x08\x01\x01\xFF\x02\x01\x7F\x05\x00".as_ref()
        );

        let value = Value::set(vec![Value::from(-1)]);
        assert_eq!(value.encode(), b"\x31\x03\x02\x01\xFF".as_ref());

        let value = Value::ExplicitlyTagged(
            ExplicitTag::new(7, vec![Value::Null])
        );
        assert_eq!(value.encode(), b"\xA7\x02\x05\x00".as_ref());
    }

    #[test]
    fn long_form_length_roundtrip() {
        // Forty integers of five octets each need a long form length.
        let mut value = Value::sequence(Vec::new());
        for i in 0..40 {
            value.push(Value::from(0x12_3456 + i));
        }
        let data = value.encode();
        assert_eq!(&data[..3], b"\x30\x81\xC8");
        assert_eq!(decode(&data), value);
    }

    #[test]
    fn nested_sequences() {
        let data = b"\x30\x0B\x30\x03\x02\x01\x01\x30\x04\x02\x02\x04\xD2";
        let value = assert_roundtrip(data);
        assert_eq!(value.children().len(), 2);
        assert_eq!(
            value.children()[1].children()[0],
            Value::from(1234)
        );
    }

    #[test]
    fn value_equality_is_encoding_equality() {
        // Integer and Enumerated share content but differ in tag.
        assert_ne!(
            Value::Integer(Int::from(1)), Value::Enumerated(Int::from(1))
        );
        // Sequence and Set likewise.
        assert_ne!(
            Value::sequence(vec![Value::Null]),
            Value::set(vec![Value::Null])
        );
        assert_eq!(
            Value::sequence(vec![Value::from(5)]),
            decode(b"\x30\x03\x02\x01\x05")
        );
    }

    #[test]
    fn empty_constructs() {
        assert_eq!(decode(b"\x30\x00"), Value::sequence(Vec::new()));
        assert_eq!(decode(b"\x31\x00"), Value::set(Vec::new()));
        assert!(decode(b"\x30\x00").children().is_empty());
    }
}
