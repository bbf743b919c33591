//! Restricted character string values.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.
//!
//! All restricted character string types share one content encoding: the
//! raw octets of the string, one octet per character. They only differ in
//! their tag and in which characters they permit. We therefore implement
//! them as a single generic codec, [`CharString`], parameterized by a
//! [`StrKind`] that supplies the tag and the [`CharSet`] describing the
//! permitted characters.

use std::fmt;
use bytes::Bytes;
use crate::error::{CharSetError, DecodeError, ErrorKind, Pos};
use crate::ident::Tag;


//------------ StrKind -------------------------------------------------------

/// The character string types known to the codec.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StrKind {
    /// UTF8String, any content.
    Utf8,

    /// NumericString, digits and space.
    Numeric,

    /// PrintableString, letters, digits, space and a few marks.
    Printable,

    /// IA5String, any octet below 0x80.
    Ia5,

    /// VisibleString, any content.
    //
    //  The encodable characters of this type are not currently checked.
    Visible,
}

impl StrKind {
    /// Returns the kind for a universal tag number, if there is one.
    pub(crate) fn from_tag_number(number: u32) -> Option<Self> {
        match number {
            12 => Some(StrKind::Utf8),
            18 => Some(StrKind::Numeric),
            19 => Some(StrKind::Printable),
            22 => Some(StrKind::Ia5),
            26 => Some(StrKind::Visible),
            _ => None
        }
    }

    /// Returns the tag of the string type.
    pub fn tag(self) -> Tag {
        match self {
            StrKind::Utf8 => Tag::UTF8_STRING,
            StrKind::Numeric => Tag::NUMERIC_STRING,
            StrKind::Printable => Tag::PRINTABLE_STRING,
            StrKind::Ia5 => Tag::IA5_STRING,
            StrKind::Visible => Tag::VISIBLE_STRING,
        }
    }

    /// Returns the character set of the string type.
    pub fn charset(self) -> &'static CharSet {
        match self {
            StrKind::Utf8 | StrKind::Visible => &ALLOW_ALL,
            StrKind::Numeric => &NUMERIC,
            StrKind::Printable => &PRINTABLE,
            StrKind::Ia5 => &IA5,
        }
    }

    /// Returns whether `value` can be represented by this string type.
    ///
    /// This is useful for picking the narrowest applicable type for a
    /// given string before constructing a value.
    pub fn is_valid(self, value: &str) -> bool {
        self.charset().check(value.as_bytes()).is_ok()
    }

    /// Checks a sequence of octets against the type's character set.
    fn check(self, octets: &[u8]) -> Result<(), CharSetError> {
        self.charset().check(octets).map_err(|_| CharSetError::new(self))
    }
}

impl fmt::Display for StrKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.tag().fmt(f)
    }
}


//------------ CharSet -------------------------------------------------------

/// The set of characters a string type permits.
///
/// The set is described as a combination of standard groups plus an
/// explicit list of extra characters. A set with `allow_all` accepts every
/// octet. Character checks operate on octets since all restricted sets
/// consist of ASCII characters encoded one octet each.
#[derive(Clone, Copy, Debug)]
pub struct CharSet {
    /// Allow the decimal digits.
    pub digits: bool,

    /// Allow the lowercase letters a to z.
    pub lower: bool,

    /// Allow the uppercase letters A to Z.
    pub upper: bool,

    /// Allow the space character.
    pub space: bool,

    /// Allow every octet below 0x80.
    pub ascii: bool,

    /// Allow everything.
    pub allow_all: bool,

    /// Additional permitted characters.
    pub extra: &'static [u8],
}

impl CharSet {
    /// Returns whether the set permits the given octet.
    pub fn allows(&self, octet: u8) -> bool {
        self.allow_all
        || (self.ascii && octet < 0x80)
        || (self.digits && octet.is_ascii_digit())
        || (self.lower && octet.is_ascii_lowercase())
        || (self.upper && octet.is_ascii_uppercase())
        || (self.space && octet == b' ')
        || self.extra.contains(&octet)
    }

    /// Checks that every octet of a sequence is permitted.
    ///
    /// Returns the index of the first offending octet otherwise.
    pub fn check(&self, octets: &[u8]) -> Result<(), usize> {
        if self.allow_all {
            return Ok(())
        }
        match octets.iter().position(|&octet| !self.allows(octet)) {
            Some(idx) => Err(idx),
            None => Ok(())
        }
    }
}

/// No restrictions at all.
const ALLOW_ALL: CharSet = CharSet {
    digits: false, lower: false, upper: false, space: false,
    ascii: false, allow_all: true, extra: b"",
};

/// The NumericString set: digits and space.
const NUMERIC: CharSet = CharSet {
    digits: true, lower: false, upper: false, space: true,
    ascii: false, allow_all: false, extra: b"",
};

/// The PrintableString set, see clause 41.4 of X.680.
const PRINTABLE: CharSet = CharSet {
    digits: true, lower: true, upper: true, space: true,
    ascii: false, allow_all: false, extra: b"'()+,-./:=?",
};

/// The IA5String set: the 128 seven-bit characters.
const IA5: CharSet = CharSet {
    digits: false, lower: false, upper: false, space: false,
    ascii: true, allow_all: false, extra: b"",
};


//------------ CharString ----------------------------------------------------

/// A restricted character string value.
///
/// The value keeps the raw content octets together with its
/// [kind][StrKind]. Construction from text checks the kind's character
/// set, so an existing value always encodes without error.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CharString {
    /// The string type.
    kind: StrKind,

    /// The raw content octets.
    octets: Bytes,
}

impl CharString {
    /// Creates a new character string from text.
    ///
    /// Returns an error if `value` contains a character the kind's
    /// character set does not permit.
    pub fn new(kind: StrKind, value: &str) -> Result<Self, CharSetError> {
        kind.check(value.as_bytes())?;
        Ok(CharString {
            kind,
            octets: Bytes::copy_from_slice(value.as_bytes()),
        })
    }

    /// Returns the kind of the string.
    pub fn kind(&self) -> StrKind {
        self.kind
    }

    /// Returns the raw content octets.
    pub fn as_bytes(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns the content as text if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(self.octets.as_ref()).ok()
    }

    /// Returns the number of content octets.
    pub fn len(&self) -> usize {
        self.octets.len()
    }

    /// Returns whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Creates a string of the given kind from decoded content octets.
    pub(crate) fn take_content(
        kind: StrKind, content: &[u8], pos: Pos
    ) -> Result<Self, DecodeError> {
        if kind.charset().check(content).is_err() {
            return Err(DecodeError::new(
                ErrorKind::IllegalCharacter { kind }, pos
            ))
        }
        Ok(CharString { kind, octets: Bytes::copy_from_slice(content) })
    }
}

impl fmt::Display for CharString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        String::from_utf8_lossy(self.octets.as_ref()).fmt(f)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_charset() {
        assert!(CharString::new(StrKind::Numeric, "123 456 789").is_ok());
        let err = CharString::new(StrKind::Numeric, "12a").unwrap_err();
        assert_eq!(err.kind(), StrKind::Numeric);
    }

    #[test]
    fn printable_charset() {
        assert!(CharString::new(
            StrKind::Printable, "Test User (copy) +49/89:?="
        ).is_ok());
        assert!(CharString::new(StrKind::Printable, "five@six").is_err());
        assert!(CharString::new(StrKind::Printable, "a;b").is_err());
    }

    #[test]
    fn ia5_charset() {
        assert!(CharString::new(StrKind::Ia5, "mail@example.com\x07").is_ok());
        assert!(CharString::new(StrKind::Ia5, "übermäßig").is_err());
    }

    #[test]
    fn allow_all_accepts_everything() {
        // The same string that a restricted type rejects.
        assert!(CharString::new(StrKind::Printable, "x;y").is_err());
        assert!(CharString::new(StrKind::Utf8, "x;y").is_ok());
        assert!(CharString::new(StrKind::Visible, "x;y").is_ok());
    }

    #[test]
    fn validity_probe() {
        assert!(StrKind::Numeric.is_valid("0123"));
        assert!(!StrKind::Numeric.is_valid("01a3"));
        assert!(StrKind::Printable.is_valid("John Doe"));
        assert!(!StrKind::Printable.is_valid("john@doe"));
        assert!(StrKind::Ia5.is_valid("john@doe"));
        assert!(StrKind::Utf8.is_valid("jöhn@döe"));
    }

    #[test]
    fn decode_content_checks_charset() {
        let res = CharString::take_content(
            StrKind::Numeric, b"12E4", 6.into()
        );
        let err = res.unwrap_err();
        assert_eq!(
            err.kind(), ErrorKind::IllegalCharacter { kind: StrKind::Numeric }
        );
        assert_eq!(err.pos(), 6.into());

        let res = CharString::take_content(
            StrKind::Printable, b"Jane", 0.into()
        ).unwrap();
        assert_eq!(res.to_str(), Some("Jane"));
        assert_eq!(res.len(), 4);
    }
}
