//! Errors reported while decoding data.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::{error, fmt, ops};
use crate::ident::Tag;
use crate::string::StrKind;


//------------ Pos -----------------------------------------------------------

/// The byte offset into the input at which a problem was detected.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the position as a plain byte offset.
    pub fn to_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add<usize> for Pos {
    type Output = Self;

    fn add(self, rhs: usize) -> Self {
        Pos(self.0 + rhs)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//------------ ErrorKind -----------------------------------------------------

/// The kind of problem a [`DecodeError`] reports.
///
/// Every kind describes a violation of the encoding rules that makes the
/// input unusable. There is no recovery: whichever decode call produced the
/// error has failed as a whole.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The input ended before a required field could be read.
    TruncatedInput,

    /// A declared content length reaches past the end of the input.
    LengthExceedsInput,

    /// A length was not encoded in its minimal form.
    ///
    /// This happens when the long form is used for a value below 128 or
    /// when the long form octets start with a zero octet.
    NonMinimalLength,

    /// A length cannot be represented or the indefinite form was used.
    LengthOverflow,

    /// An integer's content octets carry a redundant leading octet.
    NonMinimalEncoding,

    /// A fixed-length type carried a content length other than required.
    InvalidLength {
        /// The tag of the offending value.
        tag: Tag,

        /// The content length that was actually declared.
        found: usize,
    },

    /// A character string contains an octet outside its character set.
    IllegalCharacter {
        /// The string type that rejected the octet.
        kind: StrKind,
    },

    /// A construct's children do not add up to its declared length.
    InconsistentConstructLength,

    /// The data uses a form of encoding we do not support.
    UnimplementedOperation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::TruncatedInput => {
                f.write_str("unexpected end of data")
            }
            ErrorKind::LengthExceedsInput => {
                f.write_str("content length exceeds remaining data")
            }
            ErrorKind::NonMinimalLength => {
                f.write_str("non-minimal length octets")
            }
            ErrorKind::LengthOverflow => {
                f.write_str("unrepresentable or indefinite length")
            }
            ErrorKind::NonMinimalEncoding => {
                f.write_str("non-minimal integer encoding")
            }
            ErrorKind::InvalidLength { tag, found } => {
                write!(f, "invalid content length {} for {}", found, tag)
            }
            ErrorKind::IllegalCharacter { kind } => {
                write!(f, "illegal character for {}", kind)
            }
            ErrorKind::InconsistentConstructLength => {
                f.write_str("content does not match declared length")
            }
            ErrorKind::UnimplementedOperation => {
                f.write_str("unsupported encoding")
            }
        }
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error combines the [kind][ErrorKind] of problem with the byte
/// offset at which it was detected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeError {
    /// The kind of problem.
    kind: ErrorKind,

    /// The position in the input at which the problem was detected.
    pos: Pos,
}

impl DecodeError {
    /// Creates a new error from its kind and position.
    pub fn new(kind: ErrorKind, pos: impl Into<Pos>) -> Self {
        DecodeError { kind, pos: pos.into() }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the position in the input the error refers to.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "error at offset {}: {}", self.pos, self.kind)
    }
}

impl error::Error for DecodeError { }


//------------ CharSetError --------------------------------------------------

/// A string value contained a character outside its character set.
///
/// This error is produced when constructing a restricted character string
/// from text. During decoding, the same condition surfaces as a
/// [`DecodeError`] of kind [`ErrorKind::IllegalCharacter`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CharSetError {
    /// The string type that rejected the value.
    kind: StrKind,
}

impl CharSetError {
    /// Creates a new error for the given string type.
    pub(crate) fn new(kind: StrKind) -> Self {
        CharSetError { kind }
    }

    /// Returns the string type that rejected the value.
    pub fn kind(&self) -> StrKind {
        self.kind
    }
}

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "illegal character for {}", self.kind)
    }
}

impl error::Error for CharSetError { }
