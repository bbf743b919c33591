//! Handling of ASN.1 data encoded in BER and DER as trees of values.
//!
//! This crate decodes binary data encoded according to the Basic Encoding
//! Rules (BER) or their canonical subset, the Distinguished Encoding Rules
//! (DER), into a tree of typed [`Value`]s and encodes such trees back into
//! their canonical DER representation. The encoding rules the crate
//! enforces while decoding are the strict DER ones: lengths and integers
//! must use their minimal form and the indefinite length form is rejected.
//!
//! Decoding starts from a byte slice and produces the value together with
//! the number of octets consumed. Every error carries the byte offset at
//! which the problem was detected.
//!
//! ```
//! use dertree::Value;
//!
//! let data = b"\x30\x06\x01\x01\xFF\x02\x01\x2A";
//! let (value, consumed) = Value::decode(data)?;
//! assert_eq!(consumed, data.len());
//! assert_eq!(value.children().len(), 2);
//! assert_eq!(value.encode(), data.as_ref());
//! # Ok::<_, dertree::DecodeError>(())
//! ```
//!
//! Values with a tag the crate has no codec for are preserved verbatim,
//! identifier octets included, so that re-encoding reproduces the original
//! input byte for byte. See [`Value`] for the full set of supported types.

//--- Re-exports

pub use self::bigint::{BigNum, Int};
pub use self::construct::{Construct, ExplicitTag, Unknown, UnknownConstructed};
pub use self::error::{CharSetError, DecodeError, ErrorKind, Pos};
pub use self::ident::{Class, Ident, Tag};
pub use self::string::{CharSet, CharString, StrKind};
pub use self::value::Value;

//--- Private modules

mod bigint;
mod construct;
mod error;
mod ident;
mod int;
mod length;
mod source;
mod string;
mod value;
