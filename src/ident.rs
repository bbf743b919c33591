//! The identifier octets of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;
use crate::error::{DecodeError, ErrorKind};
use crate::source::Source;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags identify the type of a value. A tag consists of one of
/// four classes, represented by the [`Class`] enum, and a number within
/// this class. The number is an unsigned integer.
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. The combined form is represented by [`Ident`].
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
//
//  Internally, we store the tag as the identifier octets of a primitive
//  value with the same tag.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Tag(Ident);

impl Tag {
    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Self(Ident::new(class, false, number))
    }

    /// Creates a new tag in class “context specific” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.0.class()
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.0.number()
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690.
///
impl Tag {
    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::new(Class::Universal, 1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::new(Class::Universal, 2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::new(Class::Universal, 3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::new(Class::Universal, 4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::new(Class::Universal, 5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::new(Class::Universal, 6);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::new(Class::Universal, 10);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Self::new(Class::Universal, 12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::new(Class::Universal, 16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::new(Class::Universal, 17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::new(Class::Universal, 18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::new(Class::Universal, 19);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::new(Class::Universal, 22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::new(Class::Universal, 23);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::new(Class::Universal, 24);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::new(Class::Universal, 26);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::NUMERIC_STRING => write!(f, "NumericString"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::VISIBLE_STRING => write!(f, "VisibleString"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({} - {:?})", self, self.0.as_slice())
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// The identifier combines the [tag][Tag] of a value with a bit stating
/// whether the value uses primitive or constructed encoding. We store the
/// encoded octets verbatim so that values with unrecognized tags can be
/// re-encoded byte for byte, even when their identifier uses the
/// high-tag-number form.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ident(I);

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
enum I {
    L1([u8; 1]),
    L2([u8; 2]),
    L3([u8; 3]),
    L4([u8; 4]),
    L5([u8; 5]),
    L6([u8; 6]),
}

impl Ident {
    /// Encodes class, constructed bit and number into identifier octets.
    pub const fn new(class: Class, constructed: bool, number: u32) -> Self {
        let first = if constructed {
            class.into_u8() | 0x20
        }
        else {
            class.into_u8()
        };

        if number <= 0x1e {
            // five bits but not all of them one (so not 0x1f)
            return Self(I::L1([first | number as u8]))
        }

        // Now the first octet is always the class plus bits 1 to 5 all 1.
        let first = first | 0x1f;

        // The lowest seven bits are the last octet. Shift the number by
        // seven to see what’s left. If that’s zero, we have a two octet
        // identifier.
        let n0 = (number & 0x7F) as u8;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L2([first, n0]))
        }

        // Now rinse and repeat.
        let n1 = ((number & 0x7F) | 0x80) as u8;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L3([first, n1, n0]))
        }

        let n2 = ((number & 0x7F) | 0x80) as u8;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L4([first, n2, n1, n0]))
        }

        let n3 = ((number & 0x7F) | 0x80) as u8;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L5([first, n3, n2, n1, n0]))
        }

        let n4 = ((number & 0x7F) | 0x80) as u8;
        let number = number >> 7;
        debug_assert!(number == 0);
        Self(I::L6([first, n4, n3, n2, n1, n0]))
    }

    /// Creates identifier octets from a tag.
    pub const fn from_tag(tag: Tag, constructed: bool) -> Self {
        if constructed {
            match tag.0.0 {
                I::L1([x]) => Self(I::L1([x | 0x20])),
                I::L2([x, y0]) => Self(I::L2([x | 0x20, y0])),
                I::L3([x, y0, y1]) => {
                    Self(I::L3([x | 0x20, y0, y1]))
                }
                I::L4([x, y0, y1, y2]) => {
                    Self(I::L4([x | 0x20, y0, y1, y2]))
                }
                I::L5([x, y0, y1, y2, y3]) => {
                    Self(I::L5([x | 0x20, y0, y1, y2, y3]))
                }
                I::L6([x, y0, y1, y2, y3, y4]) => {
                    Self(I::L6([x | 0x20, y0, y1, y2, y3, y4]))
                }
            }
        }
        else {
            tag.0
        }
    }

    /// Returns the tag for the identifier octets.
    pub const fn tag(self) -> Tag {
        match self.0 {
            I::L1([x]) => Tag(Self(I::L1([x & 0xDF]))),
            I::L2([x, y0]) => Tag(Self(I::L2([x & 0xDF, y0]))),
            I::L3([x, y0, y1]) => {
                Tag(Self(I::L3([x & 0xDF, y0, y1])))
            }
            I::L4([x, y0, y1, y2]) => {
                Tag(Self(I::L4([x & 0xDF, y0, y1, y2])))
            }
            I::L5([x, y0, y1, y2, y3]) => {
                Tag(Self(I::L5([x & 0xDF, y0, y1, y2, y3])))
            }
            I::L6([x, y0, y1, y2, y3, y4]) => {
                Tag(Self(I::L6([x & 0xDF, y0, y1, y2, y3, y4])))
            }
        }
    }

    /// Returns the class of the identifier octets.
    pub const fn class(self) -> Class {
        Class::from_u8(self.first())
    }

    /// Returns whether the value is to be a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.first() & 0x20 != 0
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        match self.0 {
            I::L1([x]) => (x & 0x1f) as u32,
            I::L2([_, x0]) => x0 as u32,
            I::L3([_, x1, x2]) => {
                  ((x1 & 0x7f) as u32) << 7
                | (x2 as u32)
            }
            I::L4([_, x1, x2, x3]) => {
                  ((x1 & 0x7f) as u32) << 14
                | ((x2 & 0x7f) as u32) << 7
                | (x3 as u32)
            }
            I::L5([_, x1, x2, x3, x4]) => {
                  ((x1 & 0x7f) as u32) << 21
                | ((x2 & 0x7f) as u32) << 14
                | ((x3 & 0x7f) as u32) << 7
                | (x4 as u32)
            }
            I::L6([_, x1, x2, x3, x4, x5]) => {
                  ((x1 & 0x7f) as u32) << 28
                | ((x2 & 0x7f) as u32) << 21
                | ((x3 & 0x7f) as u32) << 14
                | ((x4 & 0x7f) as u32) << 7
                | (x5 as u32)
            }
        }
    }

    /// Returns a slice of the encoded octets.
    pub const fn as_slice(&self) -> &[u8] {
        match &self.0 {
            I::L1(arr) => arr.as_slice(),
            I::L2(arr) => arr.as_slice(),
            I::L3(arr) => arr.as_slice(),
            I::L4(arr) => arr.as_slice(),
            I::L5(arr) => arr.as_slice(),
            I::L6(arr) => arr.as_slice(),
        }
    }

    /// Returns the first octet.
    const fn first(self) -> u8 {
        match self.0 {
            I::L1([x]) => x,
            I::L2([x, ..]) => x,
            I::L3([x, ..]) => x,
            I::L4([x, ..]) => x,
            I::L5([x, ..]) => x,
            I::L6([x, ..]) => x,
        }
    }

    /// Takes the identifier octets from the beginning of a source.
    ///
    /// The octets are kept as they appear in the input. Fails with
    /// [`ErrorKind::TruncatedInput`] if the input ends before the
    /// identifier is complete and with
    /// [`ErrorKind::UnimplementedOperation`] if the tag number does not
    /// fit into a `u32`.
    pub fn take_from(source: &mut Source) -> Result<Self, DecodeError> {
        let first = source.take_u8()?;

        // If we have a single octet identifier, we can already return.
        if (first & 0x1f) < 0x1f {
            return Ok(Self(I::L1([first])))
        }

        // Work your way through the multi-octet numbers.
        let x0 = source.take_u8()?;
        if (x0 & 0x80) == 0 {
            return Ok(Self(I::L2([first, x0])))
        }

        let x1 = source.take_u8()?;
        if (x1 & 0x80) == 0 {
            return Ok(Self(I::L3([first, x0, x1])))
        }

        let x2 = source.take_u8()?;
        if (x2 & 0x80) == 0 {
            return Ok(Self(I::L4([first, x0, x1, x2])))
        }

        let x3 = source.take_u8()?;
        if (x3 & 0x80) == 0 {
            return Ok(Self(I::L5([first, x0, x1, x2, x3])))
        }

        let x4 = source.take_u8()?;
        if (x4 & 0x80) == 0 {
            // In order to fit into a u32, only the lowest four bits of the
            // first continuation octet may be used.
            if x0 & 0x70 != 0 {
                return Err(DecodeError::new(
                    ErrorKind::UnimplementedOperation, source.pos()
                ))
            }

            return Ok(Self(I::L6([first, x0, x1, x2, x3, x4])))
        }

        Err(DecodeError::new(
            ErrorKind::UnimplementedOperation, source.pos()
        ))
    }

    /// Returns the number of octets of the encoded form.
    pub const fn encoded_len(self) -> usize {
        match self.0 {
            I::L1(_) => 1,
            I::L2(_) => 2,
            I::L3(_) => 3,
            I::L4(_) => 4,
            I::L5(_) => 5,
            I::L6(_) => 6,
        }
    }

    /// Appends the identifier octets to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        target.extend_from_slice(self.as_slice())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.as_slice())
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    fn roundtrip(ident: Ident) -> Ident {
        let mut source = Source::new(ident.as_slice());
        let res = Ident::take_from(&mut source).unwrap();
        assert_eq!(source.remaining(), 0);
        res
    }

    #[test]
    fn single_octet_idents() {
        for &class in CLASSES {
            for number in [0, 1, 17, 30] {
                for constructed in [false, true] {
                    let ident = Ident::new(class, constructed, number);
                    assert_eq!(ident.encoded_len(), 1);
                    assert_eq!(ident.number(), number);
                    assert_eq!(ident.is_constructed(), constructed);
                    assert_eq!(ident.class(), class);
                    assert_eq!(roundtrip(ident), ident);
                }
            }
        }
    }

    #[test]
    fn multi_octet_idents() {
        let cases = [
            (31u32, 2usize),
            (0x7f, 2),
            (0x80, 3),
            (0x3fff, 3),
            (0x4000, 4),
            (0x1f_ffff, 4),
            (0x20_0000, 5),
            (0xfff_ffff, 5),
            (0x1000_0000, 6),
            (u32::MAX, 6),
        ];
        for &class in CLASSES {
            for (number, len) in cases {
                let ident = Ident::new(class, true, number);
                assert_eq!(ident.encoded_len(), len, "number {:#x}", number);
                assert_eq!(ident.number(), number);
                assert!(ident.is_constructed());
                assert_eq!(roundtrip(ident), ident);
            }
        }
    }

    #[test]
    fn tag_from_ident() {
        let ident = Ident::new(Class::Context, true, 3);
        assert_eq!(ident.tag(), Tag::ctx(3));
        assert_eq!(Ident::from_tag(Tag::ctx(3), true), ident);
        assert_eq!(Ident::from_tag(Tag::SEQUENCE, true).as_slice(), b"\x30");
        assert_eq!(Ident::from_tag(Tag::INTEGER, false).as_slice(), b"\x02");
    }

    #[test]
    fn truncated_ident() {
        // A multi-octet number cut short mid-way.
        let mut source = Source::new(b"\x1f\x83");
        assert_eq!(
            Ident::take_from(&mut source).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );

        let mut source = Source::new(b"");
        assert_eq!(
            Ident::take_from(&mut source).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn excessive_tag_number() {
        // Six continuation octets never fit a u32.
        let mut source = Source::new(b"\x1f\x81\x82\x83\x84\x85\x06");
        assert_eq!(
            Ident::take_from(&mut source).unwrap_err().kind(),
            ErrorKind::UnimplementedOperation
        );

        // Five continuation octets with too many bits in the first one.
        let mut source = Source::new(b"\x1f\xf0\x80\x80\x80\x00");
        assert_eq!(
            Ident::take_from(&mut source).unwrap_err().kind(),
            ErrorKind::UnimplementedOperation
        );
    }
}
