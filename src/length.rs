//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is not
//! publicly exposed.

use crate::error::{DecodeError, ErrorKind};
use crate::source::Source;


//------------ Length -------------------------------------------------------

/// The content length of an encoded value.
///
/// # DER Encoding
///
/// The length can be encoded in one of two ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the remaining bits of this first octet provide the length directly.
/// Thus, if the first octet is less than 128, it provides the length
/// already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length, as a big-endian unsigned integer. A first octet of exactly 128
/// would mark an indefinite length, which we do not support, and a first
/// octet of 255 is reserved.
///
/// Under DER rules a length must be encoded in the minimum number of
/// octets; we enforce this when decoding.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Length(usize);

impl Length {
    const LEN: usize = 0usize.to_ne_bytes().len();

    /// Creates a new length with the given value.
    pub fn new(length: usize) -> Self {
        Length(length)
    }

    /// Returns the length as a plain `usize`.
    pub fn to_usize(self) -> usize {
        self.0
    }

    /// Parses the length octets from a source.
    ///
    /// Enforces the DER rules: the minimal form must be used, the
    /// indefinite form is rejected, and the resulting length must not
    /// reach past the end of the remaining input. All errors refer to the
    /// position of the first length octet.
    pub fn take_from(source: &mut Source) -> Result<Self, DecodeError> {
        let pos = source.pos();
        let first = source.take_u8()?;

        let length = match first {
            // Bit 8 clear: the first octet is the length itself.
            n if (n & 0x80) == 0 => n as usize,

            // 0x80: indefinite form. Not supported.
            //
            // 0xFF: reserved.
            0x80 | 0xFF => {
                return Err(DecodeError::new(ErrorKind::LengthOverflow, pos))
            }

            // Anything else: clear the left bit for the octet count.
            n => {
                let count = (n & 0x7F) as usize;
                let mut res = 0usize;
                for i in 0..count {
                    let octet = source.take_u8()?;
                    if i == 0 && octet == 0 {
                        // A leading zero octet means there is a shorter
                        // encoding.
                        return Err(DecodeError::new(
                            ErrorKind::NonMinimalLength, pos
                        ))
                    }
                    if i >= Self::LEN {
                        // With the leading zero case gone, this can only
                        // mean the length doesn’t fit a usize.
                        return Err(DecodeError::new(
                            ErrorKind::LengthOverflow, pos
                        ))
                    }
                    res = (res << 8) | octet as usize;
                }
                if res < 0x80 {
                    // The long form was used for a value that fits the
                    // short form. This also catches a count of zero other
                    // than 0x80, which cannot occur here.
                    return Err(DecodeError::new(
                        ErrorKind::NonMinimalLength, pos
                    ))
                }
                res
            }
        };

        if length > source.remaining() {
            return Err(DecodeError::new(ErrorKind::LengthExceedsInput, pos))
        }
        Ok(Length(length))
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        if self.0 > 0x7F {
            let idx = self.encoded_start_idx();
            debug_assert!(idx < Self::LEN);

            Self::LEN - idx + 1
        }
        else {
            1
        }
    }

    /// Appends the encoded length to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 > 0x7F {
            let idx = self.encoded_start_idx();
            debug_assert!(idx < Self::LEN);

            // LEN will never be greater than 126 bytes. Also, `idx` won’t
            // be greater than LEN, so the subtraction here is fine.
            target.push(((Self::LEN - idx) | 0x80) as u8);
            target.extend_from_slice(
                &self.0.to_be_bytes()[idx..]
            )
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Returns the index of the first non-zero octet of the length.
    fn encoded_start_idx(self) -> usize {
        (self.0.leading_zeros() / 8) as usize
    }
}


//============ Tests =========================================================
