//! The content codec for INTEGER and ENUMERATED values.
//!
//! This is a private module used by the value codec. ENUMERATED values use
//! the exact same content encoding as INTEGER values, so both share the
//! functions herein and only differ in the tag they pass in for error
//! reporting.
//!
//! # BER Encoding
//!
//! The content octets of an INTEGER are a variable-length, big-endian,
//! two's complement byte sequence. Thus, the most significant bit of the
//! first octet serves as the sign bit. DER requires the shortest such
//! sequence: a first octet of zero followed by an octet with a clear high
//! bit, or a first octet of 0xFF followed by an octet with a set high bit,
//! would carry no information and is rejected.

use std::cmp::Ordering;
use smallvec::SmallVec;
use crate::bigint::BigNum;
use crate::error::{DecodeError, ErrorKind, Pos};
use crate::ident::Tag;

/// The encoded content octets of an integer.
///
/// Anything longer than the inline capacity had to come from an
/// arbitrary-precision value anyway, so spilling is the rare case.
pub type ContentOctets = SmallVec<[u8; 16]>;


//------------ Decoding ------------------------------------------------------

/// Decodes the content octets of an integer.
///
/// The octets must be at least one and must use the minimal form. Content
/// of up to eight octets is reconstructed with native arithmetic; anything
/// longer falls back to the big number engine.
pub fn decode<B: BigNum>(
    tag: Tag, content: &[u8], pos: Pos
) -> Result<B, DecodeError> {
    let first = match content.first() {
        Some(&first) => first,
        None => {
            return Err(DecodeError::new(
                ErrorKind::InvalidLength { tag, found: 0 }, pos
            ))
        }
    };

    // The first nine bits of a multi-octet integer must not all be the
    // same, otherwise the first octet is redundant.
    if let Some(&second) = content.get(1) {
        match (first, second & 0x80 != 0) {
            (0, false) | (0xFF, true) => {
                return Err(DecodeError::new(
                    ErrorKind::NonMinimalEncoding, pos
                ))
            }
            _ => { }
        }
    }

    if content.len() <= 8 {
        // Fast path. Sign-extend the first octet, then shift the rest in.
        let mut res: i64 = if first & 0x80 != 0 { -1 } else { 0 };
        for &octet in content {
            res = (res << 8) | i64::from(octet);
        }
        return Ok(B::from_i64(res))
    }

    // Slow path. Build the unsigned interpretation by shifting octets in,
    // then correct the sign by subtracting 2^(8n).
    let mut res = B::from_i64(0);
    for &octet in content {
        res = res.shl(8).add(&B::from_i64(octet.into()));
    }
    if first & 0x80 != 0 {
        res = res.sub(&B::from_i64(1).shl(8 * content.len()));
    }
    Ok(res)
}


//------------ Encoding ------------------------------------------------------

/// Encodes a value into the minimal two's complement content octets.
pub fn encode<B: BigNum>(value: &B) -> ContentOctets {
    if let Some(value) = value.to_i64() {
        return encode_i64(value)
    }

    // Slow path. The magnitude exceeds an i64 here, so the result has at
    // least nine octets and is never empty.
    if value.is_negative() {
        encode_big_negative(value)
    }
    else {
        encode_big_positive(value)
    }
}

/// Encodes a value that fits a native integer.
fn encode_i64(value: i64) -> ContentOctets {
    let bytes = value.to_be_bytes();

    // Skip redundant leading octets: 0x00 before a clear high bit and
    // 0xFF before a set high bit. The last octet always stays.
    let mut start = 0;
    while start < bytes.len() - 1 {
        match (bytes[start], bytes[start + 1] & 0x80 != 0) {
            (0, false) | (0xFF, true) => start += 1,
            _ => break
        }
    }
    SmallVec::from_slice(&bytes[start..])
}

/// Encodes a non-negative value too large for the fast path.
fn encode_big_positive<B: BigNum>(value: &B) -> ContentOctets {
    let zero = B::from_i64(0);
    let byte = B::from_i64(256);

    let mut res = ContentOctets::new();
    let mut cur = value.clone();
    while cur.cmp(&zero) == Ordering::Greater {
        res.push(low_octet(&cur, &byte));
        cur = cur.shr(8);
    }
    res.reverse();

    // If the high bit of the first octet is set, it would be read as a
    // sign bit; a single leading zero octet is part of the minimal form.
    if res[0] & 0x80 != 0 {
        res.insert(0, 0);
    }
    res
}

/// Encodes a negative value too large for the fast path.
fn encode_big_negative<B: BigNum>(value: &B) -> ContentOctets {
    let zero = B::from_i64(0);
    let byte = B::from_i64(256);
    let one = B::from_i64(1);

    // Find the shortest octet count n such that the value is not less
    // than -(2^(8n - 1)). Shorter counts are covered by the fast path,
    // so we can start at nine.
    let mut count = 9;
    loop {
        let bound = zero.sub(&one.shl(8 * count - 1));
        if value.cmp(&bound) != Ordering::Less {
            break
        }
        count += 1;
    }

    // Adding 2^(8n) yields the two's complement interpretation, a value
    // in the range [2^(8n - 1), 2^(8n)). Export exactly n octets of it.
    let mut cur = value.add(&one.shl(8 * count));
    let mut res = ContentOctets::new();
    for _ in 0..count {
        res.push(low_octet(&cur, &byte));
        cur = cur.shr(8);
    }
    res.reverse();
    res
}

/// Returns the lowest octet of a value.
fn low_octet<B: BigNum>(value: &B, byte: &B) -> u8 {
    match value.modulus(byte).to_i64() {
        Some(octet) => octet as u8,
        None => unreachable!("modulus 256 fits a native integer"),
    }
}


//============ Tests =========================================================
