//! The cursor over the raw input during decoding.
//!
//! This is a private module. The [`Source`] defined herein is not publicly
//! exposed. It is created by the top-level decode entry point and threaded
//! by mutable reference through the recursive decode calls; it is never
//! stored inside a value.

use crate::error::{DecodeError, ErrorKind, Pos};


//------------ Source --------------------------------------------------------

/// A byte slice with a read position.
///
/// All decoding happens through a single source so that every value leaves
/// the position exactly one octet past its own encoding. Reads past the end
/// of the slice fail with [`ErrorKind::TruncatedInput`].
#[derive(Clone, Copy, Debug)]
pub struct Source<'a> {
    /// The full input.
    data: &'a [u8],

    /// The current read position.
    pos: usize,
}

impl<'a> Source<'a> {
    /// Creates a new source starting at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Source { data, pos: 0 }
    }

    /// Returns the current read position as an offset into the input.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns the current read position for error reporting.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns the number of octets left in the input.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Takes a single octet from the source.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        match self.data.get(self.pos) {
            Some(&octet) => {
                self.pos += 1;
                Ok(octet)
            }
            None => {
                Err(DecodeError::new(ErrorKind::TruncatedInput, self.pos))
            }
        }
    }

    /// Takes the next `len` octets from the source.
    pub fn take_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(len);
        match end.and_then(|end| self.data.get(self.pos..end)) {
            Some(slice) => {
                self.pos += len;
                Ok(slice)
            }
            None => {
                Err(DecodeError::new(ErrorKind::TruncatedInput, self.pos))
            }
        }
    }
}


//============ Tests =========================================================
