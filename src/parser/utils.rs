/*!
Provides utility functions for reading big-endian integers and fixed-size structs off a buffer.
*/
use bytes::{Buf, Bytes};

use crate::error::ParserError;
use crate::error::ParserError::TruncatedInput;
use crate::models::RouteDistinguisher;

impl ReadUtils for &[u8] {}
impl ReadUtils for Bytes {}

/// Bounds-checked reads. Every method fails with [ParserError::TruncatedInput] instead of
/// panicking when the buffer is too short.
pub trait ReadUtils: Buf {
    #[inline]
    fn has_n_remaining(&self, n: usize) -> Result<(), ParserError> {
        if self.remaining() < n {
            Err(TruncatedInput)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, ParserError> {
        self.has_n_remaining(1)?;
        Ok(self.get_u8())
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16, ParserError> {
        self.has_n_remaining(2)?;
        Ok(self.get_u16())
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, ParserError> {
        self.has_n_remaining(4)?;
        Ok(self.get_u32())
    }

    /// Big-endian unsigned integer of `n` bytes, `n` at most 8.
    #[inline]
    fn read_uint(&mut self, n: usize) -> Result<u64, ParserError> {
        self.has_n_remaining(n)?;
        Ok(self.get_uint(n))
    }

    fn read_exact(&mut self, buffer: &mut [u8]) -> Result<(), ParserError> {
        self.has_n_remaining(buffer.len())?;
        self.copy_to_slice(buffer);
        Ok(())
    }

    fn read_route_distinguisher(&mut self) -> Result<RouteDistinguisher, ParserError> {
        let mut rd = [0u8; 8];
        self.read_exact(&mut rd)?;
        Ok(RouteDistinguisher(rd))
    }
}
