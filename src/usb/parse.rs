use std::mem;

use plain::Plain;

use super::error::{DescriptorError, Result};

/// Bounded cursor over the data area of a configuration descriptor.
///
/// Every read is checked against the end of the region; a malformed declared
/// length in a sub-descriptor can still desynchronize *where* subsequent
/// records are read from, but it can never move the cursor out of bounds.
pub struct DescriptorCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DescriptorCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Offset of the cursor from the start of the region.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// The `(length, kind)` header of the sub-descriptor under the cursor,
    /// without consuming it. `None` when fewer than two bytes remain.
    pub fn peek_header(&self) -> Option<(u8, u8)> {
        let rest = &self.buf[self.pos..];
        if rest.len() < 2 {
            return None;
        }
        Some((rest[0], rest[1]))
    }

    /// Consumes exactly `count` bytes.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(DescriptorError::Truncated {
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    /// Consumes up to `count` bytes, clamped to the end of the region.
    pub fn take_at_most(&mut self, count: usize) -> &'a [u8] {
        let count = count.min(self.remaining());
        let bytes = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        bytes
    }

    /// Reads one fixed-layout record off the cursor.
    pub fn take_record<T: Plain + Copy>(&mut self) -> Result<T> {
        let bytes = self.take(mem::size_of::<T>())?;
        // take() already sized the slice, and packed records have alignment 1
        let record = plain::from_bytes(bytes).map_err(|_| DescriptorError::Truncated {
            needed: mem::size_of::<T>(),
            available: bytes.len(),
        })?;
        Ok(*record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_take() {
        let buf = [1u8, 2, 3];
        let mut cursor = DescriptorCursor::new(&buf);
        assert_eq!(cursor.take(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.position(), 2);
        assert!(matches!(
            cursor.take(2),
            Err(DescriptorError::Truncated {
                needed: 2,
                available: 1,
            })
        ));
        // a failed take consumes nothing
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.take_at_most(5), &[3]);
        assert!(cursor.is_empty());
    }

    #[test]
    fn peek_needs_two_bytes() {
        let buf = [9u8, 4, 7];
        let mut cursor = DescriptorCursor::new(&buf);
        assert_eq!(cursor.peek_header(), Some((9, 4)));
        cursor.take_at_most(2);
        assert_eq!(cursor.peek_header(), None);
    }
}
