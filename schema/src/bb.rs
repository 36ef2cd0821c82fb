use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

/// Returned when a read, skip or seek would move a [ByteCursor] past the end
/// of its buffer. The cursor position is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read of {wanted} byte(s) at offset {position:#x} exceeds buffer length {len:#x}")]
pub struct OutOfBounds {
    pub position: usize,
    pub wanted: usize,
    pub len: usize,
}

/// A sequential reader over a GF BSON byte buffer. All multi-byte integers in
/// the format are big-endian.
///
/// Example usage:
///
/// ```
/// let mut cursor = gfbson_schema::ByteCursor::new(&[0, 0, 1, 44, 0xff, 0xff, 0xff, 0xf9]);
/// assert_eq!(cursor.read_u32(), Ok(300));
/// assert_eq!(cursor.read_i32(), Ok(-7));
/// assert_eq!(cursor.remaining(), 0);
/// ```
///
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor positioned at the start of `data`. The cursor
    /// borrows the buffer and never copies it.
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, position: 0 }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Retrieves the current offset into the buffer. This starts at 0 and ends
    /// up as `self.len()` when everything has been read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left between the current position and the end.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn check(&self, wanted: usize) -> Result<(), OutOfBounds> {
        if wanted > self.remaining() {
            Err(OutOfBounds {
                position: self.position,
                wanted,
                len: self.data.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Try to read a big-endian unsigned 32-bit integer starting at the
    /// current position.
    pub fn read_u32(&mut self) -> Result<u32, OutOfBounds> {
        let bytes = self.read_bytes(4)?;
        Ok(BigEndian::read_u32(bytes))
    }

    /// Try to read a big-endian signed 32-bit integer. The format stores
    /// signed values as the two's-complement bit pattern of a u32.
    pub fn read_i32(&mut self) -> Result<i32, OutOfBounds> {
        let bytes = self.read_bytes(4)?;
        Ok(BigEndian::read_i32(bytes))
    }

    /// Try to read `len` raw bytes starting at the current position. The
    /// returned slice aliases the underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], OutOfBounds> {
        self.check(len)?;
        let value = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(value)
    }

    /// Advance the position by `len` bytes without reading them.
    pub fn skip(&mut self, len: usize) -> Result<(), OutOfBounds> {
        self.check(len)?;
        self.position += len;
        Ok(())
    }

    /// Move to an absolute offset. Seeking to exactly `self.len()` is allowed.
    pub fn seek_to(&mut self, position: usize) -> Result<(), OutOfBounds> {
        if position > self.data.len() {
            return Err(OutOfBounds {
                position: self.position,
                wanted: position - self.position,
                len: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }
}

#[test]
fn read_u32() {
    let read = |bytes| ByteCursor::new(bytes).read_u32();
    assert!(read(&[]).is_err());
    assert!(read(&[0, 0, 1]).is_err());
    assert_eq!(read(&[0, 0, 0, 0]), Ok(0));
    assert_eq!(read(&[0, 0, 1, 44]), Ok(300));
    assert_eq!(read(&[0, 0, 3, 132]), Ok(900));
    assert_eq!(read(&[0x12, 0x34, 0x56, 0x78]), Ok(0x1234_5678));
    assert_eq!(read(&[255, 255, 255, 255]), Ok(u32::MAX));
}

#[test]
fn read_i32() {
    let read = |bytes| ByteCursor::new(bytes).read_i32();
    assert!(read(&[255, 255, 255]).is_err());
    assert_eq!(read(&[0, 0, 0, 1]), Ok(1));
    assert_eq!(read(&[255, 255, 255, 255]), Ok(-1));
    assert_eq!(read(&[255, 255, 255, 249]), Ok(-7));
    assert_eq!(read(&[0x80, 0, 0, 0]), Ok(i32::MIN));
    assert_eq!(read(&[0x7f, 255, 255, 255]), Ok(i32::MAX));
}

#[test]
fn read_u32_at_final_three_bytes() {
    let mut cursor = ByteCursor::new(&[0, 0, 0, 7, 1, 2, 3]);
    assert_eq!(cursor.read_u32(), Ok(7));
    assert_eq!(
        cursor.read_u32(),
        Err(OutOfBounds {
            position: 4,
            wanted: 4,
            len: 7
        })
    );
    assert_eq!(cursor.position(), 4);
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteCursor::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert!(read(&[], 1).is_err());
    assert_eq!(read(&[0], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert!(read(&[0], 2).is_err());

    let mut cursor = ByteCursor::new(&[1, 2, 3, 4, 5]);
    assert_eq!(cursor.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(cursor.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert!(cursor.read_bytes(1).is_err());
    assert_eq!(cursor.position(), 5);
}

#[test]
fn skip_and_seek() {
    let mut cursor = ByteCursor::new(&[0; 20]);
    assert_eq!(cursor.seek_to(16), Ok(()));
    assert_eq!(cursor.position(), 16);
    assert_eq!(cursor.skip(4), Ok(()));
    assert_eq!(cursor.remaining(), 0);
    assert!(cursor.skip(1).is_err());
    assert_eq!(cursor.position(), 20);
    assert!(cursor.seek_to(21).is_err());
    assert_eq!(cursor.seek_to(20), Ok(()));
    assert_eq!(cursor.seek_to(0), Ok(()));
    assert_eq!(cursor.remaining(), 20);
}

#[test]
fn read_sequence() {
    let mut cursor = ByteCursor::new(&[0, 0, 1, 47, 0, 0, 0, 8, 0, 0, 0, 0, 255, 255, 255, 249]);
    assert_eq!(cursor.read_u32(), Ok(303));
    assert_eq!(cursor.read_u32(), Ok(8));
    assert_eq!(cursor.read_u32(), Ok(0));
    assert_eq!(cursor.read_i32(), Ok(-7));
    assert!(cursor.read_u32().is_err());
}
