//! Little-endian byte cursor used by the GFD parsers.
use std::io::{ErrorKind, Read};

use crate::error::{FontError, Result};

/// A fixed-size, densely packed on-disk record.
///
/// `SIZE` is the exact number of bytes `read` consumes; there is never any
/// implicit padding between fields.
pub trait Record: Sized {
    const SIZE: usize;

    fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self>;
}

pub struct BinaryReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(FontError::UnexpectedEof {
                offset: self.position,
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_struct<T: Record>(&mut self) -> Result<T> {
        let start = self.position;
        let value = T::read(self)?;
        debug_assert_eq!(self.position - start, T::SIZE as u64);
        Ok(value)
    }

    pub fn read_multiple<T: Record>(&mut self, count: usize) -> Result<Vec<T>> {
        // untrusted count; grow past this instead of reserving it up front
        let mut out = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            out.push(self.read_struct()?);
        }
        Ok(out)
    }

    /// Reads a NUL-terminated single-byte string and decodes it as Latin-1.
    ///
    /// At most `limit` bytes (terminator included) are scanned. A string that
    /// is not terminated within that window is malformed.
    pub fn read_cstring_ascii(&mut self, limit: usize) -> Result<String> {
        let start = self.position;
        let mut out = String::new();
        for _ in 0..limit {
            match self.read_u8()? {
                0 => return Ok(out),
                b => out.push(char::from(b)),
            }
        }
        Err(FontError::MalformedData(format!(
            "string at offset {start} not terminated within {limit} bytes"
        )))
    }
}

impl Record for f32 {
    const SIZE: usize = 4;

    fn read<R: Read>(reader: &mut BinaryReader<R>) -> Result<Self> {
        reader.read_f32()
    }
}
