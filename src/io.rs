//! Source/sink abstraction for codecs.
//!
//! Codecs are written once against [`DataReader`] / [`DataWriter`] and run
//! unchanged over an open stream ([`StreamReader`], [`StreamWriter`]) or an
//! in-memory blob ([`MemoryReader`], [`MemoryWriter`], `Vec<u8>`).
//! [`ReadAdapter`] and [`WriteAdapter`] expose either side as `std::io`
//! traits for codec libraries that expect them.

use std::io::{self, Read, Seek, SeekFrom, Write};

use log::{trace, warn};

/// Readable, seekable byte source.
pub trait DataReader {
    /// Read up to `buf.len()` bytes, returning how many were read.
    ///
    /// Short reads are normal; `Ok(0)` for a non-empty `buf` means the
    /// source is exhausted (or latched, see [`clear_errors`](Self::clear_errors)).
    /// Never blocks waiting for data that will not arrive.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Current read position from the start of the source.
    fn tell(&self) -> u64;

    /// Move the read position by `offset` bytes (negative moves back).
    ///
    /// The position never goes below zero; bounded sources also clamp at
    /// their length. Returns the new position.
    fn seek(&mut self, offset: i64) -> io::Result<u64>;

    /// Reset any sticky end-of-input or error state so the source can be
    /// read again after a rewind.
    fn clear_errors(&mut self);
}

/// Writable byte sink.
pub trait DataWriter {
    /// Write bytes, returning how many were accepted.
    ///
    /// Fixed-capacity sinks accept fewer than `buf.len()` once full;
    /// streams write everything or fail.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<R: DataReader + ?Sized> DataReader for &mut R {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn tell(&self) -> u64 {
        (**self).tell()
    }

    fn seek(&mut self, offset: i64) -> io::Result<u64> {
        (**self).seek(offset)
    }

    fn clear_errors(&mut self) {
        (**self).clear_errors()
    }
}

impl<W: DataWriter + ?Sized> DataWriter for &mut W {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

// ---------------------------------------------------------------------------
// Stream backends
// ---------------------------------------------------------------------------

/// [`DataReader`] over a `Read + Seek` stream.
///
/// Once a read hits end of stream or fails, the reader latches and returns
/// `Ok(0)` until [`clear_errors`](DataReader::clear_errors) is called.
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
    pos: u64,
    latched: bool,
}

impl<R: Read + Seek> StreamReader<R> {
    /// Wrap `inner`, reading from its current position.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let pos = inner.stream_position()?;
        Ok(Self {
            inner,
            pos,
            latched: false,
        })
    }

    /// Whether the reader is latched at end of input or after an error.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> DataReader for StreamReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.latched {
            return Ok(0);
        }
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    trace!("end of stream at offset {}", self.pos + filled as u64);
                    self.latched = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("stream read failed at offset {}: {}", self.pos + filled as u64, e);
                    self.latched = true;
                    if filled == 0 {
                        return Err(e);
                    }
                    break;
                }
            }
        }
        self.pos += filled as u64;
        Ok(filled)
    }

    fn tell(&self) -> u64 {
        self.pos
    }

    fn seek(&mut self, offset: i64) -> io::Result<u64> {
        let target = self.pos.saturating_add_signed(offset);
        trace!("stream seek {:+} -> {}", offset, target);
        self.pos = self.inner.seek(SeekFrom::Start(target))?;
        Ok(self.pos)
    }

    fn clear_errors(&mut self) {
        self.latched = false;
    }
}

/// [`DataWriter`] over a `Write` stream. Writes are all-or-error.
#[derive(Debug)]
pub struct StreamWriter<W> {
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DataWriter for StreamWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Memory backends
// ---------------------------------------------------------------------------

/// [`DataReader`] over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct MemoryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemoryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl DataReader for MemoryReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn tell(&self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, offset: i64) -> io::Result<u64> {
        let target = (self.pos as u64).saturating_add_signed(offset);
        self.pos = target.min(self.data.len() as u64) as usize;
        Ok(self.pos as u64)
    }

    fn clear_errors(&mut self) {}
}

/// [`DataWriter`] into a fixed, borrowed buffer. Truncates at capacity.
#[derive(Debug)]
pub struct MemoryWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> MemoryWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Capacity left.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The written prefix of the buffer.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl DataWriter for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        self.buf[self.pos..self.pos + n].copy_from_slice(&buf[..n]);
        self.pos += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Growable in-memory sink.
impl DataWriter for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// std::io adapters
// ---------------------------------------------------------------------------

/// Exposes a [`DataReader`] as `std::io::Read + Seek`.
///
/// `SeekFrom::End` is rejected because readers need not know their length.
pub struct ReadAdapter<'a, R: ?Sized> {
    inner: &'a mut R,
}

impl<'a, R: DataReader + ?Sized> ReadAdapter<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner }
    }
}

impl<R: DataReader + ?Sized> Read for ReadAdapter<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: DataReader + ?Sized> Seek for ReadAdapter<'_, R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let offset = match pos {
            SeekFrom::Current(n) => n,
            SeekFrom::Start(target) => {
                let here = self.inner.tell();
                if target >= here {
                    i64::try_from(target - here)
                } else {
                    i64::try_from(here - target).map(|n| -n)
                }
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "seek offset out of range"))?
            }
            SeekFrom::End(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "DataReader cannot seek from end",
                ));
            }
        };
        self.inner.seek(offset)
    }
}

/// Exposes a [`DataWriter`] as `std::io::Write`.
///
/// A full fixed-capacity sink reports `Ok(0)`, which `write_all` turns
/// into `ErrorKind::WriteZero`.
pub struct WriteAdapter<'a, W: ?Sized> {
    inner: &'a mut W,
}

impl<'a, W: DataWriter + ?Sized> WriteAdapter<'a, W> {
    pub fn new(inner: &'a mut W) -> Self {
        Self { inner }
    }
}

impl<W: DataWriter + ?Sized> Write for WriteAdapter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn memory_reader_short_read_at_end() {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = MemoryReader::new(&data);
        let mut buf = [0u8; 3];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], [4, 5]);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.tell(), 5);
    }

    #[test]
    fn memory_reader_seek_clamps() {
        let data = [0u8; 10];
        let mut reader = MemoryReader::new(&data);
        assert_eq!(reader.seek(4).unwrap(), 4);
        assert_eq!(reader.seek(-2).unwrap(), 2);
        assert_eq!(reader.seek(-100).unwrap(), 0);
        assert_eq!(reader.seek(100).unwrap(), 10);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.seek(i64::MIN).unwrap(), 0);
    }

    #[test]
    fn stream_reader_latches_until_cleared() {
        let mut reader = StreamReader::new(Cursor::new(vec![1u8, 2, 3])).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert!(reader.is_latched());

        // Rewind without clearing: still latched.
        reader.seek(-3).unwrap();
        assert_eq!(reader.read(&mut buf).unwrap(), 0);

        reader.clear_errors();
        assert_eq!(reader.read(&mut buf[..2]).unwrap(), 2);
        assert_eq!(&buf[..2], [1, 2]);
        assert_eq!(reader.tell(), 2);
    }

    #[test]
    fn stream_reader_starts_at_current_position() {
        let mut cursor = Cursor::new(vec![9u8, 8, 7, 6]);
        cursor.set_position(2);
        let mut reader = StreamReader::new(cursor).unwrap();
        assert_eq!(reader.tell(), 2);
        assert_eq!(reader.seek(-10).unwrap(), 0);
    }

    #[test]
    fn stream_reader_surfaces_first_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("unplugged"))
            }
        }
        impl Seek for Broken {
            fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
                Ok(0)
            }
        }
        let mut reader = StreamReader::new(Broken).unwrap();
        let mut buf = [0u8; 4];
        assert!(reader.read(&mut buf).is_err());
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn memory_writer_truncates() {
        let mut buf = [0u8; 4];
        let mut writer = MemoryWriter::new(&mut buf);
        assert_eq!(writer.write(&[1, 2, 3]).unwrap(), 3);
        assert_eq!(writer.write(&[4, 5, 6]).unwrap(), 1);
        assert_eq!(writer.write(&[7]).unwrap(), 0);
        assert_eq!(writer.written(), [1, 2, 3, 4]);
        writer.flush().unwrap();
    }

    #[test]
    fn stream_writer_writes_everything() {
        let mut writer = StreamWriter::new(Vec::new());
        assert_eq!(writer.write(&[1, 2, 3]).unwrap(), 3);
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), [1, 2, 3]);
    }

    #[test]
    fn read_adapter_supports_std_io() {
        let data: Vec<u8> = (0..32).collect();
        let mut reader = MemoryReader::new(&data);
        let mut adapter = ReadAdapter::new(&mut reader);
        adapter.seek(SeekFrom::Start(30)).unwrap();
        let mut rest = Vec::new();
        adapter.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, [30, 31]);
        assert_eq!(adapter.seek(SeekFrom::Start(4)).unwrap(), 4);
        assert_eq!(adapter.stream_position().unwrap(), 4);
        assert!(adapter.seek(SeekFrom::End(0)).is_err());
    }

    #[test]
    fn write_adapter_reports_full_sink() {
        let mut buf = [0u8; 2];
        let mut writer = MemoryWriter::new(&mut buf);
        let mut adapter = WriteAdapter::new(&mut writer);
        let err = adapter.write_all(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn trait_objects_work() {
        let data = [5u8; 6];
        let mut memory = MemoryReader::new(&data);
        let reader: &mut dyn DataReader = &mut memory;
        let mut buf = [0u8; 6];
        assert_eq!(reader.read(&mut buf).unwrap(), 6);

        let mut out = Vec::new();
        let writer: &mut dyn DataWriter = &mut out;
        writer.write(&buf).unwrap();
        assert_eq!(out, data);
    }
}
