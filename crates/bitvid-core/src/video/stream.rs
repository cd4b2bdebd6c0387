use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("stream read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Pull-based supplier of encoded bytes.
///
/// Decoders do not know up front how many bytes a frame holds; they
/// pull a small batch, then single bytes, and stop exactly when the
/// frame is complete. Implementations only need [`pull`](Self::pull)
/// and [`rewind`](Self::rewind); the exact-read helpers are derived.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes into `buf`. Returns the number of
    /// bytes read; `0` means end of stream. Short reads are allowed.
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, StreamError>;

    /// Repositions the stream to offset 0 (the looping-playback path).
    fn rewind(&mut self) -> Result<(), StreamError>;

    /// Fills `buf` completely or fails with `UnexpectedEof`.
    fn pull_exact(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.pull(&mut buf[filled..])? {
                0 => return Err(StreamError::UnexpectedEof),
                n => filled += n,
            }
        }
        Ok(())
    }

    fn pull_byte(&mut self) -> Result<u8, StreamError> {
        let mut byte = [0u8; 1];
        self.pull_exact(&mut byte)?;
        Ok(byte[0])
    }
}

/// In-memory byte source over an owned stream (dropped-file payloads
/// and tests).
pub struct MemorySource {
    data: Vec<u8>,
    pos: usize,
}

impl MemorySource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for MemorySource {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn rewind(&mut self) -> Result<(), StreamError> {
        self.pos = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_short_reads_then_eof() {
        let mut source = MemorySource::new(vec![1, 2, 3]);
        let mut buf = [0u8; 2];
        assert_eq!(source.pull(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(source.pull(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
        assert_eq!(source.pull(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_pull_exact_eof_is_error() {
        let mut source = MemorySource::new(vec![1, 2]);
        let mut buf = [0u8; 3];
        assert!(matches!(
            source.pull_exact(&mut buf),
            Err(StreamError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_rewind_restarts_reads() {
        let mut source = MemorySource::new(vec![7, 8]);
        assert_eq!(source.pull_byte().unwrap(), 7);
        assert_eq!(source.pull_byte().unwrap(), 8);
        source.rewind().unwrap();
        assert_eq!(source.pull_byte().unwrap(), 7);
    }
}
