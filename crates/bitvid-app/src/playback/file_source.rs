use bitvid_core::prelude::{ByteSource, StreamError};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Streaming reads straight from an encoded file on disk. The decoder's
/// own prefetch batching keeps the call count down, so no extra
/// buffering layer sits in between.
pub struct FileSource {
    file: File,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        Ok(Self {
            file: File::open(path)?,
        })
    }
}

impl ByteSource for FileSource {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        Ok(self.file.read(buf)?)
    }

    fn rewind(&mut self) -> Result<(), StreamError> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}
