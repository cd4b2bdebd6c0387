pub mod decoder;
pub mod encoder;
pub mod frame_buffer;
pub mod run;
pub mod stream;


use decoder::{DecodeError, DecoderOptions, FrameDecoder, Opcode};
use frame_buffer::FrameBuffer;
use stream::{ByteSource, StreamError};
use thiserror::Error;

pub const WIDTH: usize = 80;
pub const HEIGHT: usize = 64;
pub const PIXELS: usize = WIDTH * HEIGHT;
pub const FRAME_BYTES: usize = PIXELS / 8;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("stream contains no frames")]
    EmptyStream,

    #[error("frame decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
}

/// Playback state for one encoded stream: the frame buffer plus the
/// decoder it is advanced with. Owned by the caller and advanced one
/// frame per tick; the caller hands [`Player::frame`] to the display
/// after each successful [`Player::advance`].
pub struct Player {
    frame: FrameBuffer,
    decoder: FrameDecoder,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            frame: FrameBuffer::new(),
            decoder: FrameDecoder::with_options(options),
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Decodes the next frame from `source`.
    ///
    /// Reads one opcode byte and consumes exactly that frame's payload.
    /// End of stream and read failure on the opcode byte alike rewind
    /// the source to offset 0 and retry the read, so a finite stream
    /// plays as an endless loop. A stream that is empty even after
    /// rewinding is an error, as is any failure while a frame's payload
    /// is being decoded.
    ///
    /// # Returns
    ///
    /// Returns a `(bool, Opcode)` tuple
    /// - First value is `true` if the stream wrapped around before this frame
    /// - Second value is the opcode of the frame that was decoded
    pub fn advance(
        &mut self,
        source: &mut dyn ByteSource,
    ) -> Result<(bool, Opcode), PlayerError> {
        let mut opcode = [0u8; 1];
        let looped = match source.pull(&mut opcode) {
            Ok(n) if n > 0 => false,
            Ok(_) | Err(_) => {
                source.rewind()?;
                if source.pull(&mut opcode)? == 0 {
                    return Err(PlayerError::EmptyStream);
                }
                true
            }
        };

        let opcode = Opcode::from(opcode[0]);
        self.decoder.decode_frame(opcode, source, &mut self.frame)?;
        Ok((looped, opcode))
    }
}
