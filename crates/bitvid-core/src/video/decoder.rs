use crate::video::frame_buffer::FrameBuffer;
use crate::video::run::{Run, RunMode, RunOverflow, RunPass};
use crate::video::stream::{ByteSource, StreamError};
use crate::video::{FRAME_BYTES, PIXELS};
use thiserror::Error;

/// Run bytes prefetched in one pull before dropping to single-byte
/// reads. 40 runs cover at most 40 * 127 = 5080 of the 5120 pixels, so
/// the batch can never cross a frame boundary.
const RUN_PREFETCH: usize = PIXELS / 128;

/// Per-frame operation selector, one byte at the start of every frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// Frame unchanged; no payload.
    Blank,
    /// Uncompressed frame; `FRAME_BYTES` of payload.
    Raw,
    /// Full frame as overwrite runs.
    Rle,
    /// Difference frame as exclusive-or runs.
    Delta,
    /// Whole frame to off; no payload.
    ClearOff,
    /// Whole frame to on; no payload.
    ClearOn,
    /// Any other byte. Skipped with no payload unless decoding
    /// strictly; see [`FrameDecoder`] for the desync risk.
    Unknown(u8),
}

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        match byte {
            0 => Opcode::Blank,
            1 => Opcode::Raw,
            2 => Opcode::Rle,
            3 => Opcode::Delta,
            4 => Opcode::ClearOff,
            5 => Opcode::ClearOn,
            other => Opcode::Unknown(other),
        }
    }
}

impl Opcode {
    pub fn to_byte(self) -> u8 {
        match self {
            Opcode::Blank => 0,
            Opcode::Raw => 1,
            Opcode::Rle => 2,
            Opcode::Delta => 3,
            Opcode::ClearOff => 4,
            Opcode::ClearOn => 5,
            Opcode::Unknown(byte) => byte,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stream ended inside a frame: {0}")]
    Stream(#[from] StreamError),

    #[error("{0}")]
    RunOverflow(#[from] RunOverflow),

    #[error("unknown opcode byte 0x{0:02X}")]
    UnknownOpcode(u8),
}

#[derive(Copy, Clone, Debug, Default)]
pub struct DecoderOptions {
    /// Report unknown opcode bytes instead of skipping them.
    pub strict: bool,
}

/// Routes one frame's opcode to the matching operation.
///
/// Unrecognized opcodes are treated as blank frames by default, exactly
/// like the wire format defines them: zero payload, buffer untouched.
/// A stray byte misread as an opcode therefore desyncs silently; strict
/// mode turns such bytes into [`DecodeError::UnknownOpcode`] instead.
pub struct FrameDecoder {
    options: DecoderOptions,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Decodes one frame into `frame`.
    ///
    /// The opcode byte has already been read by the caller; this pulls
    /// exactly the payload bytes the operation needs from `source` and
    /// nothing more.
    pub fn decode_frame(
        &self,
        opcode: Opcode,
        source: &mut dyn ByteSource,
        frame: &mut FrameBuffer,
    ) -> Result<(), DecodeError> {
        match opcode {
            Opcode::Blank => Ok(()),
            Opcode::Raw => {
                let mut raw = [0u8; FRAME_BYTES];
                source.pull_exact(&mut raw)?;
                frame.load_raw(&raw);
                Ok(())
            }
            Opcode::Rle => self.decode_runs(source, frame, RunMode::Overwrite),
            Opcode::Delta => self.decode_runs(source, frame, RunMode::Xor),
            Opcode::ClearOff => {
                frame.fill(0x00);
                Ok(())
            }
            Opcode::ClearOn => {
                frame.fill(0xFF);
                Ok(())
            }
            Opcode::Unknown(byte) => {
                if self.options.strict {
                    Err(DecodeError::UnknownOpcode(byte))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Applies run bytes until the cursor lands exactly on `PIXELS`.
    /// The prefetch batch keeps pull calls down; after it, one byte at
    /// a time so the frame's final run byte is the last byte consumed.
    fn decode_runs(
        &self,
        source: &mut dyn ByteSource,
        frame: &mut FrameBuffer,
        mode: RunMode,
    ) -> Result<(), DecodeError> {
        let mut pass = RunPass::new(frame, mode);

        let mut batch = [0u8; RUN_PREFETCH];
        source.pull_exact(&mut batch)?;
        for &byte in batch.iter() {
            pass.apply(Run::from_byte(byte))?;
        }

        while !pass.is_complete() {
            pass.apply(Run::from_byte(source.pull_byte()?))?;
        }
        Ok(())
    }
}
