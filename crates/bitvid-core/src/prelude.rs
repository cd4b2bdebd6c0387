//! Convenient imports for consumers of bitvid-core
//!
//! Pull in everything commonly needed in one line:
//! ```rust
//! use bitvid_core::prelude::*;
//! ```

// Main playback API
pub use crate::video::{Player, PlayerError};

// Codec pieces
pub use crate::video::decoder::{DecodeError, DecoderOptions, FrameDecoder, Opcode};
pub use crate::video::encoder::{StreamEncoder, encode_frame};
pub use crate::video::frame_buffer::FrameBuffer;

// Traits that users might need
pub use crate::video::stream::{ByteSource, MemorySource, StreamError};

// Constants
pub use crate::video::{FRAME_BYTES, HEIGHT, PIXELS, WIDTH};
