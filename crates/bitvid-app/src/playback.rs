pub mod file_source;

use bitvid_core::prelude::*;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Wall-clock period between frames. The stream format carries no
/// timing information; playback runs at a fixed 20 fps.
pub const TICK: Duration = Duration::from_millis(50);

/// One open stream being played: the decoding state plus the source it
/// pulls from and the tick pacing. The UI pumps it once per repaint;
/// frames decode only when their tick has come due.
pub struct Playback {
    player: Player,
    source: Box<dyn ByteSource>,
    next_tick: Instant,
    paused: bool,
}

impl Playback {
    pub fn new(source: Box<dyn ByteSource>) -> Self {
        Self {
            player: Player::new(),
            source,
            next_tick: Instant::now(),
            paused: false,
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        self.player.frame()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_paused(&mut self) {
        self.paused = !self.paused;
        if !self.paused {
            self.next_tick = Instant::now();
        }
    }

    /// Decodes the next frame if its tick has come due. Returns the
    /// time until the following tick so the UI can schedule a repaint.
    pub fn pump(&mut self) -> Result<Duration, PlayerError> {
        if self.paused {
            return Ok(TICK);
        }

        let now = Instant::now();
        if now >= self.next_tick {
            let (looped, opcode) = self.player.advance(self.source.as_mut())?;
            debug!("decoded frame: {:?}", opcode);
            if looped {
                info!("end of stream, looping");
            }
            self.next_tick = now + TICK;
        }
        Ok(self.next_tick.saturating_duration_since(Instant::now()))
    }
}
