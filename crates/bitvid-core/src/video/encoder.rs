//! Frame encoder for the run-length stream format.
//!
//! Per frame the cheapest representation wins: a frame identical to the
//! previous one becomes a blank, uniform frames become clears, and
//! everything else is the smallest of raw, overwrite runs, or
//! exclusive-or runs against the previous frame.

use crate::video::decoder::Opcode;
use crate::video::frame_buffer::FrameBuffer;
use crate::video::run::{MAX_RUN_LEN, Run};
use crate::video::{FRAME_BYTES, PIXELS};

/// Appends one encoded frame to `out`.
///
/// `prev` is the frame the decoder currently holds; without it neither
/// blank nor delta frames can be emitted.
pub fn encode_frame(frame: &FrameBuffer, prev: Option<&FrameBuffer>, out: &mut Vec<u8>) {
    if let Some(prev) = prev
        && prev.as_bytes() == frame.as_bytes()
    {
        out.push(Opcode::Blank.to_byte());
        return;
    }
    if frame.as_bytes().iter().all(|&b| b == 0x00) {
        out.push(Opcode::ClearOff.to_byte());
        return;
    }
    if frame.as_bytes().iter().all(|&b| b == 0xFF) {
        out.push(Opcode::ClearOn.to_byte());
        return;
    }

    let rle = run_bytes(|i| frame.get(i));
    let delta = prev.map(|prev| run_bytes(|i| frame.get(i) != prev.get(i)));

    match delta {
        Some(delta) if delta.len() <= rle.len() && delta.len() < FRAME_BYTES => {
            out.push(Opcode::Delta.to_byte());
            out.extend_from_slice(&delta);
        }
        _ if rle.len() < FRAME_BYTES => {
            out.push(Opcode::Rle.to_byte());
            out.extend_from_slice(&rle);
        }
        _ => {
            out.push(Opcode::Raw.to_byte());
            out.extend_from_slice(frame.as_bytes());
        }
    }
}

/// Run-length encodes one whole frame of `pixel` values. Emitted run
/// lengths always sum to exactly `PIXELS`; spans longer than
/// `MAX_RUN_LEN` split into consecutive maximum-length runs.
fn run_bytes(pixel: impl Fn(usize) -> bool) -> Vec<u8> {
    let mut out = Vec::new();
    let mut index = 0;
    while index < PIXELS {
        let on = pixel(index);
        let mut len = 1;
        while index + len < PIXELS && pixel(index + len) == on {
            len += 1;
        }
        index += len;

        while len > MAX_RUN_LEN {
            out.push(Run { len: MAX_RUN_LEN, on }.to_byte());
            len -= MAX_RUN_LEN;
        }
        out.push(Run { len, on }.to_byte());
    }
    out
}

/// Encodes a sequence of frames into one stream, tracking the previous
/// frame so blank and delta opcodes get used.
pub struct StreamEncoder {
    prev: Option<FrameBuffer>,
    out: Vec<u8>,
}

impl Default for StreamEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamEncoder {
    pub fn new() -> Self {
        Self {
            prev: None,
            out: Vec::new(),
        }
    }

    pub fn push_frame(&mut self, frame: &FrameBuffer) {
        encode_frame(frame, self.prev.as_ref(), &mut self.out);
        self.prev = Some(frame.clone());
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::run::RunMode;

    fn striped_frame() -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        for i in 0..PIXELS {
            frame.set(i, (i / 13) % 2 == 0);
        }
        frame
    }

    #[test]
    fn test_uniform_frames_become_clears() {
        let mut out = Vec::new();
        encode_frame(&FrameBuffer::new(), None, &mut out);
        assert_eq!(out, vec![Opcode::ClearOff.to_byte()]);

        let mut on = FrameBuffer::new();
        on.fill(0xFF);
        out.clear();
        encode_frame(&on, None, &mut out);
        assert_eq!(out, vec![Opcode::ClearOn.to_byte()]);
    }

    #[test]
    fn test_repeated_frame_becomes_blank() {
        let frame = striped_frame();
        let mut out = Vec::new();
        encode_frame(&frame, Some(&frame), &mut out);
        assert_eq!(out, vec![Opcode::Blank.to_byte()]);
    }

    #[test]
    fn test_run_lengths_sum_to_frame() {
        let frame = striped_frame();
        let bytes = run_bytes(|i| frame.get(i));
        let total: usize = bytes.iter().map(|&b| Run::from_byte(b).len).sum();
        assert_eq!(total, PIXELS);
    }

    #[test]
    fn test_long_span_splits_at_max_run_len() {
        // All-on span of 300 pixels, then off for the rest.
        let mut frame = FrameBuffer::new();
        for i in 0..300 {
            frame.set(i, true);
        }
        let bytes = run_bytes(|i| frame.get(i));
        let runs: Vec<Run> = bytes.iter().map(|&b| Run::from_byte(b)).collect();
        assert_eq!(runs[0], Run { len: 127, on: true });
        assert_eq!(runs[1], Run { len: 127, on: true });
        assert_eq!(runs[2], Run { len: 46, on: true });
        assert!(!runs[3].on);
    }

    #[test]
    fn test_rle_frame_decodes_back() {
        let frame = striped_frame();
        let bytes = run_bytes(|i| frame.get(i));

        let mut decoded = FrameBuffer::new();
        let mut pass = crate::video::run::RunPass::new(&mut decoded, RunMode::Overwrite);
        for &byte in &bytes {
            pass.apply(Run::from_byte(byte)).unwrap();
        }
        assert!(pass.is_complete());
        assert_eq!(decoded.as_bytes(), frame.as_bytes());
    }

    #[test]
    fn test_delta_chosen_for_small_changes() {
        let prev = striped_frame();
        let mut next = prev.clone();
        next.set(500, !next.get(500));

        let mut out = Vec::new();
        encode_frame(&next, Some(&prev), &mut out);
        assert_eq!(Opcode::from(out[0]), Opcode::Delta);
        // One flipped pixel: off run, 1-pixel on run, off run to the
        // end, with long spans split.
        let total: usize = out[1..]
            .iter()
            .map(|&b| Run::from_byte(b).len)
            .sum();
        assert_eq!(total, PIXELS);
    }
}
