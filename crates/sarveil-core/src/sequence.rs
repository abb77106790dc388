use std::fmt;
use std::io::Write;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SarveilError};
use crate::render::FrameArtifact;

/// GIF encoder speed (1 = best quality, 30 = fastest).
const GIF_ENCODER_SPEED: i32 = 10;

/// How often the animation plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopCount {
    #[default]
    Infinite,
    Finite(u16),
}

impl fmt::Display for LoopCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinite => write!(f, "loops forever"),
            Self::Finite(n) => write!(f, "repeats {n}x"),
        }
    }
}

impl From<LoopCount> for Repeat {
    fn from(count: LoopCount) -> Self {
        match count {
            LoopCount::Infinite => Repeat::Infinite,
            LoopCount::Finite(n) => Repeat::Finite(n),
        }
    }
}

/// Ordered frames plus playback settings, ready to encode.
#[derive(Clone, Debug)]
pub struct SequenceArtifact {
    pub frames: Vec<FrameArtifact>,
    pub fps: u32,
    pub loop_count: LoopCount,
}

impl SequenceArtifact {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Display time of a single frame in milliseconds.
    pub fn frame_delay_ms(&self) -> f64 {
        1000.0 / self.fps as f64
    }

    /// Encode as an animated GIF into `writer`.
    pub fn encode_gif<W: Write>(&self, writer: W) -> Result<()> {
        let mut encoder = GifEncoder::new_with_speed(writer, GIF_ENCODER_SPEED);
        encoder.set_repeat(self.loop_count.into())?;
        for frame in &self.frames {
            let delay = Delay::from_numer_denom_ms(1000, self.fps);
            encoder.encode_frame(Frame::from_parts(frame.pixels.clone(), 0, 0, delay))?;
        }
        Ok(())
    }

    pub fn to_gif_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.encode_gif(&mut bytes)?;
        Ok(bytes)
    }
}

/// Validate that `frames` form one ordered run of equal-sized images and wrap them.
///
/// Frames must arrive with sequence indices `0..N` in order.
pub fn assemble(frames: Vec<FrameArtifact>, fps: u32, loop_count: LoopCount) -> Result<SequenceArtifact> {
    let Some(first) = frames.first() else {
        return Err(SarveilError::EmptyFrameSet);
    };
    if fps == 0 {
        return Err(SarveilError::InvalidConfig(
            "animation fps must be at least 1".to_string(),
        ));
    }

    let dims = first.dimensions();
    for (position, frame) in frames.iter().enumerate() {
        if frame.sequence_index != position {
            return Err(SarveilError::FrameOrder {
                position,
                expected: position,
                found: frame.sequence_index,
            });
        }
        if frame.dimensions() != dims {
            let (width, height) = frame.dimensions();
            return Err(SarveilError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
    }

    info!(frames = frames.len(), fps, %loop_count, "Assembled sequence");
    Ok(SequenceArtifact {
        frames,
        fps,
        loop_count,
    })
}
