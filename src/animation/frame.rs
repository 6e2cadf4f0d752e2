use crate::error::{SpriteError, SpriteResult};
use crate::transform::SpriteImage;
use serde::{Deserialize, Serialize};

/// One image of an animation and how long it stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<I> {
    pub image: I,
    pub duration_ms: u32,
    original_size: (u32, u32),
}

impl<I: SpriteImage> Frame<I> {
    pub fn new(image: I, duration_ms: u32) -> SpriteResult<Self> {
        if duration_ms == 0 {
            return Err(SpriteError::InvalidDuration(duration_ms));
        }
        let original_size = image.dimensions();
        Ok(Self {
            image,
            duration_ms,
            original_size,
        })
    }

    /// Size of the image as it was added, before any flip or rotation.
    pub fn original_size(&self) -> (u32, u32) {
        self.original_size
    }
}

/// Snapshot of a sequencer's playback cursor, detached from its frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_index: usize,
    pub elapsed_ms: u64,
    pub loop_index: usize,
}

impl PlaybackState {
    pub fn encode(&self) -> SpriteResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| {
            SpriteError::EncodingError(format!("Playback state encoding failed: {}", e))
        })
    }

    pub fn decode(data: &[u8]) -> SpriteResult<Self> {
        bincode::deserialize(data).map_err(|e| {
            SpriteError::DecodingError(format!("Playback state decoding failed: {}", e))
        })
    }
}
