pub mod frame;

pub use frame::{Frame, PlaybackState};

use crate::error::{SpriteError, SpriteResult};
use crate::render::Renderer;
use crate::transform::SpriteImage;
use log::{debug, trace, warn};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Frame list shared by every sequencer created through [`FrameSequencer::duplicate`].
pub type SharedFrames<I> = Rc<RefCell<Vec<Frame<I>>>>;

/// Playback clock for a multi-image sprite animation.
///
/// Frames play in insertion order. Once the last frame has run out the cursor
/// jumps back to the loop index, which defaults to the first frame.
///
/// # Aliasing
///
/// [`duplicate`](Self::duplicate) returns a sequencer with its own cursor over
/// the *same* frame list. Adding frames, flipping or rotating through any of
/// the aliases rewrites the images all of them draw. Width and height are
/// kept per sequencer and only change through that sequencer's rotations.
///
/// # Panics
///
/// Mutating the frame list (adding frames, flips, rotations) while a
/// [`frames`](Self::frames) borrow from any alias is alive panics.
pub struct FrameSequencer<I> {
    frames: SharedFrames<I>,
    current_index: usize,
    elapsed_ms: u64,
    loop_index: usize,
    size: Option<(u32, u32)>,
}

impl<I: SpriteImage> FrameSequencer<I> {
    pub fn new() -> Self {
        Self {
            frames: Rc::new(RefCell::new(Vec::new())),
            current_index: 0,
            elapsed_ms: 0,
            loop_index: 0,
            size: None,
        }
    }

    /// New cursor over the same frames, starting where `self` currently is.
    pub fn duplicate(&self) -> Self {
        Self {
            frames: Rc::clone(&self.frames),
            current_index: self.current_index,
            elapsed_ms: self.elapsed_ms,
            loop_index: self.loop_index,
            size: self.size,
        }
    }

    pub fn shares_frames_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.frames, &other.frames)
    }

    /// Appends a frame. The first frame of the list fixes the sprite size.
    pub fn add_frame(&mut self, image: I, duration_ms: u32) -> SpriteResult<()> {
        let frame = Frame::new(image, duration_ms)?;
        let (width, height) = frame.image.dimensions();

        let (sprite_w, sprite_h) = match self.resolved_size() {
            Some(size) => size,
            None => {
                debug!("Sprite size set to {}x{} by first frame", width, height);
                (width, height)
            }
        };
        self.size = Some((sprite_w, sprite_h));

        let mut frames = self.frames.borrow_mut();
        if (width, height) != (sprite_w, sprite_h) && (height, width) != (sprite_w, sprite_h) {
            warn!(
                "Frame {} is {}x{}, sprite is {}x{}",
                frames.len(),
                width,
                height,
                sprite_w,
                sprite_h
            );
        }
        frames.push(frame);
        Ok(())
    }

    /// Own snapshot, or frame 0's size as added when another alias added it.
    fn resolved_size(&self) -> Option<(u32, u32)> {
        self.size
            .or_else(|| self.frames.borrow().first().map(Frame::original_size))
    }

    /// Moves the cursor one frame forward, wrapping to the loop index.
    /// Elapsed time is left alone.
    pub fn step(&mut self) -> SpriteResult<()> {
        let len = self.non_empty_len("step")?;
        self.current_index = next_index(self.current_index, len, self.loop_index);
        Ok(())
    }

    /// Adds `delta_ms` to the time spent on the current frame and steps past
    /// every frame whose duration has been exceeded.
    ///
    /// A frame is left only once its time is strictly exceeded: landing
    /// exactly on the duration keeps it visible.
    pub fn advance(&mut self, delta_ms: u64) -> SpriteResult<()> {
        let len = self.non_empty_len("advance")?;
        let frames = self.frames.borrow();

        let cycle_ms: u64 = frames[self.loop_index..]
            .iter()
            .map(|f| u64::from(f.duration_ms))
            .sum();

        let mut index = self.current_index;
        let mut elapsed = self.elapsed_ms.saturating_add(delta_ms);

        loop {
            // whole passes over the looping tail land back on the same frame
            if index >= self.loop_index && elapsed > cycle_ms {
                elapsed -= (elapsed - 1) / cycle_ms * cycle_ms;
            }

            let duration = u64::from(frames[index].duration_ms);
            if elapsed <= duration {
                break;
            }
            elapsed -= duration;
            index = next_index(index, len, self.loop_index);
        }

        self.current_index = index;
        self.elapsed_ms = elapsed;
        Ok(())
    }

    pub fn advance_by(&mut self, delta: Duration) -> SpriteResult<()> {
        self.advance(u64::try_from(delta.as_millis()).unwrap_or(u64::MAX))
    }

    /// Draws the current frame with its top-left corner at `(x, y)`.
    pub fn draw<R: Renderer<I>>(&self, renderer: &mut R, x: i32, y: i32) -> SpriteResult<()> {
        self.non_empty_len("draw")?;
        let frames = self.frames.borrow();
        renderer.draw_image(&frames[self.current_index].image, x, y);
        Ok(())
    }

    /// Back to the first frame, ignoring the loop index.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.elapsed_ms = 0;
    }

    pub fn flip_horizontal(&mut self) -> &mut Self {
        self.map_images(I::flip_horizontal);
        self
    }

    pub fn flip_vertical(&mut self) -> &mut Self {
        self.map_images(I::flip_vertical);
        self
    }

    pub fn rotate_clockwise(&mut self) -> &mut Self {
        self.swap_size();
        self.map_images(I::rotate_clockwise);
        self
    }

    pub fn rotate_counterclockwise(&mut self) -> &mut Self {
        self.swap_size();
        self.map_images(I::rotate_counterclockwise);
        self
    }

    fn swap_size(&mut self) {
        self.size = self.resolved_size().map(|(w, h)| (h, w));
    }

    fn map_images(&self, transform: fn(&I) -> I) {
        for frame in self.frames.borrow_mut().iter_mut() {
            frame.image = transform(&frame.image);
        }
    }

    pub fn set_loop_index(&mut self, index: usize) -> SpriteResult<()> {
        let len = self.frame_count();
        if index >= len && !(len == 0 && index == 0) {
            return Err(SpriteError::InvalidLoopIndex { index, len });
        }
        self.loop_index = index;
        Ok(())
    }

    pub fn loop_index(&self) -> usize {
        self.loop_index
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.resolved_size().unwrap_or((0, 0))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    pub fn is_animated(&self) -> bool {
        self.frame_count() > 1
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.frames
            .borrow()
            .iter()
            .map(|f| u64::from(f.duration_ms))
            .sum()
    }

    pub fn frames(&self) -> Ref<'_, [Frame<I>]> {
        Ref::map(self.frames.borrow(), |frames| frames.as_slice())
    }

    pub fn current_image(&self) -> SpriteResult<I> {
        self.non_empty_len("read")?;
        Ok(self.frames.borrow()[self.current_index].image.clone())
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_index: self.current_index,
            elapsed_ms: self.elapsed_ms,
            loop_index: self.loop_index,
        }
    }

    /// Puts the cursor back where a saved [`PlaybackState`] left it.
    ///
    /// Elapsed time beyond the current frame is played forward immediately.
    pub fn restore(&mut self, state: PlaybackState) -> SpriteResult<()> {
        let len = self.non_empty_len("restore")?;
        if state.current_index >= len {
            return Err(SpriteError::DecodingError(format!(
                "Frame index {} out of range for {} frame(s)",
                state.current_index, len
            )));
        }
        self.set_loop_index(state.loop_index)?;
        self.current_index = state.current_index;
        self.elapsed_ms = 0;
        self.advance(state.elapsed_ms)
    }

    fn non_empty_len(&self, op: &'static str) -> SpriteResult<usize> {
        match self.frames.borrow().len() {
            0 => Err(SpriteError::EmptySequence(op)),
            len => Ok(len),
        }
    }
}

impl<I: SpriteImage> Default for FrameSequencer<I> {
    fn default() -> Self {
        Self::new()
    }
}

fn next_index(index: usize, len: usize, loop_index: usize) -> usize {
    let next = index + 1;
    if next >= len {
        trace!("Animation wrapped to frame {}", loop_index);
        loop_index
    } else {
        next
    }
}
