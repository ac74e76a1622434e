//! Frame animation

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::rasterizer::Image;

/// A playing animation. Clones share frame images but keep their own
/// playback position.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<Arc<Image>>,
    frame_duration: f32,
    index: usize,
    elapsed: f32,
    looping: bool,
}

impl Animation {
    pub fn new(frames: Vec<Arc<Image>>, frame_duration: f32, looping: bool) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::config("animation needs at least one frame"));
        }
        if !(frame_duration > 0.0) {
            return Err(Error::config(format!(
                "animation frame duration must be positive, got {}",
                frame_duration
            )));
        }
        Ok(Self {
            frames,
            frame_duration,
            index: 0,
            elapsed: 0.0,
            looping,
        })
    }

    /// Single-frame animation that never advances
    pub fn still(frame: Arc<Image>) -> Self {
        Self {
            frames: vec![frame],
            frame_duration: 1.0,
            index: 0,
            elapsed: 0.0,
            looping: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if self.frame_duration <= 0.0 {
            return;
        }
        self.elapsed += dt;
        if !(self.elapsed >= self.frame_duration) {
            return;
        }
        // Whole frames to step; float to int casts saturate
        let steps = (self.elapsed / self.frame_duration).floor() as u64;
        self.elapsed = self.elapsed.rem_euclid(self.frame_duration);

        let len = self.frames.len() as u64;
        let last = len - 1;
        let index = self.index as u64;
        if self.looping {
            self.index = ((index + steps % len) % len) as usize;
        } else if index.saturating_add(steps) >= last {
            // Clamped on the last frame; drop the leftover time
            self.index = last as usize;
            self.elapsed = 0.0;
        } else {
            self.index = (index + steps) as usize;
        }
    }

    pub fn current_frame(&self) -> &Arc<Image> {
        &self.frames[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Back to the first frame
    pub fn restart(&mut self) {
        self.index = 0;
        self.elapsed = 0.0;
    }

    /// Size of the first frame
    pub fn frame_size(&self) -> (usize, usize) {
        let frame = &self.frames[0];
        (frame.width, frame.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    fn frames(n: usize) -> Vec<Arc<Image>> {
        (0..n).map(|i| Arc::new(Image::new_filled(1, 1, Color::new(i as u8, 0, 0)))).collect()
    }

    #[test]
    fn test_advance_steps_frames() {
        let mut anim = Animation::new(frames(4), 0.1, true).unwrap();
        anim.advance(0.25);
        assert_eq!(anim.index(), 2);
    }

    #[test]
    fn test_looping_wraps() {
        let mut anim = Animation::new(frames(3), 1.0, true).unwrap();
        anim.advance(3.5);
        assert_eq!(anim.index(), 0);
        anim.advance(1.0);
        assert_eq!(anim.index(), 1);
    }

    #[test]
    fn test_non_looping_clamps() {
        let mut anim = Animation::new(frames(3), 1.0, false).unwrap();
        anim.advance(10.0);
        assert_eq!(anim.index(), 2);
        anim.advance(10.0);
        assert_eq!(anim.index(), 2);
    }

    #[test]
    fn test_huge_step_terminates() {
        let mut anim = Animation::new(frames(3), 0.1, true).unwrap();
        anim.advance(1.0e12);
        assert!(anim.index() < 3);
        assert!(anim.elapsed >= 0.0 && anim.elapsed < 0.1);

        let mut anim = Animation::new(frames(3), 0.1, false).unwrap();
        anim.advance(f32::MAX);
        assert_eq!(anim.index(), 2);
    }

    #[test]
    fn test_clones_share_frames_not_playback() {
        let anim = Animation::new(frames(2), 1.0, true).unwrap();
        let mut copy = anim.clone();
        copy.advance(1.0);
        assert_eq!(anim.index(), 0);
        assert_eq!(copy.index(), 1);
        assert!(Arc::ptr_eq(&anim.frames[1], copy.current_frame()));
    }

    #[test]
    fn test_rejects_bad_construction() {
        assert!(matches!(Animation::new(Vec::new(), 0.1, true), Err(Error::Configuration(_))));
        assert!(matches!(Animation::new(frames(1), 0.0, true), Err(Error::Configuration(_))));
        assert!(matches!(Animation::new(frames(1), -1.0, true), Err(Error::Configuration(_))));
    }
}
