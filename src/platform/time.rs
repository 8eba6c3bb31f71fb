//! Fixed-rate frame pacing

use std::time::{Duration, Instant};

/// Sleeps out the remainder of each frame
#[derive(Debug)]
pub struct FrameClock {
    frame: Duration,
    next: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let frame = Duration::from_secs(1) / fps.max(1);
        Self {
            frame,
            next: Instant::now() + frame,
            frames: 0,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Frames waited out so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Block until the current frame's deadline
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            std::thread::sleep(remaining);
            self.next += self.frame;
        } else {
            // Running behind, don't try to catch up
            self.next = now + self.frame;
        }
        self.frames += 1;
    }
}
