// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback clock standing in for the host media element.
//!
//! Only two facts flow from media into the editor: the total duration and
//! the current position. The clock owns both and advances the position by
//! frame time while playing.

/// Current time and length of the loaded media.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    position: f64,
    duration: f64,
    playing: bool,
}

impl PlaybackClock {
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration: duration.max(0.0),
            playing: false,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.playing = false;
        } else if self.position < self.duration {
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Jump to a time, clamped to `[0, duration]`.
    pub fn seek(&mut self, time: f64) {
        self.position = if time.is_finite() {
            time.clamp(0.0, self.duration)
        } else {
            0.0
        };
    }

    /// Advance by `dt` seconds while playing; stops at the end.
    pub fn tick(&mut self, dt: f64) {
        if !self.playing || dt <= 0.0 {
            return;
        }
        self.position += dt;
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
        }
    }

    /// Apply a duration reported by the media. Non-positive values are ignored.
    pub fn set_duration(&mut self, duration: f64) -> bool {
        if !duration.is_finite() || duration <= 0.0 {
            log::debug!("Ignoring media duration {}", duration);
            return false;
        }
        self.duration = duration;
        self.position = self.position.min(duration);
        true
    }

    /// Rewind and stop for freshly loaded media.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_stops_at_end() {
        let mut clock = PlaybackClock::new(10.0);
        clock.toggle();
        clock.tick(4.0);
        assert_eq!(clock.position(), 4.0);
        clock.tick(100.0);
        assert_eq!(clock.position(), 10.0);
        assert!(!clock.is_playing());

        // Cannot start again from the very end.
        clock.toggle();
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_paused_clock_does_not_move() {
        let mut clock = PlaybackClock::new(10.0);
        clock.tick(3.0);
        assert_eq!(clock.position(), 0.0);
    }

    #[test]
    fn test_seek_clamps() {
        let mut clock = PlaybackClock::new(10.0);
        clock.seek(25.0);
        assert_eq!(clock.position(), 10.0);
        clock.seek(-1.0);
        assert_eq!(clock.position(), 0.0);
        clock.seek(f64::NAN);
        assert_eq!(clock.position(), 0.0);
    }

    #[test]
    fn test_set_duration() {
        let mut clock = PlaybackClock::new(300.0);
        clock.seek(200.0);
        assert!(!clock.set_duration(0.0));
        assert!(!clock.set_duration(f64::INFINITY));
        assert_eq!(clock.duration(), 300.0);
        assert!(clock.set_duration(120.0));
        assert_eq!(clock.position(), 120.0);
    }
}
