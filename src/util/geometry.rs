// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps between timeline time (seconds), horizontal pixel
//! positions, and vertical track bands. Track bands are derived from the
//! track heights on every call, so adding, removing or reordering tracks
//! never leaves stale offsets behind.

use crate::models::track::Track;

/// Convert a time in seconds to a horizontal pixel offset.
pub fn time_to_pixel(time: f64, total_duration: f64, timeline_width: f32) -> f32 {
    if total_duration <= 0.0 {
        return 0.0;
    }
    (time / total_duration * timeline_width as f64) as f32
}

/// Convert a horizontal pixel offset to a time, clamped to `[0, total_duration]`.
pub fn pixel_to_time(pixel: f32, total_duration: f64, timeline_width: f32) -> f64 {
    if timeline_width <= 0.0 || total_duration <= 0.0 {
        return 0.0;
    }
    let time = pixel as f64 / timeline_width as f64 * total_duration;
    time.clamp(0.0, total_duration)
}

/// Round a value to the nearest multiple of `interval`.
pub fn snap_to_grid(value: f64, interval: f64) -> f64 {
    if interval <= 0.0 {
        return value;
    }
    (value / interval).round() * interval
}

/// Vertical offset of the track band with the given order.
pub fn track_top_offset(tracks: &[Track], order: usize) -> f32 {
    tracks
        .iter()
        .filter(|track| track.order < order)
        .map(|track| track.height)
        .sum()
}

/// Total height of all track bands.
pub fn total_tracks_height(tracks: &[Track]) -> f32 {
    tracks.iter().map(|track| track.height).sum()
}

/// Find the track whose band `[top, top + height)` contains `y`.
pub fn track_at_y(tracks: &[Track], y: f32) -> Option<&Track> {
    if y < 0.0 {
        return None;
    }
    let mut ordered: Vec<&Track> = tracks.iter().collect();
    ordered.sort_by_key(|track| track.order);

    let mut top = 0.0;
    for track in ordered {
        if y < top + track.height {
            return Some(track);
        }
        top += track.height;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(heights: &[f32]) -> Vec<Track> {
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let mut track = Track::new(format!("Track {}", i + 1), i);
                track.height = *h;
                track
            })
            .collect()
    }

    #[test]
    fn test_time_pixel_roundtrip() {
        let total = 300.0;
        let width = 1200.0;
        for t in [0.0, 1.0, 12.5, 150.0, 299.0, 300.0] {
            let px = time_to_pixel(t, total, width);
            let back = pixel_to_time(px, total, width);
            assert!((back - t).abs() < 0.001, "{} -> {} -> {}", t, px, back);
        }
    }

    #[test]
    fn test_pixel_to_time_clamps() {
        assert_eq!(pixel_to_time(-50.0, 300.0, 600.0), 0.0);
        assert_eq!(pixel_to_time(900.0, 300.0, 600.0), 300.0);
    }

    #[test]
    fn test_degenerate_dimensions() {
        assert_eq!(time_to_pixel(10.0, 0.0, 600.0), 0.0);
        assert_eq!(pixel_to_time(10.0, 300.0, 0.0), 0.0);
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(11.6, 1.0), 12.0);
        assert_eq!(snap_to_grid(11.4, 1.0), 11.0);
        assert_eq!(snap_to_grid(71.0, 16.0), 64.0);
        assert_eq!(snap_to_grid(73.0, 16.0), 80.0);
        assert_eq!(snap_to_grid(3.3, 0.0), 3.3);
    }

    #[test]
    fn test_track_bands_are_contiguous() {
        let tracks = tracks(&[64.0, 32.0, 48.0]);
        let mut expected_top = 0.0;
        for order in 0..tracks.len() {
            let top = track_top_offset(&tracks, order);
            assert_eq!(top, expected_top);
            let track = tracks.iter().find(|t| t.order == order).unwrap();
            expected_top += track.height;
        }
        assert_eq!(expected_top, total_tracks_height(&tracks));
    }

    #[test]
    fn test_track_at_y_agrees_with_offsets() {
        let mut tracks = tracks(&[64.0, 32.0, 48.0]);
        // Put the last track first.
        tracks[0].order = 1;
        tracks[1].order = 2;
        tracks[2].order = 0;

        for track in &tracks {
            let top = track_top_offset(&tracks, track.order);
            assert_eq!(track_at_y(&tracks, top).map(|t| t.id), Some(track.id));
            assert_eq!(
                track_at_y(&tracks, top + track.height - 0.5).map(|t| t.id),
                Some(track.id)
            );
        }
        assert!(track_at_y(&tracks, -1.0).is_none());
        assert!(track_at_y(&tracks, 144.0).is_none());
    }
}
