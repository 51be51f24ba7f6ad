// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline tracks and the registry that orders them.
//!
//! Tracks are addressed by a stable [`TrackId`]; the name is display text
//! only. Display order is the explicit `order` field, which always forms
//! the permutation `0..len`.

use crate::constants::{DEFAULT_TRACK_HEIGHT, MIN_TRACK_HEIGHT, TRACK_HEIGHT_GRID};
use crate::util::geometry::{snap_to_grid, track_at_y, track_top_offset};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A horizontal lane in the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    /// Band height in pixels.
    pub height: f32,
    /// Rank among all tracks, 0 is the top band.
    pub order: usize,
}

impl Track {
    /// Create a minimum-height track at the given rank.
    pub fn new(name: impl Into<String>, order: usize) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            height: MIN_TRACK_HEIGHT,
            order,
        }
    }
}

/// Direction for [`TrackRegistry::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Up,
    Down,
}

/// Clamp a requested height to the minimum and quantize it to the grid.
pub fn normalize_track_height(height: f32) -> f32 {
    let snapped = snap_to_grid(height as f64, TRACK_HEIGHT_GRID as f64) as f32;
    snapped.max(MIN_TRACK_HEIGHT)
}

/// Ordered collection of tracks.
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// The four lanes a fresh session starts with.
    pub fn with_default_tracks() -> Self {
        let tracks = ["Track A", "Track B", "Track C", "Track D"]
            .iter()
            .enumerate()
            .map(|(order, name)| {
                let mut track = Track::new(*name, order);
                track.height = DEFAULT_TRACK_HEIGHT;
                track
            })
            .collect();
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Tracks sorted by display order.
    pub fn ordered(&self) -> Vec<&Track> {
        let mut ordered: Vec<&Track> = self.tracks.iter().collect();
        ordered.sort_by_key(|track| track.order);
        ordered
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.get(id).is_some()
    }

    /// The top band, if any.
    pub fn first(&self) -> Option<&Track> {
        self.tracks.iter().min_by_key(|track| track.order)
    }

    fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|track| track.id == id)
    }

    fn name_taken(&self, name: &str, except: Option<TrackId>) -> bool {
        self.tracks
            .iter()
            .any(|track| track.name == name && Some(track.id) != except)
    }

    /// Append a new minimum-height track named `Track N`.
    pub fn add(&mut self) -> TrackId {
        let mut number = self.tracks.len() + 1;
        let mut name = format!("Track {}", number);
        while self.name_taken(&name, None) {
            number += 1;
            name = format!("Track {}", number);
        }
        self.add_named(name, MIN_TRACK_HEIGHT)
    }

    /// Append a track with an explicit name and height at the bottom.
    pub fn add_named(&mut self, name: impl Into<String>, height: f32) -> TrackId {
        let mut track = Track::new(name, self.tracks.len());
        track.height = normalize_track_height(height);
        let id = track.id;
        log::info!("Added track '{}' ({})", track.name, id);
        self.tracks.push(track);
        id
    }

    /// Rename a track. Empty and duplicate names are refused.
    pub fn rename(&mut self, id: TrackId, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            log::warn!("Refusing empty name for track {}", id);
            return false;
        }
        if self.name_taken(new_name, Some(id)) {
            log::warn!("Refusing duplicate track name '{}'", new_name);
            return false;
        }
        match self.get_mut(id) {
            Some(track) => {
                log::info!("Renamed track '{}' to '{}'", track.name, new_name);
                track.name = new_name.to_string();
                true
            }
            None => {
                log::warn!("Rename of unknown track {}", id);
                false
            }
        }
    }

    /// Remove a track and close the gap in the order sequence.
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        let Some(index) = self.tracks.iter().position(|track| track.id == id) else {
            log::warn!("Delete of unknown track {}", id);
            return None;
        };
        let removed = self.tracks.remove(index);
        self.renumber();
        log::info!("Deleted track '{}', {} remaining", removed.name, self.tracks.len());
        Some(removed)
    }

    fn renumber(&mut self) {
        let mut ids: Vec<(usize, TrackId)> =
            self.tracks.iter().map(|track| (track.order, track.id)).collect();
        ids.sort();
        for (order, (_, id)) in ids.into_iter().enumerate() {
            if let Some(track) = self.get_mut(id) {
                track.order = order;
            }
        }
    }

    /// Swap a track with its neighbour. No-op at either end.
    pub fn reorder(&mut self, id: TrackId, direction: ReorderDirection) -> bool {
        let Some(current) = self.get(id).map(|track| track.order) else {
            log::warn!("Reorder of unknown track {}", id);
            return false;
        };
        let target = match direction {
            ReorderDirection::Up if current > 0 => current - 1,
            ReorderDirection::Down if current + 1 < self.tracks.len() => current + 1,
            _ => return false,
        };
        if let Some(neighbour) = self.tracks.iter_mut().find(|track| track.order == target) {
            neighbour.order = current;
        }
        if let Some(track) = self.get_mut(id) {
            track.order = target;
        }
        true
    }

    /// Walk a track to the given rank one swap at a time.
    pub fn move_to(&mut self, id: TrackId, order: usize) -> bool {
        let Some(mut current) = self.get(id).map(|track| track.order) else {
            return false;
        };
        let order = order.min(self.tracks.len().saturating_sub(1));
        let moved = current != order;
        while current != order {
            let direction = if current > order {
                ReorderDirection::Up
            } else {
                ReorderDirection::Down
            };
            if !self.reorder(id, direction) {
                break;
            }
            current = match direction {
                ReorderDirection::Up => current - 1,
                ReorderDirection::Down => current + 1,
            };
        }
        moved
    }

    /// Set a track's height, clamped and snapped to the height grid.
    pub fn resize(&mut self, id: TrackId, height: f32) -> bool {
        match self.get_mut(id) {
            Some(track) => {
                track.height = normalize_track_height(height);
                true
            }
            None => {
                log::warn!("Resize of unknown track {}", id);
                false
            }
        }
    }

    /// Vertical offset of a track's band.
    pub fn top_offset(&self, id: TrackId) -> Option<f32> {
        self.get(id)
            .map(|track| track_top_offset(&self.tracks, track.order))
    }

    /// The track whose band contains `y`.
    pub fn track_at_y(&self, y: f32) -> Option<&Track> {
        track_at_y(&self.tracks, y)
    }

    /// Position a dragged track takes with the pointer at `y`.
    ///
    /// Measured against the bands of the other tracks only, so the result
    /// does not depend on where the dragged track currently sits. The
    /// track passes a neighbour once the pointer crosses its midpoint.
    pub fn drop_order_at_y(&self, id: TrackId, y: f32) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        let mut top = 0.0;
        let mut order = 0;
        for track in self.ordered().into_iter().filter(|track| track.id != id) {
            if y >= top + track.height / 2.0 {
                order += 1;
            }
            top += track.height;
        }
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders(registry: &TrackRegistry) -> Vec<usize> {
        let mut orders: Vec<usize> = registry.tracks().iter().map(|t| t.order).collect();
        orders.sort();
        orders
    }

    fn names(registry: &TrackRegistry) -> Vec<String> {
        registry.ordered().iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_default_tracks() {
        let registry = TrackRegistry::with_default_tracks();
        assert_eq!(names(&registry), ["Track A", "Track B", "Track C", "Track D"]);
        assert!(registry.tracks().iter().all(|t| t.height == DEFAULT_TRACK_HEIGHT));
    }

    #[test]
    fn test_add_appends_at_bottom() {
        let mut registry = TrackRegistry::with_default_tracks();
        let id = registry.add();
        let track = registry.get(id).unwrap();
        assert_eq!(track.name, "Track 5");
        assert_eq!(track.order, 4);
        assert_eq!(track.height, MIN_TRACK_HEIGHT);
    }

    #[test]
    fn test_add_skips_taken_names() {
        let mut registry = TrackRegistry::new();
        let first = registry.add();
        registry.add();
        registry.remove(first);
        let id = registry.add();
        assert_eq!(registry.get(id).unwrap().name, "Track 3");
    }

    #[test]
    fn test_reorder_is_permutation() {
        let mut registry = TrackRegistry::with_default_tracks();
        let ids: Vec<TrackId> = registry.ordered().iter().map(|t| t.id).collect();

        assert!(registry.reorder(ids[2], ReorderDirection::Up));
        assert_eq!(names(&registry), ["Track A", "Track C", "Track B", "Track D"]);
        assert_eq!(orders(&registry), [0, 1, 2, 3]);

        assert!(!registry.reorder(ids[0], ReorderDirection::Up));
        assert!(!registry.reorder(ids[3], ReorderDirection::Down));
        assert_eq!(orders(&registry), [0, 1, 2, 3]);

        assert!(registry.move_to(ids[3], 0));
        assert_eq!(names(&registry), ["Track D", "Track A", "Track C", "Track B"]);
        assert_eq!(orders(&registry), [0, 1, 2, 3]);
    }

    #[test]
    fn test_drop_order_ignores_dragged_track() {
        let mut registry = TrackRegistry::with_default_tracks();
        let ids: Vec<TrackId> = registry.ordered().iter().map(|t| t.id).collect();
        registry.resize(ids[0], 128.0);
        registry.resize(ids[1], 32.0);

        // Without B the bands are A 0..128, C 128..192, D 192..256.
        assert_eq!(registry.drop_order_at_y(ids[1], 40.0), Some(0));
        assert_eq!(registry.drop_order_at_y(ids[1], 100.0), Some(1));
        assert_eq!(registry.drop_order_at_y(ids[1], 170.0), Some(2));
        assert_eq!(registry.drop_order_at_y(ids[1], 900.0), Some(3));
        assert_eq!(registry.drop_order_at_y(ids[1], -5.0), Some(0));

        // Moving B leaves the answer unchanged.
        assert!(registry.move_to(ids[1], 0));
        assert_eq!(registry.drop_order_at_y(ids[1], 100.0), Some(1));
        assert_eq!(registry.drop_order_at_y(TrackId::new(), 100.0), None);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut registry = TrackRegistry::with_default_tracks();
        let second = registry.ordered()[1].id;
        assert!(registry.remove(second).is_some());
        assert_eq!(names(&registry), ["Track A", "Track C", "Track D"]);
        assert_eq!(orders(&registry), [0, 1, 2]);
        assert!(registry.remove(second).is_none());
    }

    #[test]
    fn test_rename_rules() {
        let mut registry = TrackRegistry::with_default_tracks();
        let first = registry.ordered()[0].id;
        assert!(registry.rename(first, "  Speaker 1 "));
        assert_eq!(registry.get(first).unwrap().name, "Speaker 1");
        assert!(!registry.rename(first, "   "));
        assert!(!registry.rename(first, "Track B"));
        assert!(registry.rename(first, "Speaker 1"));
        assert!(!registry.rename(TrackId::new(), "Nobody"));
    }

    #[test]
    fn test_resize_clamps_and_snaps() {
        let mut registry = TrackRegistry::with_default_tracks();
        let id = registry.ordered()[0].id;
        registry.resize(id, 10.0);
        assert_eq!(registry.get(id).unwrap().height, MIN_TRACK_HEIGHT);
        registry.resize(id, 90.0);
        assert_eq!(registry.get(id).unwrap().height, 96.0);
        registry.resize(id, 87.0);
        assert_eq!(registry.get(id).unwrap().height, 80.0);
    }

    #[test]
    fn test_top_offset_follows_order() {
        let mut registry = TrackRegistry::with_default_tracks();
        let ids: Vec<TrackId> = registry.ordered().iter().map(|t| t.id).collect();
        registry.resize(ids[0], 128.0);
        assert_eq!(registry.top_offset(ids[1]), Some(128.0));
        registry.reorder(ids[1], ReorderDirection::Up);
        assert_eq!(registry.top_offset(ids[1]), Some(0.0));
        assert_eq!(registry.top_offset(ids[0]), Some(64.0));
        assert_eq!(registry.track_at_y(70.0).map(|t| t.id), Some(ids[0]));
    }
}
