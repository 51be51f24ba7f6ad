// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline grid and layout constants.

/// Time grid in seconds. Committed annotation bounds are multiples of this.
pub const GRID_INTERVAL: f64 = 1.0;

/// Track heights are quantized to this many pixels.
pub const TRACK_HEIGHT_GRID: f32 = 16.0;

/// Smallest allowed track height in pixels.
pub const MIN_TRACK_HEIGHT: f32 = 32.0;

/// Height of the tracks a fresh session starts with.
pub const DEFAULT_TRACK_HEIGHT: f32 = 64.0;

/// Length of a newly created annotation in seconds.
pub const DEFAULT_ANNOTATION_DURATION: f64 = 5.0;

/// Duration assumed before any media reports its own.
pub const DEFAULT_TOTAL_DURATION: f64 = 300.0;

/// Width of the grab strip on an annotation's right edge.
pub const RESIZE_HANDLE_WIDTH: f32 = 8.0;

/// Height of the grab strip along a track's bottom edge.
pub const TRACK_HANDLE_HEIGHT: f32 = 8.0;

/// Width of the track label column left of the lanes.
pub const TRACK_LABEL_WIDTH: f32 = 100.0;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
pub const ZOOM_STEP: f32 = 1.2;
