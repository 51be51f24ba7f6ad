// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor data model: annotations, tracks, playback and pointer interaction.

pub mod annotation;
pub mod interaction;
pub mod playback;
pub mod session;
pub mod store;
pub mod track;
