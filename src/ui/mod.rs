// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the TONETRACK application.

pub mod debug;
pub mod properties;
pub mod timeline;
pub mod toolbar;
