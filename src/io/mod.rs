// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for audio, annotation documents and the remote service.

pub mod media;
pub mod remote;
pub mod serialization;
