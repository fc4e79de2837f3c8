// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Keyhop crates.
//!
//! Enabled via feature flags so the core can be built without them.

#[cfg(feature = "scene_adapter")]
pub mod scene;
