// Copyright 2025 the Keyhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial backends.

pub mod flatvec;
pub mod grid;
