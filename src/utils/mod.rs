// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Shared numeric utilities

pub mod math;
pub mod noise;
