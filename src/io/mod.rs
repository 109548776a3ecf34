// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! I/O module - the tagged binary record stream used for persistence

mod stream;

pub use stream::{StreamError, StreamReader, StreamWriter};
