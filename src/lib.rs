// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Procedural mesh construction and modification.
//!
//! The crate centers on two types: [`Geometry`], an indexed container of
//! vertices with per-vertex channels and triangle/line/point primitives,
//! and [`ModifierChain`], an ordered, serializable pipeline of operators
//! that rewrite a geometry in place.
//!
//! ```
//! use meshforge::{Geometry, ModifierChain, Monitor};
//! use meshforge::modifier::{CreateModifier, TessellateModifier};
//!
//! let mut chain = ModifierChain::new();
//! chain.add(Box::new(CreateModifier::default()));
//! chain.add(Box::new(TessellateModifier::default()));
//!
//! let mut geometry = Geometry::new();
//! chain.execute(&mut geometry, &Monitor::new()).unwrap();
//! assert!(geometry.num_triangles() > 0);
//! ```

pub mod geometry;
pub mod io;
pub mod modifier;
pub mod utils;

pub use geometry::{EquationError, Geometry, UserAttribute, VertexArraySink, MIN_SHARE_THRESHOLD};
pub use io::{StreamError, StreamReader, StreamWriter};
pub use modifier::{
    GeometryModifier, ModifierChain, ModifierRegistry, Monitor, Properties, PropertyValue,
};
