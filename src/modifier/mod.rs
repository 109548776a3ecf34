// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Serializable geometry operators.
//!
//! A [`GeometryModifier`] wraps one geometry operation behind a uniform
//! interface: a stable class name for persistence, a [`Properties`] bag for
//! parameters, and an `execute` that rewrites a [`Geometry`] in place.
//! Modifiers are collected into a [`ModifierChain`] which runs and
//! serializes them in order.

mod chain;
mod convert_lines;
mod create;
mod duplicate;
mod enumerate;
mod extrude;
mod noise;
mod normalize;
mod properties;
mod remove;
mod rotate;
mod scale;
mod tessellate;
mod texcoords;
mod translate;
mod vertex_equation;

pub use chain::{ModifierChain, ModifierRegistry, Monitor};
pub use convert_lines::ConvertLinesModifier;
pub use create::CreateModifier;
pub use duplicate::DuplicateModifier;
pub use enumerate::EnumerateModifier;
pub use extrude::ExtrudeModifier;
pub use noise::NoiseModifier;
pub use normalize::NormalizeModifier;
pub use properties::{Properties, PropertyValue};
pub use remove::RemoveModifier;
pub use rotate::RotateModifier;
pub use scale::ScaleModifier;
pub use tessellate::TessellateModifier;
pub use texcoords::TexCoordsModifier;
pub use translate::TranslateModifier;
pub use vertex_equation::VertexEquationModifier;

use crate::geometry::Geometry;
use crate::io::{StreamError, StreamReader, StreamWriter};

/// Tag of the common record every modifier starts with
const MODIFIER_TAG: &str = "geommod";
const MODIFIER_VERSION: u32 = 1;

pub(crate) fn write_preamble(w: &mut StreamWriter, enabled: bool) {
    w.write_header(MODIFIER_TAG, MODIFIER_VERSION);
    w.write_bool(enabled);
}

pub(crate) fn read_preamble(r: &mut StreamReader) -> Result<bool, StreamError> {
    r.read_header(MODIFIER_TAG, MODIFIER_VERSION)?;
    r.read_bool()
}

/// One serializable geometry operation
pub trait GeometryModifier: Send {
    /// Stable identifier used in serialized chains
    fn class_name(&self) -> &'static str;

    /// Version of this modifier's serialized payload
    fn version(&self) -> u32 {
        1
    }

    /// Human readable name for UIs
    fn gui_name(&self) -> &'static str;

    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);

    fn properties(&self) -> &Properties;
    fn properties_mut(&mut self) -> &mut Properties;

    fn clone_box(&self) -> Box<dyn GeometryModifier>;

    /// Serialize the common preamble, the class header and the parameters
    fn write(&self, w: &mut StreamWriter) -> Result<(), StreamError> {
        write_preamble(w, self.is_enabled());
        w.write_header(self.class_name(), self.version());
        w.write_bytes(&serde_json::to_vec(self.properties())?);
        Ok(())
    }

    /// Deserialize state written by [`GeometryModifier::write`].
    /// Stored values are merged over the defaults, so parameters added in
    /// later versions keep their default when reading old data.
    fn read(&mut self, r: &mut StreamReader) -> Result<(), StreamError> {
        let enabled = read_preamble(r)?;
        self.set_enabled(enabled);
        r.read_header(self.class_name(), self.version())?;
        let stored: Properties = serde_json::from_slice(r.read_bytes()?)?;
        self.properties_mut().merge(&stored);
        Ok(())
    }

    /// Apply the operation to a geometry.
    /// `monitor` reports progress and carries the cancellation flag.
    fn execute(&self, geometry: &mut Geometry, monitor: &Monitor) -> anyhow::Result<()>;
}

impl Clone for Box<dyn GeometryModifier> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn GeometryModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryModifier")
            .field("class_name", &self.class_name())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
