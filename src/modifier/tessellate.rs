// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Subdivides triangles (and optionally lines) at their midpoints.
/// Each level quadruples the triangle count and doubles line segments.
/// Min-area and min-length gates (when positive) leave triangles that
/// are already small enough untouched.
#[derive(Debug, Clone)]
pub struct TessellateModifier {
    enabled: bool,
    props: Properties,
}

impl Default for TessellateModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define_ranged(
            "level",
            PropertyValue::Int(1),
            PropertyValue::Int(1),
            PropertyValue::Int(8),
        );
        props.define("lines", PropertyValue::Bool(false));
        props.define("min_area", PropertyValue::Float(0.0));
        props.define("min_length", PropertyValue::Float(0.0));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for TessellateModifier {
    fn class_name(&self) -> &'static str {
        "geotess"
    }

    fn gui_name(&self) -> &'static str {
        "tessellate"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn properties(&self) -> &Properties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.props
    }

    fn clone_box(&self) -> Box<dyn GeometryModifier> {
        Box::new(self.clone())
    }

    fn execute(&self, geometry: &mut Geometry, _monitor: &Monitor) -> anyhow::Result<()> {
        let level = self.props.int_value("level") as u32;
        let min_area = self.props.float_value("min_area");
        let min_length = self.props.float_value("min_length");
        geometry.tesselate_triangles_gated(min_area, min_length, level);
        if self.props.bool_value("lines") {
            geometry.tesselate_lines(level);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::factory;

    #[test]
    fn test_level_two_quadruples_twice() {
        let mut geo = Geometry::new();
        factory::create_tetrahedron(&mut geo, 1.0, true);
        let mut m = TessellateModifier::default();
        m.properties_mut().set("level", PropertyValue::Int(2));
        m.execute(&mut geo, &Monitor::new()).unwrap();
        assert_eq!(geo.num_triangles(), 64);
    }
}
