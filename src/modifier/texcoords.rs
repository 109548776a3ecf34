// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Scales, offsets and optionally mirrors all texture coordinates, or
/// remaps every triangle's corners to the fixed (0,0)-(0,1)-(1,1) pattern
#[derive(Debug, Clone)]
pub struct TexCoordsModifier {
    enabled: bool,
    props: Properties,
}

impl Default for TexCoordsModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("offset", PropertyValue::Floats(vec![0.0, 0.0]));
        props.define("scale", PropertyValue::Floats(vec![1.0, 1.0]));
        props.define("invert_u", PropertyValue::Bool(false));
        props.define("invert_v", PropertyValue::Bool(false));
        props.define("tri_corners", PropertyValue::Bool(false));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for TexCoordsModifier {
    fn class_name(&self) -> &'static str {
        "geotexcoords"
    }

    fn gui_name(&self) -> &'static str {
        "texture coordinates"
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
        if self.props.bool_value("tri_corners") {
            geometry.map_triangle_tex_coords();
            return Ok(());
        }

        let mut offset = self.props.floats_value("offset");
        offset.resize(2, 0.0);
        let mut scale = self.props.floats_value("scale");
        scale.resize(2, 1.0);

        geometry.transform_tex_coords(scale[0], scale[1], offset[0], offset[1]);
        if self.props.bool_value("invert_u") {
            geometry.transform_tex_coords(-1.0, 1.0, 1.0, 0.0);
        }
        if self.props.bool_value("invert_v") {
            geometry.transform_tex_coords(1.0, -1.0, 0.0, 1.0);
        }
        Ok(())
    }
}
