// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Extrudes every triangle along its face normal.
///
/// The extrusion length is `constant + factor * edge-length-sum`, the cap
/// can be shrunk toward its center, side faces are optional, and
/// recognized shared edges suppress interior side faces so connected
/// surfaces extrude as one.
#[derive(Debug, Clone)]
pub struct ExtrudeModifier {
    enabled: bool,
    props: Properties,
}

impl Default for ExtrudeModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("constant", PropertyValue::Float(0.1));
        props.define("factor", PropertyValue::Float(0.0));
        props.define_ranged(
            "shift",
            PropertyValue::Float(0.0),
            PropertyValue::Float(0.0),
            PropertyValue::Float(1.0),
        );
        props.define("create_faces", PropertyValue::Bool(true));
        props.define("recognize_edges", PropertyValue::Bool(false));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for ExtrudeModifier {
    fn class_name(&self) -> &'static str {
        "geoextrude"
    }

    fn version(&self) -> u32 {
        2
    }

    fn gui_name(&self) -> &'static str {
        "extrude"
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
        if geometry.num_triangles() == 0 {
            return Ok(());
        }
        geometry.extrude_triangles(
            self.props.float_value("constant"),
            self.props.float_value("factor"),
            self.props.float_value("shift"),
            self.props.bool_value("create_faces"),
            self.props.bool_value("recognize_edges"),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::factory;

    #[test]
    fn test_extruded_cube_grows() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        factory::create_cube(&mut geo, 1.0, true);
        let before = geo.num_triangles();

        let mut m = ExtrudeModifier::default();
        m.properties_mut()
            .set("constant", PropertyValue::Float(0.5));
        m.execute(&mut geo, &Monitor::new()).unwrap();
        // every face is replaced by a cap plus side faces
        assert!(geo.num_triangles() > before);

        let (min, max) = geo.extent().unwrap();
        assert!(max.x - min.x > 1.5);
    }

    #[test]
    fn test_no_triangles_is_a_no_op() {
        let mut geo = Geometry::new();
        factory::create_cube(&mut geo, 1.0, false);
        ExtrudeModifier::default()
            .execute(&mut geo, &Monitor::new())
            .unwrap();
        assert_eq!(geo.num_lines(), 12);
    }
}
