// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use nalgebra::Vector3;

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Scales all vertices around the origin.
/// The uniform factor multiplies with the per-axis factors.
#[derive(Debug, Clone)]
pub struct ScaleModifier {
    enabled: bool,
    props: Properties,
}

impl Default for ScaleModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("all", PropertyValue::Float(1.0));
        props.define("axis", PropertyValue::Floats(vec![1.0, 1.0, 1.0]));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for ScaleModifier {
    fn class_name(&self) -> &'static str {
        "geoscale"
    }

    fn gui_name(&self) -> &'static str {
        "scale"
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
        let all = self.props.float_value("all");
        let mut axis = self.props.floats_value("axis");
        axis.resize(3, 1.0);
        geometry.scale(Vector3::new(axis[0] * all, axis[1] * all, axis[2] * all));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_uniform_and_axis_factors_multiply() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        geo.add_vertex(Point3::new(1.0, 1.0, 1.0), Vector3::zeros());

        let mut m = ScaleModifier::default();
        m.properties_mut().set("all", PropertyValue::Float(2.0));
        m.properties_mut()
            .set("axis", PropertyValue::Floats(vec![1.0, 3.0, 1.0]));
        m.execute(&mut geo, &Monitor::new()).unwrap();
        assert_eq!(geo.position(0), Point3::new(2.0, 6.0, 2.0));
    }
}
