// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Rewrites positions through user equations, one per axis.
///
/// Equations see `x`, `y`, `z`, the index `i` and the origin distance `d`.
/// In primitive mode the equations move whole primitives by their centroid
/// instead of individual vertices.
#[derive(Debug, Clone)]
pub struct VertexEquationModifier {
    enabled: bool,
    props: Properties,
}

impl Default for VertexEquationModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("equation_x", PropertyValue::Text("x".into()));
        props.define("equation_y", PropertyValue::Text("y".into()));
        props.define("equation_z", PropertyValue::Text("z".into()));
        props.define("primitives", PropertyValue::Bool(false));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for VertexEquationModifier {
    fn class_name(&self) -> &'static str {
        "geoequ"
    }

    fn gui_name(&self) -> &'static str {
        "vertex equation"
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
        let eq_x = self.props.text_value("equation_x");
        let eq_y = self.props.text_value("equation_y");
        let eq_z = self.props.text_value("equation_z");

        if self.props.bool_value("primitives") {
            geometry.transform_primitives_with_equation(&eq_x, &eq_y, &eq_z)?;
        } else {
            geometry.transform_with_equation(&eq_x, &eq_y, &eq_z)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::geometry::factory;

    #[test]
    fn test_wave_equation_moves_vertices() {
        let mut geo = Geometry::new();
        factory::create_quad(&mut geo, 2.0, 2.0, true);

        let mut m = VertexEquationModifier::default();
        m.properties_mut()
            .set("equation_z", PropertyValue::Text("z + sin(x)".into()));
        m.execute(&mut geo, &Monitor::new()).unwrap();
        assert_relative_eq!(geo.position(1).z, 1.0_f32.sin(), epsilon = 1e-5);
    }

    #[test]
    fn test_bad_equation_fails_without_changes() {
        let mut geo = Geometry::new();
        factory::create_quad(&mut geo, 2.0, 2.0, true);
        let before = geo.positions().to_vec();

        let mut m = VertexEquationModifier::default();
        m.properties_mut()
            .set("equation_x", PropertyValue::Text("x +* 2".into()));
        assert!(m.execute(&mut geo, &Monitor::new()).is_err());
        assert_eq!(geo.positions(), before.as_slice());
    }
}
