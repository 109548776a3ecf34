// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use nalgebra::Point3;

use crate::geometry::Geometry;
use crate::utils::math;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Pulls vertices toward a sphere of the given radius around the origin.
/// `amount` blends between the original (0) and fully projected (1) shape.
#[derive(Debug, Clone)]
pub struct NormalizeModifier {
    enabled: bool,
    props: Properties,
}

impl Default for NormalizeModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("radius", PropertyValue::Float(1.0));
        props.define_ranged(
            "amount",
            PropertyValue::Float(1.0),
            PropertyValue::Float(0.0),
            PropertyValue::Float(1.0),
        );
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for NormalizeModifier {
    fn class_name(&self) -> &'static str {
        "geonormalize"
    }

    fn gui_name(&self) -> &'static str {
        "normalize"
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
        let radius = self.props.float_value("radius");
        let amount = self.props.float_value("amount");

        if amount >= 1.0 {
            geometry.normalize_positions(radius);
            return Ok(());
        }

        for i in 0..geometry.num_vertices() as u32 {
            let p = geometry.position(i);
            if p.coords.norm() < f32::EPSILON {
                continue;
            }
            let target = p.coords.normalize() * radius;
            geometry.set_position(
                i,
                Point3::new(
                    math::lerp(p.x, target.x, amount),
                    math::lerp(p.y, target.y, amount),
                    math::lerp(p.z, target.z, amount),
                ),
            );
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
    fn test_full_amount_projects_onto_sphere() {
        let mut geo = Geometry::new();
        factory::create_cube(&mut geo, 2.0, true);
        NormalizeModifier::default()
            .execute(&mut geo, &Monitor::new())
            .unwrap();
        for p in geo.positions() {
            assert_relative_eq!(p.coords.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_half_amount_blends() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        geo.add_vertex(Point3::new(4.0, 0.0, 0.0), nalgebra::Vector3::zeros());

        let mut m = NormalizeModifier::default();
        m.properties_mut().set("amount", PropertyValue::Float(0.5));
        m.execute(&mut geo, &Monitor::new()).unwrap();
        assert_relative_eq!(geo.position(0).x, 2.5, epsilon = 1e-6);
    }
}
