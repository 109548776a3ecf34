// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use nalgebra::{Rotation3, Unit, Vector3};

use crate::geometry::Geometry;
use crate::utils::math;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Rotates all vertices around an axis through the origin.
///
/// Only positions are rotated. Normals keep their previous direction; run
/// a normals recalculation afterwards when lighting matters.
#[derive(Debug, Clone)]
pub struct RotateModifier {
    enabled: bool,
    props: Properties,
}

impl Default for RotateModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("angle", PropertyValue::Float(0.0));
        props.define("axis", PropertyValue::Floats(vec![0.0, 1.0, 0.0]));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for RotateModifier {
    fn class_name(&self) -> &'static str {
        "georotate"
    }

    fn gui_name(&self) -> &'static str {
        "rotate"
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
        let angle = self.props.float_value("angle");
        let mut axis = self.props.floats_value("axis");
        axis.resize(3, 0.0);
        let axis = Vector3::new(axis[0], axis[1], axis[2]);
        if axis.norm() < f32::EPSILON {
            anyhow::bail!("rotation axis must not be zero");
        }

        let rot = Rotation3::from_axis_angle(
            &Unit::new_normalize(axis),
            math::deg_to_rad(angle),
        );
        geometry.apply_matrix(&rot.to_homogeneous());
        Ok(())
    }
}
