// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use nalgebra::Vector3;

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Displaces vertices along seeded per-axis value noise
#[derive(Debug, Clone)]
pub struct NoiseModifier {
    enabled: bool,
    props: Properties,
}

impl Default for NoiseModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("amplitude", PropertyValue::Floats(vec![0.1, 0.1, 0.1]));
        props.define_ranged(
            "frequency",
            PropertyValue::Float(1.0),
            PropertyValue::Float(0.0001),
            PropertyValue::Float(10000.0),
        );
        props.define("seed", PropertyValue::Int(0));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for NoiseModifier {
    fn class_name(&self) -> &'static str {
        "geonoise"
    }

    fn gui_name(&self) -> &'static str {
        "noise"
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
        let mut amp = self.props.floats_value("amplitude");
        amp.resize(3, 0.0);
        geometry.transform_with_noise(
            Vector3::new(amp[0], amp[1], amp[2]),
            self.props.float_value("frequency"),
            self.props.int_value("seed") as u64,
        );
        Ok(())
    }
}
