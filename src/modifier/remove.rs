// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Randomly removes primitives with a fixed probability.
/// The seed makes a given configuration fully deterministic.
#[derive(Debug, Clone)]
pub struct RemoveModifier {
    enabled: bool,
    props: Properties,
}

impl Default for RemoveModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define_ranged(
            "probability",
            PropertyValue::Float(0.5),
            PropertyValue::Float(0.0),
            PropertyValue::Float(1.0),
        );
        props.define("seed", PropertyValue::Int(0));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for RemoveModifier {
    fn class_name(&self) -> &'static str {
        "georemove"
    }

    fn gui_name(&self) -> &'static str {
        "remove primitives"
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
        geometry.remove_primitives_randomly(
            self.props.float_value("probability"),
            self.props.int_value("seed") as u64,
        );
        Ok(())
    }
}
