// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use nalgebra::Vector3;

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Moves all vertices by a constant offset
#[derive(Debug, Clone)]
pub struct TranslateModifier {
    enabled: bool,
    props: Properties,
}

impl Default for TranslateModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("offset", PropertyValue::Floats(vec![0.0, 0.0, 0.0]));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for TranslateModifier {
    fn class_name(&self) -> &'static str {
        "geotranslate"
    }

    fn gui_name(&self) -> &'static str {
        "translate"
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
        let mut offset = self.props.floats_value("offset");
        offset.resize(3, 0.0);
        geometry.translate(Vector3::new(offset[0], offset[1], offset[2]));
        Ok(())
    }
}
