// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Writes vertex, line and triangle indices into a user attribute
/// channel, so shaders can address primitives individually
#[derive(Debug, Clone)]
pub struct EnumerateModifier {
    enabled: bool,
    props: Properties,
}

impl Default for EnumerateModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("attribute", PropertyValue::Text("index".into()));
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for EnumerateModifier {
    fn class_name(&self) -> &'static str {
        "geoenum"
    }

    fn gui_name(&self) -> &'static str {
        "enumerate"
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
        let name = self.props.text_value("attribute");
        if name.is_empty() {
            anyhow::bail!("attribute name must not be empty");
        }
        geometry.add_enumeration_attribute(&name);
        Ok(())
    }
}
