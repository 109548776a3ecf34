// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties};

/// Replaces all triangles with their unique edges as lines
#[derive(Debug, Clone)]
pub struct ConvertLinesModifier {
    enabled: bool,
    props: Properties,
}

impl Default for ConvertLinesModifier {
    fn default() -> Self {
        Self {
            enabled: true,
            props: Properties::new(),
        }
    }
}

impl GeometryModifier for ConvertLinesModifier {
    fn class_name(&self) -> &'static str {
        "geoconvlines"
    }

    fn gui_name(&self) -> &'static str {
        "convert to lines"
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
        geometry.convert_to_lines();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::factory;

    #[test]
    fn test_cube_becomes_wireframe() {
        let mut geo = Geometry::new();
        factory::create_cube(&mut geo, 1.0, true);
        ConvertLinesModifier::default()
            .execute(&mut geo, &Monitor::new())
            .unwrap();
        assert_eq!(geo.num_triangles(), 0);
        // 12 cube edges plus 6 face diagonals
        assert_eq!(geo.num_lines(), 18);
    }
}
