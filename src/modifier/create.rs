// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Modifier that replaces the geometry with a procedural base shape.

use anyhow::bail;

use crate::geometry::{factory, Geometry, MIN_SHARE_THRESHOLD};
use crate::io::{StreamError, StreamReader};

use super::chain::Monitor;
use super::{read_preamble, GeometryModifier, Properties, PropertyValue};

/// Shape type identifiers accepted by the `type` parameter
pub const SHAPE_TYPES: &[&str] = &[
    "quad", "tetra", "hexa", "hexauv", "octa", "icosa", "cylo", "torus", "uvsphere", "gridxz",
    "lgrid",
];

/// Creates a base shape, discarding previous content of the geometry
#[derive(Debug, Clone)]
pub struct CreateModifier {
    enabled: bool,
    props: Properties,
}

impl Default for CreateModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("type", PropertyValue::Text("hexauv".into()));
        props.define("as_triangles", PropertyValue::Bool(true));
        props.define("shared", PropertyValue::Bool(true));
        props.define("closed", PropertyValue::Bool(true));
        props.define_ranged(
            "radius",
            PropertyValue::Float(0.1),
            PropertyValue::Float(0.001),
            PropertyValue::Float(1000.0),
        );
        props.define("segments", PropertyValue::UInts(vec![10, 10, 1]));
        props.define(
            "color",
            PropertyValue::Floats(vec![0.5, 0.5, 0.5, 1.0]),
        );
        Self {
            enabled: true,
            props,
        }
    }
}

impl GeometryModifier for CreateModifier {
    fn class_name(&self) -> &'static str {
        "geocreate"
    }

    fn version(&self) -> u32 {
        2
    }

    fn gui_name(&self) -> &'static str {
        "create"
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

    /// Version 1 stored a fixed field layout instead of the parameter bag;
    /// its fields are migrated into the bag on load.
    fn read(&mut self, r: &mut StreamReader) -> Result<(), StreamError> {
        let enabled = read_preamble(r)?;
        self.set_enabled(enabled);
        let version = r.read_header(self.class_name(), self.version())?;

        if version < 2 {
            let type_id = r.read_string()?;
            // source filename, model loading moved out of this crate
            let _filename = r.read_string()?;
            let as_triangles = r.read_bool()?;
            let shared = r.read_bool()?;
            let mut color = [0.0f32; 4];
            for c in &mut color {
                *c = r.read_f32()?;
            }
            let mut segments = [0u32; 3];
            for s in &mut segments {
                *s = r.read_u32()?;
            }
            let radius = r.read_f32()?;

            self.props.set("type", PropertyValue::Text(type_id));
            self.props
                .set("as_triangles", PropertyValue::Bool(as_triangles));
            self.props.set("shared", PropertyValue::Bool(shared));
            self.props.set("radius", PropertyValue::Float(radius));
            self.props
                .set("color", PropertyValue::Floats(color.to_vec()));
            self.props
                .set("segments", PropertyValue::UInts(segments.to_vec()));
        } else {
            let stored: Properties = serde_json::from_slice(r.read_bytes()?)?;
            self.props.merge(&stored);
        }
        Ok(())
    }

    fn execute(&self, geometry: &mut Geometry, _monitor: &Monitor) -> anyhow::Result<()> {
        let shape = self.props.text_value("type");
        let as_triangles = self.props.bool_value("as_triangles");
        let shared = self.props.bool_value("shared");
        let closed = self.props.bool_value("closed");
        let radius = self.props.float_value("radius");
        let color = self.props.floats_value("color");
        let mut segs = self.props.uints_value("segments");
        segs.resize(3, 1);

        geometry.clear();
        geometry.set_vertex_sharing(shared, MIN_SHARE_THRESHOLD);
        if color.len() >= 4 {
            geometry.set_color(color[0], color[1], color[2], color[3]);
        }

        match shape.as_str() {
            "quad" => factory::create_quad(geometry, 1.0, 1.0, as_triangles),
            "tetra" => factory::create_tetrahedron(geometry, 1.0, as_triangles),
            "hexa" => factory::create_cube(geometry, 1.0, as_triangles),
            "hexauv" => {
                factory::create_textured_box(
                    geometry,
                    1.0,
                    1.0,
                    1.0,
                    nalgebra::Vector3::zeros(),
                );
                if !as_triangles {
                    geometry.convert_to_lines();
                }
            }
            "octa" => factory::create_octahedron(geometry, 1.0, as_triangles),
            "icosa" => factory::create_icosahedron(geometry, 1.0, as_triangles),
            "cylo" => factory::create_cylinder(
                geometry,
                1.0,
                1.0,
                segs[0],
                segs[1].max(2),
                !closed,
                as_triangles,
            ),
            "torus" => factory::create_torus(
                geometry,
                1.0,
                radius,
                segs[0],
                segs[1],
                as_triangles,
                nalgebra::Vector3::zeros(),
            ),
            "uvsphere" => factory::create_uv_sphere(
                geometry,
                1.0,
                segs[0].max(3),
                segs[1].max(2),
                as_triangles,
                nalgebra::Vector3::zeros(),
            ),
            "gridxz" => {
                factory::create_grid_xz(geometry, segs[0] as i32, segs[1] as i32, true)
            }
            "lgrid" => factory::create_line_grid(
                geometry,
                segs[0] as i32,
                segs[1] as i32,
                segs[2] as i32,
            ),
            other => bail!("unknown geometry type '{other}'"),
        }

        if !shared {
            geometry.un_group_vertices();
        }
        Ok(())
    }
}
