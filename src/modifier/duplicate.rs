// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

use anyhow::Context as _;
use meval::{Context, Expr};
use nalgebra::Point3;

use crate::geometry::Geometry;

use super::chain::Monitor;
use super::{GeometryModifier, Properties, PropertyValue};

/// Replicates the geometry over a grid of copies.
///
/// Each copy runs the per-axis equations over every vertex. Besides the
/// vertex variables `x`, `y`, `z` and `d` (linear copy index), the
/// equations see the copy's grid coordinates `dx`, `dy`, `dz`, so the
/// defaults lay copies out one unit apart per axis.
#[derive(Debug, Clone)]
pub struct DuplicateModifier {
    enabled: bool,
    props: Properties,
}

impl Default for DuplicateModifier {
    fn default() -> Self {
        let mut props = Properties::new();
        props.define("count", PropertyValue::UInts(vec![2, 1, 1]));
        props.define("equation_x", PropertyValue::Text("x + dx".into()));
        props.define("equation_y", PropertyValue::Text("y + dy".into()));
        props.define("equation_z", PropertyValue::Text("z + dz".into()));
        Self {
            enabled: true,
            props,
        }
    }
}

fn parse(text: &str) -> anyhow::Result<Expr> {
    text.parse::<Expr>()
        .with_context(|| format!("failed to parse equation '{text}'"))
}

impl GeometryModifier for DuplicateModifier {
    fn class_name(&self) -> &'static str {
        "geodup"
    }

    fn gui_name(&self) -> &'static str {
        "duplicate"
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

    fn execute(&self, geometry: &mut Geometry, monitor: &Monitor) -> anyhow::Result<()> {
        let mut count = self.props.uints_value("count");
        count.resize(3, 1);
        let count = [count[0].max(1), count[1].max(1), count[2].max(1)];

        let eqs = [
            parse(&self.props.text_value("equation_x"))?,
            parse(&self.props.text_value("equation_y"))?,
            parse(&self.props.text_value("equation_z"))?,
        ];

        // build all copies before touching the input, so an evaluation
        // error leaves the geometry as it was
        let mut copies: Vec<Geometry> = Vec::new();
        let mut d = 0usize;
        for dz in 0..count[2] {
            for dy in 0..count[1] {
                for dx in 0..count[0] {
                    if monitor.stop_requested() {
                        return Ok(());
                    }
                    let mut copy = geometry.clone();
                    for i in 0..copy.num_vertices() as u32 {
                        let p = copy.position(i);
                        let mut ctx = Context::new();
                        ctx.var("x", p.x as f64)
                            .var("y", p.y as f64)
                            .var("z", p.z as f64)
                            .var("i", i as f64)
                            .var("d", d as f64)
                            .var("dx", dx as f64)
                            .var("dy", dy as f64)
                            .var("dz", dz as f64);
                        let mut out = [0.0f32; 3];
                        for (axis, eq) in eqs.iter().enumerate() {
                            out[axis] = eq
                                .eval_with_context(&ctx)
                                .context("failed to evaluate duplication equation")?
                                as f32;
                        }
                        copy.set_position(i, Point3::new(out[0], out[1], out[2]));
                    }
                    copies.push(copy);
                    d += 1;
                }
            }
        }

        let shared = geometry.shared_vertices();
        let threshold = geometry.sharing_threshold();
        geometry.clear();
        geometry.set_vertex_sharing(shared, threshold);
        for copy in &copies {
            geometry.add_geometry(copy);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::factory;

    #[test]
    fn test_grid_of_copies() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        factory::create_cube(&mut geo, 0.5, true);

        let mut m = DuplicateModifier::default();
        m.properties_mut()
            .set("count", PropertyValue::UInts(vec![2, 3, 1]));
        m.execute(&mut geo, &Monitor::new()).unwrap();
        assert_eq!(geo.num_triangles(), 12 * 6);
        // copies spread one unit apart on x and y
        let (min, max) = geo.extent().unwrap();
        assert!((max.x - min.x) > 1.0);
        assert!((max.y - min.y) > 2.0);
    }

    #[test]
    fn test_parse_error_keeps_geometry() {
        let mut geo = Geometry::new();
        factory::create_cube(&mut geo, 1.0, true);
        let before = geo.num_triangles();

        let mut m = DuplicateModifier::default();
        m.properties_mut()
            .set("equation_x", PropertyValue::Text("x ++* dx".into()));
        assert!(m.execute(&mut geo, &Monitor::new()).is_err());
        assert_eq!(geo.num_triangles(), before);
    }
}
