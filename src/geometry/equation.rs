// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! User-equation vertex transforms.
//!
//! Each axis gets its own expression over the variables `x`, `y`, `z`
//! (the vertex position), `i` (vertex or primitive index) and `d`
//! (distance from the origin). All expressions are parsed up front and
//! the results are staged in a scratch buffer, so a parse or evaluation
//! failure leaves the geometry untouched.

use meval::{Context, Expr};
use nalgebra::Point3;
use thiserror::Error;

use super::Geometry;

#[derive(Debug, Error)]
pub enum EquationError {
    #[error("failed to parse equation '{equation}': {source}")]
    Parse {
        equation: String,
        source: meval::Error,
    },

    #[error("failed to evaluate equation '{equation}': {source}")]
    Eval {
        equation: String,
        source: meval::Error,
    },
}

struct AxisEquation {
    text: String,
    expr: Expr,
}

impl AxisEquation {
    fn parse(text: &str) -> Result<Self, EquationError> {
        let expr = text.parse::<Expr>().map_err(|source| EquationError::Parse {
            equation: text.to_string(),
            source,
        })?;
        Ok(Self {
            text: text.to_string(),
            expr,
        })
    }

    fn eval(&self, p: &Point3<f32>, index: usize) -> Result<f32, EquationError> {
        let mut ctx = Context::new();
        ctx.var("x", p.x as f64)
            .var("y", p.y as f64)
            .var("z", p.z as f64)
            .var("i", index as f64)
            .var("d", p.coords.norm() as f64);
        self.expr
            .eval_with_context(&ctx)
            .map(|v| v as f32)
            .map_err(|source| EquationError::Eval {
                equation: self.text.clone(),
                source,
            })
    }
}

impl Geometry {
    /// Rewrite every vertex position through three per-axis equations.
    /// Nothing is modified unless all vertices evaluate successfully.
    pub fn transform_with_equation(
        &mut self,
        eq_x: &str,
        eq_y: &str,
        eq_z: &str,
    ) -> Result<(), EquationError> {
        let eqs = [
            AxisEquation::parse(eq_x)?,
            AxisEquation::parse(eq_y)?,
            AxisEquation::parse(eq_z)?,
        ];

        let mut staged = Vec::with_capacity(self.positions.len());
        for (i, p) in self.positions.iter().enumerate() {
            staged.push(Point3::new(
                eqs[0].eval(p, i)?,
                eqs[1].eval(p, i)?,
                eqs[2].eval(p, i)?,
            ));
        }

        self.positions = staged;
        self.set_changed();
        Ok(())
    }

    /// Move whole primitives through three per-axis equations.
    ///
    /// The equations are evaluated once per primitive at its centroid with
    /// `i` bound to the primitive index, and the resulting displacement is
    /// applied to all of the primitive's vertices, so triangles and lines
    /// keep their shape. A vertex referenced by several primitives receives
    /// the displacement of the last one processed.
    pub fn transform_primitives_with_equation(
        &mut self,
        eq_x: &str,
        eq_y: &str,
        eq_z: &str,
    ) -> Result<(), EquationError> {
        let eqs = [
            AxisEquation::parse(eq_x)?,
            AxisEquation::parse(eq_y)?,
            AxisEquation::parse(eq_z)?,
        ];

        let mut staged = self.positions.clone();
        let mut index = 0usize;
        let mut apply =
            |verts: &[u32], staged: &mut Vec<Point3<f32>>| -> Result<(), EquationError> {
                let centroid = Point3::from(
                    verts
                        .iter()
                        .map(|&v| self.positions[v as usize].coords)
                        .sum::<nalgebra::Vector3<f32>>()
                        / verts.len() as f32,
                );
                let target = Point3::new(
                    eqs[0].eval(&centroid, index)?,
                    eqs[1].eval(&centroid, index)?,
                    eqs[2].eval(&centroid, index)?,
                );
                let delta = target - centroid;
                for &v in verts {
                    staged[v as usize] = self.positions[v as usize] + delta;
                }
                index += 1;
                Ok(())
            };

        for tri in self.triangles.clone().chunks_exact(3) {
            apply(tri, &mut staged)?;
        }
        for seg in self.lines.clone().chunks_exact(2) {
            apply(seg, &mut staged)?;
        }
        for pt in self.points.clone() {
            apply(&[pt], &mut staged)?;
        }

        self.positions = staged;
        self.set_changed();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn triangle() -> Geometry {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        let c = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        geo.add_triangle(a, b, c);
        geo
    }

    #[test]
    fn test_identity_equation_keeps_positions() {
        let mut geo = triangle();
        geo.transform_with_equation("x", "y", "z").unwrap();
        assert_eq!(geo.position(1), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_equation_uses_all_variables() {
        let mut geo = triangle();
        geo.transform_with_equation("x + 1", "y * 2", "z + i").unwrap();
        assert_relative_eq!(geo.position(2).x, 1.0);
        assert_relative_eq!(geo.position(2).y, 2.0);
        assert_relative_eq!(geo.position(2).z, 2.0);
    }

    #[test]
    fn test_parse_error_leaves_geometry_untouched() {
        let mut geo = triangle();
        let before: Vec<_> = geo.positions().to_vec();
        let err = geo.transform_with_equation("x +", "y", "z").unwrap_err();
        assert!(matches!(err, EquationError::Parse { .. }));
        assert_eq!(geo.positions(), before.as_slice());
    }

    #[test]
    fn test_eval_error_leaves_geometry_untouched() {
        let mut geo = triangle();
        let before: Vec<_> = geo.positions().to_vec();
        let err = geo
            .transform_with_equation("x + unknown_var", "y", "z")
            .unwrap_err();
        assert!(matches!(err, EquationError::Eval { .. }));
        assert_eq!(geo.positions(), before.as_slice());
    }

    #[test]
    fn test_primitive_transform_keeps_shape() {
        let mut geo = triangle();
        geo.transform_primitives_with_equation("x + 5", "y", "z").unwrap();
        // whole triangle shifted, edge lengths preserved
        let d = nalgebra::distance(&geo.position(0), &geo.position(1));
        assert_relative_eq!(d, 1.0, epsilon = 1e-6);
        assert_relative_eq!(geo.position(0).x, 5.0, epsilon = 1e-6);
    }
}
