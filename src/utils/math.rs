// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Calculate the (unnormalized) face normal of a triangle
pub fn triangle_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Vector3<f32> {
    let v1 = p1 - p0;
    let v2 = p2 - p0;
    v1.cross(&v2)
}

/// Normalize a vector, returning zero for (near-)zero input instead of NaN
pub fn normalize_safe(v: Vector3<f32>) -> Vector3<f32> {
    let len = v.norm();
    if len > 1e-12 {
        v / len
    } else {
        Vector3::zeros()
    }
}

/// Quantize a coordinate to a multiple of `step`
pub fn quantize(value: f32, step: f32) -> f32 {
    (value / step).floor() * step
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert degrees to radians
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

/// Point on the unit sphere for normalized spherical coordinates.
/// `u` in [0,1] wraps the equator, `v` in [0,1] runs pole to pole.
pub fn point_on_sphere(u: f32, v: f32) -> Vector3<f32> {
    let theta = u * std::f32::consts::TAU;
    let phi = v * std::f32::consts::PI;
    Vector3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos())
}

/// Rotate a vector around the Y axis by `degrees`
pub fn rotate_y(v: Vector3<f32>, degrees: f32) -> Vector3<f32> {
    let a = deg_to_rad(degrees);
    let (s, c) = a.sin_cos();
    Vector3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

/// Möller–Trumbore ray/triangle intersection.
/// Returns the parametric ray distance `t` of the hit, or `None`.
pub fn intersect_ray_triangle(
    origin: &Point3<f32>,
    direction: &Vector3<f32>,
    p0: &Point3<f32>,
    p1: &Point3<f32>,
    p2: &Point3<f32>,
) -> Option<f32> {
    const EPS: f32 = 1e-7;

    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    let pvec = direction.cross(&edge2);
    let det = edge1.dot(&pvec);

    if det.abs() < EPS {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - p0;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&edge1);
    let v = direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&qvec) * inv_det;
    if t > EPS {
        Some(t)
    } else {
        None
    }
}
