// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Whole-geometry transforms and topology rewrites.

use ahash::AHashSet;
use nalgebra::{Matrix4, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::math;
use crate::utils::noise::NoiseGen;

use super::Geometry;

/// Quantization used when matching extruded vertices across triangles
const EDGE_QUANT: f32 = 0.001;

impl Geometry {
    // ---- channel-copy helpers ------------------------------------------

    /// Append a vertex at `p` with `n`, carrying the channel values of an
    /// existing vertex. The staged state is restored afterwards.
    fn add_vertex_like(&mut self, src: u32, p: Point3<f32>, n: Vector3<f32>) -> u32 {
        let saved_color = self.cur_color;
        let saved_texcoord = self.cur_texcoord;
        let saved_attr: Vec<Vec<f32>> =
            self.attributes.iter().map(|a| a.current().to_vec()).collect();

        self.stage_from_vertex(src);
        let index = self.add_vertex(p, n);

        self.cur_color = saved_color;
        self.cur_texcoord = saved_texcoord;
        for (attr, value) in self.attributes.iter_mut().zip(saved_attr) {
            attr.set_current(&value);
        }
        index
    }

    fn stage_from_vertex(&mut self, src: u32) {
        let i = src as usize;
        self.cur_texcoord = [self.texcoords[i * 2], self.texcoords[i * 2 + 1]];
        for c in 0..4 {
            self.cur_color[c] = self.colors[i * 4 + c];
        }
        for k in 0..self.attributes.len() {
            let value = self.attributes[k].value(i).to_vec();
            self.attributes[k].set_current(&value);
        }
    }

    /// Copy vertex `src` into `dst`, staging all channel values there
    fn copy_vertex_to(&self, dst: &mut Geometry, src: u32) -> u32 {
        let i = src as usize;
        dst.set_tex_coord(self.texcoords[i * 2], self.texcoords[i * 2 + 1]);
        dst.set_color(
            self.colors[i * 4],
            self.colors[i * 4 + 1],
            self.colors[i * 4 + 2],
            self.colors[i * 4 + 3],
        );
        for attr in &self.attributes {
            let idx = dst.add_attribute(attr.name(), attr.num_components());
            let value = attr.value(i).to_vec();
            dst.attributes[idx].set_current(&value);
        }
        dst.add_vertex(self.positions[i], self.normals[i])
    }

    /// Fresh geometry with the same sharing setup and attribute channels
    fn empty_like(&self) -> Geometry {
        let mut out = Geometry::new();
        out.set_vertex_sharing(self.shared_vertices, self.weld.threshold());
        out.cur_color = self.cur_color;
        out.cur_normal = self.cur_normal;
        out.cur_texcoord = self.cur_texcoord;
        out.cur_edge_flag = self.cur_edge_flag;
        for attr in &self.attributes {
            out.add_attribute(attr.name(), attr.num_components());
        }
        out
    }

    // ---- transforms ----------------------------------------------------

    /// Scale all positions per axis. Normals are left untouched.
    pub fn scale(&mut self, factors: Vector3<f32>) {
        for p in &mut self.positions {
            p.x *= factors.x;
            p.y *= factors.y;
            p.z *= factors.z;
        }
        self.set_changed();
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        for p in &mut self.positions {
            *p += offset;
        }
        self.set_changed();
    }

    /// Transform all positions by a homogeneous matrix.
    /// Normals are not transformed; recompute them if needed.
    pub fn apply_matrix(&mut self, m: &Matrix4<f32>) {
        for p in &mut self.positions {
            *p = m.transform_point(p);
        }
        self.set_changed();
    }

    /// Scale and offset all texture coordinates
    pub fn transform_tex_coords(&mut self, scale_u: f32, scale_v: f32, off_u: f32, off_v: f32) {
        for uv in self.texcoords.chunks_exact_mut(2) {
            uv[0] = uv[0] * scale_u + off_u;
            uv[1] = uv[1] * scale_v + off_v;
        }
        self.set_changed();
    }

    /// Overwrite each triangle's corner texture coordinates with the fixed
    /// (0,0), (0,1), (1,1) pattern. Shared corners take the value of the
    /// last triangle that touches them.
    pub fn map_triangle_tex_coords(&mut self) {
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t as u32);
            self.set_vertex_tex_coord(a, 0.0, 0.0);
            self.set_vertex_tex_coord(b, 0.0, 1.0);
            self.set_vertex_tex_coord(c, 1.0, 1.0);
        }
        self.set_changed();
    }

    /// Project every vertex onto a sphere of the given radius around the
    /// origin. Vertices at the origin stay put.
    pub fn normalize_positions(&mut self, radius: f32) {
        for p in &mut self.positions {
            let v = p.coords;
            if v.norm() > f32::EPSILON {
                *p = Point3::from(v.normalize() * radius);
            }
        }
        self.set_changed();
    }

    pub fn invert_normals(&mut self) {
        for n in &mut self.normals {
            *n = -*n;
        }
        self.set_changed();
    }

    /// Recompute vertex normals as the average of adjacent face normals
    pub fn calculate_triangle_normals(&mut self) {
        let mut counts = vec![0u32; self.positions.len()];
        for n in &mut self.normals {
            *n = Vector3::zeros();
        }
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t as u32);
            let face = math::normalize_safe(math::triangle_normal(
                &self.positions[a as usize],
                &self.positions[b as usize],
                &self.positions[c as usize],
            ));
            for &v in &[a, b, c] {
                self.normals[v as usize] += face;
                counts[v as usize] += 1;
            }
        }
        for (n, &count) in self.normals.iter_mut().zip(&counts) {
            if count > 0 {
                *n /= count as f32;
            }
        }
        self.set_changed();
    }

    /// Displace positions along per-axis value noise fields
    pub fn transform_with_noise(&mut self, amplitude: Vector3<f32>, frequency: f32, seed: u64) {
        let gens = [
            NoiseGen::new(seed),
            NoiseGen::new(seed.wrapping_add(1)),
            NoiseGen::new(seed.wrapping_add(2)),
        ];
        for p in &mut self.positions {
            // decorrelate axes so flat geometry still picks up variation
            let s = (p.x * 0.731 + p.y * 1.117 + p.z * 1.533) * frequency;
            p.x += gens[0].noise(s) * amplitude.x;
            p.y += gens[1].noise(s) * amplitude.y;
            p.z += gens[2].noise(s) * amplitude.z;
        }
        self.set_changed();
    }

    // ---- topology rewrites ---------------------------------------------

    /// Replace all triangles by their unique edges as lines
    pub fn convert_to_lines(&mut self) {
        let mut seen: AHashSet<u64> = AHashSet::new();
        let triangles = std::mem::take(&mut self.triangles);
        self.edge_flags.clear();
        for tri in triangles.chunks_exact(3) {
            for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                let key = lo as u64 | ((hi as u64) << 32);
                if seen.insert(key) {
                    self.lines.extend_from_slice(&[a, b]);
                }
            }
        }
        self.set_changed();
    }

    /// Rebuild every primitive with private vertices so no two primitives
    /// share channel storage. The mesh is left in unshared mode so later
    /// inserts do not weld back onto the duplicated vertices.
    pub fn un_group_vertices(&mut self) {
        let mut out = self.empty_like();
        out.set_vertex_sharing(false, self.weld.threshold());

        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t as u32);
            let [e1, e2, e3] = self.triangle_edge_flags(t as u32);
            let na = self.copy_vertex_to(&mut out, a);
            let nb = self.copy_vertex_to(&mut out, b);
            let nc = self.copy_vertex_to(&mut out, c);
            out.add_triangle_with_edges(na, nb, nc, e1, e2, e3);
        }
        for l in 0..self.num_lines() {
            let [a, b] = self.line(l as u32);
            let na = self.copy_vertex_to(&mut out, a);
            let nb = self.copy_vertex_to(&mut out, b);
            out.add_line(na, nb);
        }
        for i in 0..self.num_points() {
            let a = self.points[i];
            let na = self.copy_vertex_to(&mut out, a);
            out.add_point(na);
        }

        *self = out;
        self.set_changed();
    }

    /// Split one triangle into four by its edge midpoints, in place.
    /// The original triangle slot becomes the first corner quadrant.
    pub fn tesselate_triangle(&mut self, t: u32) {
        let [n1, n2, n3] = self.triangle(t);
        let n12 = self.add_vertex_between(n1, n2, 0.5);
        let n13 = self.add_vertex_between(n1, n3, 0.5);
        let n23 = self.add_vertex_between(n2, n3, 0.5);
        self.set_triangle(t, n1, n12, n13);
        self.add_triangle(n12, n2, n23);
        self.add_triangle(n12, n23, n13);
        self.add_triangle(n13, n23, n3);
    }

    /// Subdivide all triangles `levels` times. Each level quadruples the
    /// triangle count.
    pub fn tesselate_triangles(&mut self, levels: u32) {
        self.tesselate_triangles_gated(0.0, 0.0, levels);
    }

    /// Like [`tesselate_triangles`](Self::tesselate_triangles), but a
    /// triangle is only split while its area exceeds `min_area` and its
    /// longest edge exceeds `min_length`. A gate of zero or less is
    /// inactive. Triangles below a gate are copied through unchanged.
    pub fn tesselate_triangles_gated(&mut self, min_area: f32, min_length: f32, levels: u32) {
        for _ in 0..levels {
            let mut out = self.empty_like();
            for t in 0..self.num_triangles() {
                let [a, b, c] = self.triangle(t as u32);
                let n1 = self.copy_vertex_to(&mut out, a);
                let n2 = self.copy_vertex_to(&mut out, b);
                let n3 = self.copy_vertex_to(&mut out, c);

                let (p1, p2, p3) = (
                    self.positions[a as usize],
                    self.positions[b as usize],
                    self.positions[c as usize],
                );
                let area = (p2 - p1).cross(&(p3 - p1)).norm() * 0.5;
                let longest = nalgebra::distance(&p1, &p2)
                    .max(nalgebra::distance(&p1, &p3))
                    .max(nalgebra::distance(&p2, &p3));
                if (min_area > 0.0 && area <= min_area)
                    || (min_length > 0.0 && longest <= min_length)
                {
                    out.add_triangle(n1, n2, n3);
                    continue;
                }

                let n12 = out.add_vertex_between(n1, n2, 0.5);
                let n13 = out.add_vertex_between(n1, n3, 0.5);
                let n23 = out.add_vertex_between(n2, n3, 0.5);
                out.add_triangle(n1, n12, n13);
                out.add_triangle(n12, n2, n23);
                out.add_triangle(n12, n23, n13);
                out.add_triangle(n13, n23, n3);
            }
            out.lines = std::mem::take(&mut self.lines);
            out.points = std::mem::take(&mut self.points);
            *self = out;
        }
        self.set_changed();
    }

    /// Subdivide all lines `levels` times; each level doubles the segment
    /// count by inserting midpoints.
    pub fn tesselate_lines(&mut self, levels: u32) {
        for _ in 0..levels {
            let lines = std::mem::take(&mut self.lines);
            for seg in lines.chunks_exact(2).map(|s| [s[0], s[1]]).collect::<Vec<_>>() {
                let mid = self.add_vertex_between(seg[0], seg[1], 0.5);
                self.lines.extend_from_slice(&[seg[0], mid]);
                self.lines.extend_from_slice(&[mid, seg[1]]);
            }
        }
        self.set_changed();
    }

    /// Randomly drop primitives. A primitive survives when the next draw
    /// from a seeded generator is at or above `probability`, so the result
    /// is deterministic for a given seed.
    pub fn remove_primitives_randomly(&mut self, probability: f32, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);

        let triangles = std::mem::take(&mut self.triangles);
        let flags = std::mem::take(&mut self.edge_flags);
        for (tri, ef) in triangles.chunks_exact(3).zip(flags.chunks_exact(3)) {
            if rng.gen::<f32>() >= probability {
                self.triangles.extend_from_slice(tri);
                self.edge_flags.extend_from_slice(ef);
            }
        }
        let lines = std::mem::take(&mut self.lines);
        for seg in lines.chunks_exact(2) {
            if rng.gen::<f32>() >= probability {
                self.lines.extend_from_slice(seg);
            }
        }
        let points = std::mem::take(&mut self.points);
        for &pt in &points {
            if rng.gen::<f32>() >= probability {
                self.points.push(pt);
            }
        }
        self.set_changed();
    }

    /// Extrude every triangle along its face normal.
    ///
    /// The offset length is `constant + factor * l` where `l` is the mean of
    /// the triangle's three edge lengths, then each
    /// extruded corner is pulled toward the extruded centroid by `shift`
    /// (0 keeps the cap congruent, 1 collapses it to a spike). With
    /// `create_faces` set, each base edge gains a quad of two side
    /// triangles connecting it to its extruded counterpart; with
    /// `recognize_edges` additionally set, side faces along edges interior
    /// to the extruded surface are suppressed so adjacent extrusions merge.
    pub fn extrude_triangles(
        &mut self,
        constant: f32,
        factor: f32,
        shift: f32,
        create_faces: bool,
        recognize_edges: bool,
    ) {
        let base: Vec<[u32; 3]> = (0..self.num_triangles())
            .map(|t| self.triangle(t as u32))
            .collect();

        let extruded_pos = |geo: &Geometry, tri: &[u32; 3]| -> [Point3<f32>; 3] {
            let p1 = geo.positions[tri[0] as usize];
            let p2 = geo.positions[tri[1] as usize];
            let p3 = geo.positions[tri[2] as usize];
            let normal = math::normalize_safe(math::triangle_normal(&p1, &p2, &p3));
            let mean_edge = (nalgebra::distance(&p1, &p2)
                + nalgebra::distance(&p1, &p3)
                + nalgebra::distance(&p2, &p3))
                / 3.0;
            let length = constant + factor * mean_edge;
            let offset = normal * length;
            let mut e = [p1 + offset, p2 + offset, p3 + offset];
            let centroid = Point3::from((e[0].coords + e[1].coords + e[2].coords) / 3.0);
            for p in &mut e {
                *p += (centroid - *p) * shift;
            }
            e
        };

        // Count how often each quantized extruded position occurs; positions
        // hit twice or more lie on an edge shared by two extrusions.
        let mut occurrences: ahash::AHashMap<u64, u32> = ahash::AHashMap::new();
        if create_faces && recognize_edges {
            for tri in &base {
                for p in extruded_pos(self, tri) {
                    let key = quant_key(&p);
                    *occurrences.entry(key).or_insert(0) += 1;
                }
            }
        }

        self.triangles.clear();
        self.edge_flags.clear();

        for tri in &base {
            let e = extruded_pos(self, tri);
            let normal = math::normalize_safe(math::triangle_normal(
                &self.positions[tri[0] as usize],
                &self.positions[tri[1] as usize],
                &self.positions[tri[2] as usize],
            ));

            let top = [
                self.add_vertex_like(tri[0], e[0], normal),
                self.add_vertex_like(tri[1], e[1], normal),
                self.add_vertex_like(tri[2], e[2], normal),
            ];

            // cap
            self.add_triangle_checked(top[0], top[1], top[2]);

            if !create_faces {
                continue;
            }

            // sides, one quad per base edge
            for k in 0..3 {
                let a = k;
                let b = (k + 1) % 3;
                if recognize_edges {
                    let shared_a = occurrences.get(&quant_key(&e[a])).copied().unwrap_or(0) >= 2;
                    let shared_b = occurrences.get(&quant_key(&e[b])).copied().unwrap_or(0) >= 2;
                    if shared_a && shared_b {
                        continue;
                    }
                }
                self.add_triangle_checked(tri[a], tri[b], top[b]);
                self.add_triangle_checked(tri[a], top[b], top[a]);
            }
        }
        self.set_changed();
    }
}

fn quant_key(p: &Point3<f32>) -> u64 {
    const MASK: i64 = (1 << 23) - 1;
    let qx = ((p.x / EDGE_QUANT) as i64) & MASK;
    let qy = ((p.y / EDGE_QUANT) as i64) & MASK;
    let qz = ((p.z / EDGE_QUANT) as i64) & MASK;
    (qx as u64) | ((qy as u64) << 24) | ((qz as u64) << 48)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Geometry {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        let c = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        geo.add_triangle(a, b, c);
        geo
    }

    #[test]
    fn test_convert_to_lines_dedups_shared_edges() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        let c = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        let d = geo.add_vertex(Point3::new(1.0, 1.0, 0.0), Vector3::z());
        geo.add_triangle(a, b, c);
        geo.add_triangle(b, d, c);
        geo.convert_to_lines();
        assert_eq!(geo.num_triangles(), 0);
        // 6 edges total, edge b-c shared once
        assert_eq!(geo.num_lines(), 5);
    }

    #[test]
    fn test_tesselate_triangles_quadruples() {
        let mut geo = unit_triangle();
        geo.tesselate_triangles(2);
        assert_eq!(geo.num_triangles(), 16);
    }

    #[test]
    fn test_tesselate_gate_stops_small_triangles() {
        // unit right triangle: longest edge sqrt(2), halved per level
        let mut geo = unit_triangle();
        geo.tesselate_triangles_gated(0.0, 0.8, 2);
        assert_eq!(geo.num_triangles(), 4);

        let mut geo = unit_triangle();
        geo.tesselate_triangles_gated(0.0, 2.0, 1);
        assert_eq!(geo.num_triangles(), 1);
    }

    #[test]
    fn test_map_triangle_tex_coords_fixed_pattern() {
        let mut geo = unit_triangle();
        geo.map_triangle_tex_coords();
        assert_eq!(geo.tex_coord(0), [0.0, 0.0]);
        assert_eq!(geo.tex_coord(1), [0.0, 1.0]);
        assert_eq!(geo.tex_coord(2), [1.0, 1.0]);
    }

    #[test]
    fn test_tesselate_lines_doubles_segments() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        geo.add_line(a, b);
        geo.tesselate_lines(3);
        assert_eq!(geo.num_lines(), 8);
    }

    #[test]
    fn test_un_group_gives_private_vertices() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(true, 0.001);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        let c = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        let d = geo.add_vertex(Point3::new(1.0, 1.0, 0.0), Vector3::z());
        geo.add_triangle(a, b, c);
        geo.add_triangle(b, d, c);
        geo.un_group_vertices();
        assert_eq!(geo.num_vertices(), 6);
        assert_eq!(geo.num_triangles(), 2);
        assert!(!geo.shared_vertices());

        // later inserts must not weld back onto the duplicated vertices
        let v = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        assert_eq!(v, 6);
        assert_eq!(geo.num_vertices(), 7);
    }

    #[test]
    fn test_calculate_triangle_normals_flat_face() {
        let mut geo = unit_triangle();
        geo.calculate_triangle_normals();
        for i in 0..3 {
            assert_relative_eq!(geo.normal(i).z, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_remove_primitives_deterministic() {
        let mut a = unit_triangle();
        for _ in 0..4 {
            let geo2 = unit_triangle();
            a.add_geometry(&geo2);
        }
        let mut b = a.clone();
        a.remove_primitives_randomly(0.5, 42);
        b.remove_primitives_randomly(0.5, 42);
        assert_eq!(a.triangles(), b.triangles());

        let mut c = unit_triangle();
        c.remove_primitives_randomly(0.0, 1);
        assert_eq!(c.num_triangles(), 1);
        let mut d = unit_triangle();
        d.remove_primitives_randomly(1.1, 1);
        assert_eq!(d.num_triangles(), 0);
    }

    #[test]
    fn test_extrude_adds_cap_and_sides() {
        let mut geo = unit_triangle();
        geo.extrude_triangles(1.0, 0.0, 0.0, true, false);
        // cap plus two triangles per edge
        assert_eq!(geo.num_triangles(), 7);
        // extruded corners sit one unit along +z
        let top = geo.position(3);
        assert_relative_eq!(top.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_extrude_without_faces_keeps_cap_only() {
        let mut geo = unit_triangle();
        geo.extrude_triangles(1.0, 0.0, 0.0, false, false);
        assert_eq!(geo.num_triangles(), 1);
    }

    #[test]
    fn test_extrude_factor_scales_with_mean_edge() {
        let mut geo = unit_triangle();
        geo.extrude_triangles(0.0, 1.0, 0.0, false, false);
        // edges 1, 1 and sqrt(2) average to the offset length
        let expected = (2.0 + 2.0_f32.sqrt()) / 3.0;
        assert_relative_eq!(geo.position(3).z, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_extrude_shift_pulls_cap_inward() {
        let mut geo = unit_triangle();
        geo.extrude_triangles(1.0, 0.0, 1.0, true, false);
        // full shift collapses the cap onto the centroid
        let p3 = geo.position(3);
        let p4 = geo.position(4);
        assert_relative_eq!(nalgebra::distance(&p3, &p4), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_positions() {
        let mut geo = unit_triangle();
        geo.normalize_positions(2.0);
        assert_relative_eq!(geo.position(1).coords.norm(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_apply_matrix_translates_positions_only() {
        let mut geo = unit_triangle();
        let n_before = geo.normal(0);
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        geo.apply_matrix(&m);
        assert_eq!(geo.position(0), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(geo.normal(0), n_before);
    }
}
