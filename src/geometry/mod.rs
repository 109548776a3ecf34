// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Indexed geometry container with optional vertex welding.
//!
//! A [`Geometry`] holds flat per-vertex channels (position, normal, texture
//! coordinate, color, plus named user attributes) and index lists for
//! triangles, lines and points, plus per-corner wireframe edge flags.
//! Color, normal, texture coordinate, edge flag and attribute values are
//! *staged*: setting one affects every vertex or triangle appended
//! afterwards until it is changed again.
//!
//! With vertex sharing enabled, [`Geometry::add_vertex`] welds new vertices
//! onto existing ones within a spatial threshold and blends their channel
//! values as a running average, so smooth normals fall out of repeated
//! face-normal inserts.

mod attribute;
mod equation;
pub mod factory;
mod ops;
mod sink;
mod weld;

pub use attribute::UserAttribute;
pub use equation::EquationError;
pub use sink::VertexArraySink;
pub use weld::MIN_SHARE_THRESHOLD;

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::{Point3, Vector3};

use weld::VertexWeld;

/// Shortest triangle edge accepted by [`Geometry::check_triangle`]
pub const MIN_EDGE_LENGTH: f32 = 0.00001;

// Process-wide change counter. Every mutation stamps the geometry with a
// fresh value so downstream caches can compare a single u64.
static CHANGE_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_hash() -> u64 {
    CHANGE_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Indexed triangle/line/point geometry with per-vertex channels
#[derive(Debug)]
pub struct Geometry {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    texcoords: Vec<f32>,
    colors: Vec<f32>,
    attributes: Vec<UserAttribute>,

    triangles: Vec<u32>,
    lines: Vec<u32>,
    points: Vec<u32>,
    // wireframe hints, one per triangle corner
    edge_flags: Vec<bool>,

    cur_color: [f32; 4],
    cur_normal: Vector3<f32>,
    cur_texcoord: [f32; 2],
    cur_edge_flag: bool,

    shared_vertices: bool,
    weld: VertexWeld,

    hash: u64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Geometry {
    fn clone(&self) -> Self {
        Self {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            texcoords: self.texcoords.clone(),
            colors: self.colors.clone(),
            attributes: self.attributes.clone(),
            triangles: self.triangles.clone(),
            lines: self.lines.clone(),
            points: self.points.clone(),
            edge_flags: self.edge_flags.clone(),
            cur_color: self.cur_color,
            cur_normal: self.cur_normal,
            cur_texcoord: self.cur_texcoord,
            cur_edge_flag: self.cur_edge_flag,
            shared_vertices: self.shared_vertices,
            weld: self.weld.clone(),
            hash: next_hash(),
        }
    }
}

impl Geometry {
    /// Empty geometry with vertex sharing enabled at the minimum threshold
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            texcoords: Vec::new(),
            colors: Vec::new(),
            attributes: Vec::new(),
            triangles: Vec::new(),
            lines: Vec::new(),
            points: Vec::new(),
            edge_flags: Vec::new(),
            cur_color: [1.0, 1.0, 1.0, 1.0],
            cur_normal: Vector3::new(0.0, 0.0, 1.0),
            cur_texcoord: [0.0, 0.0],
            cur_edge_flag: true,
            shared_vertices: true,
            weld: VertexWeld::new(MIN_SHARE_THRESHOLD),
            hash: next_hash(),
        }
    }

    /// Stamp the geometry with a fresh change hash
    pub(crate) fn set_changed(&mut self) {
        self.hash = next_hash();
    }

    /// Opaque value that changes on every mutation
    pub fn hash(&self) -> u64 {
        self.hash
    }

    // ---- vertex sharing ------------------------------------------------

    pub fn shared_vertices(&self) -> bool {
        self.shared_vertices
    }

    pub fn sharing_threshold(&self) -> f32 {
        self.weld.threshold()
    }

    /// Enable or disable welding of newly added vertices.
    /// The spatial index is rebuilt from the current vertices when enabling.
    pub fn set_vertex_sharing(&mut self, enabled: bool, threshold: f32) {
        self.shared_vertices = enabled;
        self.weld.set_threshold(threshold);
        self.weld.clear();
        if enabled {
            for (i, p) in self.positions.iter().enumerate() {
                self.weld.insert(p, i as u32);
            }
        }
    }

    // ---- staged channel state ------------------------------------------

    /// Color attached to vertices appended after this call
    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.cur_color = [r, g, b, a];
    }

    pub fn current_color(&self) -> [f32; 4] {
        self.cur_color
    }

    /// Normal used by [`add_vertex_staged`](Self::add_vertex_staged)
    pub fn set_current_normal(&mut self, n: Vector3<f32>) {
        self.cur_normal = n;
    }

    pub fn current_normal(&self) -> Vector3<f32> {
        self.cur_normal
    }

    /// Texture coordinate attached to vertices appended after this call
    pub fn set_tex_coord(&mut self, u: f32, v: f32) {
        self.cur_texcoord = [u, v];
    }

    pub fn current_tex_coord(&self) -> [f32; 2] {
        self.cur_texcoord
    }

    /// Wireframe hint attached to triangle corners appended after this call
    pub fn set_edge_flag(&mut self, on: bool) {
        self.cur_edge_flag = on;
    }

    pub fn current_edge_flag(&self) -> bool {
        self.cur_edge_flag
    }

    // ---- vertices ------------------------------------------------------

    /// Append a vertex, welding onto an existing one when sharing is on.
    ///
    /// On a weld hit all channels of the existing vertex are blended toward
    /// the incoming values as a running average over the vertex's use count,
    /// which yields smooth normals from per-face inserts.
    pub fn add_vertex(&mut self, p: Point3<f32>, n: Vector3<f32>) -> u32 {
        if self.shared_vertices {
            if let Some((index, uses)) = self.weld.find_and_use(&p, &self.positions) {
                let m2 = 1.0 / uses as f32;
                let m1 = 1.0 - m2;
                let i = index as usize;
                self.normals[i] = self.normals[i] * m1 + n * m2;
                self.texcoords[i * 2] =
                    self.texcoords[i * 2] * m1 + self.cur_texcoord[0] * m2;
                self.texcoords[i * 2 + 1] =
                    self.texcoords[i * 2 + 1] * m1 + self.cur_texcoord[1] * m2;
                for c in 0..4 {
                    self.colors[i * 4 + c] =
                        self.colors[i * 4 + c] * m1 + self.cur_color[c] * m2;
                }
                for attr in &mut self.attributes {
                    attr.blend_with_current(i, m1, m2);
                }
                self.set_changed();
                return index;
            }
        }
        self.add_vertex_always(p, n)
    }

    /// Like [`add_vertex`](Self::add_vertex), taking the normal from the
    /// staged state
    pub fn add_vertex_staged(&mut self, p: Point3<f32>) -> u32 {
        let n = self.cur_normal;
        self.add_vertex(p, n)
    }

    /// Append a vertex unconditionally, bypassing welding
    pub fn add_vertex_always(&mut self, p: Point3<f32>, n: Vector3<f32>) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(p);
        self.normals.push(n);
        self.texcoords.extend_from_slice(&self.cur_texcoord);
        self.colors.extend_from_slice(&self.cur_color);
        for attr in &mut self.attributes {
            attr.push_current();
        }
        if self.shared_vertices {
            self.weld.insert(&p, index);
        }
        self.set_changed();
        index
    }

    /// Index of a vertex within the sharing threshold of `p`, if any
    pub fn find_vertex(&self, p: &Point3<f32>) -> Option<u32> {
        if self.shared_vertices {
            return self.weld.find(p, &self.positions);
        }
        let threshold = self.weld.threshold();
        self.positions
            .iter()
            .position(|q| nalgebra::distance(p, q) <= threshold)
            .map(|i| i as u32)
    }

    /// Copy a vertex into a new slot. With sharing enabled the original
    /// index is returned unchanged, since the copy would weld right back.
    pub fn duplicate_vertex(&mut self, index: u32) -> u32 {
        if self.shared_vertices {
            return index;
        }
        let i = index as usize;
        let new_index = self.positions.len() as u32;
        self.positions.push(self.positions[i]);
        self.normals.push(self.normals[i]);
        self.texcoords.push(self.texcoords[i * 2]);
        self.texcoords.push(self.texcoords[i * 2 + 1]);
        for c in 0..4 {
            self.colors.push(self.colors[i * 4 + c]);
        }
        for attr in &mut self.attributes {
            let value = attr.value(i).to_vec();
            attr.push(&value);
        }
        self.set_changed();
        new_index
    }

    /// Add a vertex between two existing ones at parameter `mix` (0 = `a`,
    /// 1 = `b`), interpolating all channels. The blended normal is
    /// renormalized.
    pub fn add_vertex_between(&mut self, a: u32, b: u32, mix: f32) -> u32 {
        let (ia, ib) = (a as usize, b as usize);
        let (m1, m2) = (1.0 - mix, mix);
        let p = Point3::from(self.positions[ia].coords * m1 + self.positions[ib].coords * m2);
        let n = crate::utils::math::normalize_safe(
            self.normals[ia] * m1 + self.normals[ib] * m2,
        );

        let saved_color = self.cur_color;
        let saved_texcoord = self.cur_texcoord;
        let saved_attr: Vec<Vec<f32>> =
            self.attributes.iter().map(|a| a.current().to_vec()).collect();

        self.cur_texcoord = [
            self.texcoords[ia * 2] * m1 + self.texcoords[ib * 2] * m2,
            self.texcoords[ia * 2 + 1] * m1 + self.texcoords[ib * 2 + 1] * m2,
        ];
        for c in 0..4 {
            self.cur_color[c] = self.colors[ia * 4 + c] * m1 + self.colors[ib * 4 + c] * m2;
        }
        for attr in &mut self.attributes {
            let mixed: Vec<f32> = attr
                .value(ia)
                .iter()
                .zip(attr.value(ib))
                .map(|(x, y)| x * m1 + y * m2)
                .collect();
            attr.set_current(&mixed);
        }

        let index = self.add_vertex(p, n);

        self.cur_color = saved_color;
        self.cur_texcoord = saved_texcoord;
        for (attr, value) in self.attributes.iter_mut().zip(saved_attr) {
            attr.set_current(&value);
        }
        index
    }

    // ---- primitives ----------------------------------------------------

    /// Append a triangle; returns its primitive index
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> u32 {
        let f = self.cur_edge_flag;
        self.add_triangle_with_edges(a, b, c, f, f, f)
    }

    /// Append a triangle with explicit per-corner wireframe hints
    pub fn add_triangle_with_edges(
        &mut self,
        a: u32,
        b: u32,
        c: u32,
        e1: bool,
        e2: bool,
        e3: bool,
    ) -> u32 {
        let index = (self.triangles.len() / 3) as u32;
        self.triangles.extend_from_slice(&[a, b, c]);
        self.edge_flags.extend_from_slice(&[e1, e2, e3]);
        self.set_changed();
        index
    }

    /// True when all three edges are longer than [`MIN_EDGE_LENGTH`]
    pub fn check_triangle(&self, a: u32, b: u32, c: u32) -> bool {
        let pa = &self.positions[a as usize];
        let pb = &self.positions[b as usize];
        let pc = &self.positions[c as usize];
        nalgebra::distance(pa, pb) >= MIN_EDGE_LENGTH
            && nalgebra::distance(pb, pc) >= MIN_EDGE_LENGTH
            && nalgebra::distance(pc, pa) >= MIN_EDGE_LENGTH
    }

    /// Append a triangle only if it is not degenerate
    pub fn add_triangle_checked(&mut self, a: u32, b: u32, c: u32) -> Option<u32> {
        if self.check_triangle(a, b, c) {
            Some(self.add_triangle(a, b, c))
        } else {
            None
        }
    }

    /// Append a quad as two triangles (1-2-3 and 1-3-4)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Create four vertices from positions (staged normal and channels)
    /// and connect them as a quad
    pub fn add_quad_points(
        &mut self,
        p1: Point3<f32>,
        p2: Point3<f32>,
        p3: Point3<f32>,
        p4: Point3<f32>,
    ) {
        let a = self.add_vertex_staged(p1);
        let b = self.add_vertex_staged(p2);
        let c = self.add_vertex_staged(p3);
        let d = self.add_vertex_staged(p4);
        self.add_quad(a, b, c, d);
    }

    pub fn add_line(&mut self, a: u32, b: u32) -> u32 {
        let index = (self.lines.len() / 2) as u32;
        self.lines.extend_from_slice(&[a, b]);
        self.set_changed();
        index
    }

    pub fn add_point(&mut self, a: u32) -> u32 {
        let index = self.points.len() as u32;
        self.points.push(a);
        self.set_changed();
        index
    }

    pub fn triangle(&self, t: u32) -> [u32; 3] {
        let i = t as usize * 3;
        [self.triangles[i], self.triangles[i + 1], self.triangles[i + 2]]
    }

    pub fn line(&self, l: u32) -> [u32; 2] {
        let i = l as usize * 2;
        [self.lines[i], self.lines[i + 1]]
    }

    /// Per-corner wireframe hints, three per triangle
    pub fn edge_flags(&self) -> &[bool] {
        &self.edge_flags
    }

    pub fn triangle_edge_flags(&self, t: u32) -> [bool; 3] {
        let i = t as usize * 3;
        [
            self.edge_flags[i],
            self.edge_flags[i + 1],
            self.edge_flags[i + 2],
        ]
    }

    pub fn set_triangle(&mut self, t: u32, a: u32, b: u32, c: u32) {
        let i = t as usize * 3;
        self.triangles[i] = a;
        self.triangles[i + 1] = b;
        self.triangles[i + 2] = c;
        self.set_changed();
    }

    /// Remove one triangle from the index list. Vertex channels are left
    /// untouched, so unused vertices may remain.
    pub fn remove_triangle(&mut self, t: u32) {
        let i = t as usize * 3;
        self.triangles.drain(i..i + 3);
        self.edge_flags.drain(i..i + 3);
        self.set_changed();
    }

    /// Remove the first triangle using exactly the corners `a`, `b`, `c`
    /// in any order. Returns whether one was found.
    pub fn remove_triangle_by_corners(&mut self, a: u32, b: u32, c: u32) -> bool {
        let mut want = [a, b, c];
        want.sort_unstable();
        for t in 0..self.num_triangles() {
            let mut corners = self.triangle(t as u32);
            corners.sort_unstable();
            if corners == want {
                self.remove_triangle(t as u32);
                return true;
            }
        }
        false
    }

    pub fn remove_line(&mut self, l: u32) {
        let i = l as usize * 2;
        self.lines.drain(i..i + 2);
        self.set_changed();
    }

    pub fn remove_point(&mut self, p: u32) {
        self.points.remove(p as usize);
        self.set_changed();
    }

    // ---- user attributes -----------------------------------------------

    /// Register a named channel, backfilling existing vertices with zeros.
    /// Returns the channel index; an existing channel of the same name is
    /// reused.
    pub fn add_attribute(&mut self, name: &str, num_components: usize) -> usize {
        if let Some(i) = self.attribute_index(name) {
            return i;
        }
        let mut attr = UserAttribute::new(name, num_components);
        for _ in 0..self.positions.len() {
            attr.push(&[]);
        }
        self.attributes.push(attr);
        self.set_changed();
        self.attributes.len() - 1
    }

    /// Adds a 4-component attribute channel enumerating primitives: for
    /// each vertex, component 0 holds the vertex index, component 1 the
    /// index of a line using it, component 2 the index of a triangle
    /// using it (the last user wins), component 3 stays zero.
    pub fn add_enumeration_attribute(&mut self, name: &str) -> usize {
        let index = self.add_attribute(name, 4);
        let attr = &mut self.attributes[index];
        for i in 0..self.positions.len() {
            attr.set_value(i, &[i as f32, 0.0, 0.0, 0.0]);
        }
        for (l, seg) in self.lines.chunks_exact(2).enumerate() {
            for &v in seg {
                let mut data = [0.0f32; 4];
                data.copy_from_slice(attr.value(v as usize));
                data[1] = l as f32;
                attr.set_value(v as usize, &data);
            }
        }
        for (t, tri) in self.triangles.chunks_exact(3).enumerate() {
            for &v in tri {
                let mut data = [0.0f32; 4];
                data.copy_from_slice(attr.value(v as usize));
                data[2] = t as f32;
                attr.set_value(v as usize, &data);
            }
        }
        self.set_changed();
        index
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    pub fn attribute(&self, index: usize) -> Option<&UserAttribute> {
        self.attributes.get(index)
    }

    pub fn attribute_mut(&mut self, index: usize) -> Option<&mut UserAttribute> {
        self.attributes.get_mut(index)
    }

    pub fn attributes(&self) -> &[UserAttribute] {
        &self.attributes
    }

    /// Stage the value a named channel attaches to vertices appended next
    pub fn set_attribute(&mut self, name: &str, value: &[f32]) {
        if let Some(i) = self.attribute_index(name) {
            self.attributes[i].set_current(value);
        }
    }

    // ---- accessors -----------------------------------------------------

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len() / 2
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[f32] {
        &self.texcoords
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    pub fn position(&self, i: u32) -> Point3<f32> {
        self.positions[i as usize]
    }

    pub fn normal(&self, i: u32) -> Vector3<f32> {
        self.normals[i as usize]
    }

    pub fn set_position(&mut self, i: u32, p: Point3<f32>) {
        self.positions[i as usize] = p;
        self.set_changed();
    }

    pub fn set_normal(&mut self, i: u32, n: Vector3<f32>) {
        self.normals[i as usize] = n;
        self.set_changed();
    }

    pub fn tex_coord(&self, i: u32) -> [f32; 2] {
        let j = i as usize * 2;
        [self.texcoords[j], self.texcoords[j + 1]]
    }

    pub fn set_vertex_tex_coord(&mut self, i: u32, u: f32, v: f32) {
        let j = i as usize * 2;
        self.texcoords[j] = u;
        self.texcoords[j + 1] = v;
        self.set_changed();
    }

    pub fn color(&self, i: u32) -> [f32; 4] {
        let j = i as usize * 4;
        [
            self.colors[j],
            self.colors[j + 1],
            self.colors[j + 2],
            self.colors[j + 3],
        ]
    }

    pub fn set_vertex_color(&mut self, i: u32, r: f32, g: f32, b: f32, a: f32) {
        let j = i as usize * 4;
        self.colors[j] = r;
        self.colors[j + 1] = g;
        self.colors[j + 2] = b;
        self.colors[j + 3] = a;
        self.set_changed();
    }

    // ---- whole-geometry operations -------------------------------------

    /// Drop all vertices, primitives and attribute channels
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.texcoords.clear();
        self.colors.clear();
        self.attributes.clear();
        self.triangles.clear();
        self.lines.clear();
        self.points.clear();
        self.edge_flags.clear();
        self.weld.clear();
        self.set_changed();
    }

    /// Append another geometry's vertices and primitives.
    /// Attribute channels are matched by name; channels missing on either
    /// side are zero-filled.
    pub fn add_geometry(&mut self, other: &Geometry) {
        self.add_geometry_offset(other, Vector3::zeros());
    }

    /// Like [`add_geometry`](Self::add_geometry), with every incoming
    /// position shifted by `shift`.
    pub fn add_geometry_offset(&mut self, other: &Geometry, shift: Vector3<f32>) {
        let offset = self.positions.len() as u32;

        for name_comps in other
            .attributes
            .iter()
            .map(|a| (a.name().to_string(), a.num_components()))
            .collect::<Vec<_>>()
        {
            self.add_attribute(&name_comps.0, name_comps.1);
        }

        self.positions.extend(other.positions.iter().map(|p| p + shift));
        self.normals.extend_from_slice(&other.normals);
        self.texcoords.extend_from_slice(&other.texcoords);
        self.colors.extend_from_slice(&other.colors);

        for attr in &mut self.attributes {
            match other.attribute_index(attr.name()) {
                Some(j) => {
                    let src = &other.attributes[j];
                    for i in 0..other.positions.len() {
                        attr.push(src.value(i));
                    }
                }
                None => {
                    for _ in 0..other.positions.len() {
                        attr.push(&[]);
                    }
                }
            }
        }

        self.triangles
            .extend(other.triangles.iter().map(|i| i + offset));
        self.edge_flags.extend_from_slice(&other.edge_flags);
        self.lines.extend(other.lines.iter().map(|i| i + offset));
        self.points.extend(other.points.iter().map(|i| i + offset));

        if self.shared_vertices {
            for (i, p) in other.positions.iter().enumerate() {
                self.weld.insert(&(p + shift), offset + i as u32);
            }
        }
        self.set_changed();
    }

    /// Axis-aligned bounds, or `None` for empty geometry
    pub fn extent(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some((min, max))
    }

    /// Nearest ray/triangle intersection parameter, if any
    pub fn intersects(&self, origin: &Point3<f32>, dir: &Vector3<f32>) -> Option<f32> {
        let mut best: Option<f32> = None;
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t as u32);
            if let Some(d) = crate::utils::math::intersect_ray_triangle(
                origin,
                dir,
                &self.positions[a as usize],
                &self.positions[b as usize],
                &self.positions[c as usize],
            ) {
                best = Some(match best {
                    Some(prev) if prev <= d => prev,
                    _ => d,
                });
            }
        }
        best
    }

    /// True when the ray hits any triangle
    pub fn intersects_any(&self, origin: &Point3<f32>, dir: &Vector3<f32>) -> bool {
        (0..self.num_triangles()).any(|t| {
            let [a, b, c] = self.triangle(t as u32);
            crate::utils::math::intersect_ray_triangle(
                origin,
                dir,
                &self.positions[a as usize],
                &self.positions[b as usize],
                &self.positions[c as usize],
            )
            .is_some()
        })
    }

    /// Approximate heap usage in bytes
    pub fn memory(&self) -> usize {
        self.positions.capacity() * std::mem::size_of::<Point3<f32>>()
            + self.normals.capacity() * std::mem::size_of::<Vector3<f32>>()
            + (self.texcoords.capacity() + self.colors.capacity()) * std::mem::size_of::<f32>()
            + (self.triangles.capacity() + self.lines.capacity() + self.points.capacity())
                * std::mem::size_of::<u32>()
            + self.edge_flags.capacity()
            + self.attributes.iter().map(|a| a.memory()).sum::<usize>()
            + self.weld.memory()
    }

    /// One-line human readable summary
    pub fn info_string(&self) -> String {
        format!(
            "vertices: {}, triangles: {}, lines: {}, points: {}, attributes: {}, memory: {} bytes",
            self.num_vertices(),
            self.num_triangles(),
            self.num_lines(),
            self.num_points(),
            self.attributes.len(),
            self.memory()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_vertex_welds_within_threshold() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(true, 0.01);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let b = geo.add_vertex(Point3::new(0.005, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(a, b);
        assert_eq!(geo.num_vertices(), 1);
        // running average over two uses
        assert_relative_eq!(geo.normal(a).x, 0.5);
        assert_relative_eq!(geo.normal(a).y, 0.5);
    }

    #[test]
    fn test_sharing_disabled_keeps_vertices_private() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.01);
        let a = geo.add_vertex(Point3::origin(), Vector3::y());
        let b = geo.add_vertex(Point3::origin(), Vector3::y());
        assert_ne!(a, b);
        assert_eq!(geo.num_vertices(), 2);
    }

    #[test]
    fn test_attribute_blended_on_weld() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(true, 0.01);
        geo.add_attribute("weight", 1);
        geo.set_attribute("weight", &[1.0]);
        let a = geo.add_vertex(Point3::origin(), Vector3::y());
        geo.set_attribute("weight", &[3.0]);
        let b = geo.add_vertex(Point3::origin(), Vector3::y());
        assert_eq!(a, b);
        let idx = geo.attribute_index("weight").unwrap();
        assert_relative_eq!(geo.attribute(idx).unwrap().value(a as usize)[0], 2.0);
    }

    #[test]
    fn test_color_averaged_on_weld() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(true, 0.01);
        geo.set_color(1.0, 0.0, 0.0, 1.0);
        let a = geo.add_vertex(Point3::origin(), Vector3::y());
        geo.set_color(0.0, 1.0, 0.0, 1.0);
        let b = geo.add_vertex(Point3::origin(), Vector3::y());
        assert_eq!(a, b);
        let [r, g, bl, al] = geo.color(a);
        assert_relative_eq!(r, 0.5);
        assert_relative_eq!(g, 0.5);
        assert_relative_eq!(bl, 0.0);
        assert_relative_eq!(al, 1.0);
    }

    #[test]
    fn test_add_vertex_between_mix() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        geo.set_color(0.0, 0.0, 0.0, 1.0);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::x());
        geo.set_color(1.0, 1.0, 1.0, 1.0);
        let b = geo.add_vertex(Point3::new(4.0, 0.0, 0.0), Vector3::y());

        let m = geo.add_vertex_between(a, b, 0.25);
        assert_relative_eq!(geo.position(m).x, 1.0);
        assert_relative_eq!(geo.color(m)[0], 0.25);
        // blended normal comes out renormalized
        assert_relative_eq!(geo.normal(m).norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(geo.normal(m).x, 3.0 * geo.normal(m).y, epsilon = 1e-6);
    }

    #[test]
    fn test_remove_triangle_by_corners() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.01);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        let c = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        let d = geo.add_vertex(Point3::new(1.0, 1.0, 0.0), Vector3::z());
        geo.add_triangle(a, b, c);
        geo.add_triangle(b, d, c);

        // corners match in any order
        assert!(geo.remove_triangle_by_corners(c, a, b));
        assert_eq!(geo.num_triangles(), 1);
        assert_eq!(geo.triangle(0), [b, d, c]);
        assert!(!geo.remove_triangle_by_corners(a, b, c));
    }

    #[test]
    fn test_add_quad_points() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        geo.set_current_normal(Vector3::z());
        geo.add_quad_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(geo.num_vertices(), 4);
        assert_eq!(geo.num_triangles(), 2);
        assert_eq!(geo.normal(0), Vector3::z());
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.01);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::y());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::y());
        let c = geo.add_vertex(Point3::new(0.000001, 0.0, 0.0), Vector3::y());
        assert!(geo.add_triangle_checked(a, b, c).is_none());
        assert_eq!(geo.num_triangles(), 0);
        let d = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::y());
        assert!(geo.add_triangle_checked(a, b, d).is_some());
    }

    #[test]
    fn test_remove_triangle_keeps_vertices() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.01);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::y());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::y());
        let c = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::y());
        geo.add_triangle(a, b, c);
        geo.remove_triangle(0);
        assert_eq!(geo.num_triangles(), 0);
        assert_eq!(geo.num_vertices(), 3);
    }

    #[test]
    fn test_staged_color_applied_to_new_vertices() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.01);
        geo.set_color(1.0, 0.0, 0.0, 1.0);
        let a = geo.add_vertex(Point3::origin(), Vector3::y());
        geo.set_color(0.0, 1.0, 0.0, 1.0);
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::y());
        assert_eq!(geo.color(a), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(geo.color(b), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_duplicate_vertex_under_sharing_is_identity() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(true, 0.01);
        let a = geo.add_vertex(Point3::origin(), Vector3::y());
        assert_eq!(geo.duplicate_vertex(a), a);

        geo.set_vertex_sharing(false, 0.01);
        let d = geo.duplicate_vertex(a);
        assert_ne!(d, a);
        assert_eq!(geo.position(d), geo.position(a));
    }

    #[test]
    fn test_add_geometry_offsets_indices() {
        let mut a = Geometry::new();
        a.set_vertex_sharing(false, 0.01);
        let v0 = a.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::y());
        let v1 = a.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::y());
        let v2 = a.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::y());
        a.add_triangle(v0, v1, v2);

        let mut b = a.clone();
        b.add_geometry(&a);
        assert_eq!(b.num_vertices(), 6);
        assert_eq!(b.num_triangles(), 2);
        assert_eq!(b.triangle(1), [3, 4, 5]);
    }

    #[test]
    fn test_edge_flags_follow_staged_state() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        let a = geo.add_vertex(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = geo.add_vertex(Point3::new(1.0, 0.0, 0.0), Vector3::z());
        let c = geo.add_vertex(Point3::new(0.0, 1.0, 0.0), Vector3::z());
        let d = geo.add_vertex(Point3::new(1.0, 1.0, 0.0), Vector3::z());

        geo.add_triangle(a, b, c);
        geo.set_edge_flag(false);
        geo.add_triangle(b, d, c);
        geo.add_triangle_with_edges(a, c, d, true, false, true);

        assert_eq!(geo.triangle_edge_flags(0), [true, true, true]);
        assert_eq!(geo.triangle_edge_flags(1), [false, false, false]);
        assert_eq!(geo.triangle_edge_flags(2), [true, false, true]);

        geo.remove_triangle(1);
        assert_eq!(geo.edge_flags().len(), 6);
        assert_eq!(geo.triangle_edge_flags(1), [true, false, true]);
    }

    #[test]
    fn test_staged_normal() {
        let mut geo = Geometry::new();
        geo.set_vertex_sharing(false, 0.001);
        geo.set_current_normal(Vector3::x());
        let v = geo.add_vertex_staged(Point3::origin());
        assert_eq!(geo.normal(v), Vector3::x());
    }

    #[test]
    fn test_hash_changes_on_mutation() {
        let mut geo = Geometry::new();
        let h0 = geo.hash();
        geo.add_vertex(Point3::origin(), Vector3::y());
        assert_ne!(geo.hash(), h0);
    }

    #[test]
    fn test_extent() {
        let mut geo = Geometry::new();
        assert!(geo.extent().is_none());
        geo.set_vertex_sharing(false, 0.01);
        geo.add_vertex(Point3::new(-1.0, 2.0, 0.0), Vector3::y());
        geo.add_vertex(Point3::new(3.0, -2.0, 1.0), Vector3::y());
        let (min, max) = geo.extent().unwrap();
        assert_eq!(min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Point3::new(3.0, 2.0, 1.0));
    }
}
