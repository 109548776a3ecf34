// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Export seam toward GPU-style vertex arrays.
//!
//! Renderers implement [`VertexArraySink`] and receive the channels as flat
//! interleavable float arrays plus the index lists, without this crate
//! depending on any graphics API.

use super::Geometry;

/// Receiver for flattened vertex data
pub trait VertexArraySink {
    /// Called first with the vertex count so buffers can be sized
    fn begin(&mut self, num_vertices: usize);

    /// Positions, 3 floats per vertex
    fn positions(&mut self, data: &[f32]);

    /// Normals, 3 floats per vertex
    fn normals(&mut self, data: &[f32]);

    /// Texture coordinates, 2 floats per vertex
    fn tex_coords(&mut self, data: &[f32]);

    /// Colors, 4 floats per vertex
    fn colors(&mut self, data: &[f32]);

    /// One call per user attribute channel
    fn attribute(&mut self, name: &str, num_components: usize, data: &[f32]);

    fn triangle_indices(&mut self, indices: &[u32]);
    fn line_indices(&mut self, indices: &[u32]);
    fn point_indices(&mut self, indices: &[u32]);

    /// Wireframe hints, three per triangle. Ignored by default.
    fn edge_flags(&mut self, _flags: &[bool]) {}
}

impl Geometry {
    /// Push all channels and index lists into a sink
    pub fn fill_vertex_array<S: VertexArraySink>(&self, sink: &mut S) {
        sink.begin(self.num_vertices());

        let mut flat = Vec::with_capacity(self.num_vertices() * 3);
        for p in self.positions() {
            flat.extend_from_slice(&[p.x, p.y, p.z]);
        }
        sink.positions(&flat);

        flat.clear();
        for n in self.normals() {
            flat.extend_from_slice(&[n.x, n.y, n.z]);
        }
        sink.normals(&flat);

        sink.tex_coords(self.texcoords());
        sink.colors(self.colors());
        for attr in self.attributes() {
            sink.attribute(attr.name(), attr.num_components(), attr.data());
        }

        sink.triangle_indices(self.triangles());
        sink.line_indices(self.lines());
        sink.point_indices(self.points());
        sink.edge_flags(self.edge_flags());
    }
}
