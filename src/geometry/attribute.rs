// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Named per-vertex attribute channels beyond the built-in ones.
//!
//! A channel stores 1 to 4 floats per vertex in a flat array. Each channel
//! also carries a staged "current value" that is attached to every vertex
//! appended after it was set, mirroring the staged color and texcoord state
//! of [`crate::geometry::Geometry`].

/// A user-defined per-vertex float channel
#[derive(Debug, Clone, PartialEq)]
pub struct UserAttribute {
    name: String,
    num_components: usize,
    data: Vec<f32>,
    cur_value: Vec<f32>,
}

impl UserAttribute {
    /// Create an empty channel. `num_components` is clamped to 1..=4.
    pub fn new(name: impl Into<String>, num_components: usize) -> Self {
        let num_components = num_components.clamp(1, 4);
        Self {
            name: name.into(),
            num_components,
            data: Vec::new(),
            cur_value: vec![0.0; num_components],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Number of vertices that have a value in this channel
    pub fn len(&self) -> usize {
        self.data.len() / self.num_components
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Stage the value appended for vertices added after this call.
    /// Extra components are ignored, missing ones stay at their previous value.
    pub fn set_current(&mut self, value: &[f32]) {
        for (dst, src) in self.cur_value.iter_mut().zip(value) {
            *dst = *src;
        }
    }

    pub fn current(&self) -> &[f32] {
        &self.cur_value
    }

    /// Append the staged value for a newly created vertex
    pub fn push_current(&mut self) {
        self.data.extend_from_slice(&self.cur_value);
    }

    /// Append an explicit value for a newly created vertex
    pub fn push(&mut self, value: &[f32]) {
        for c in 0..self.num_components {
            self.data.push(value.get(c).copied().unwrap_or(0.0));
        }
    }

    /// Value of vertex `index`, or an empty slice if out of range
    pub fn value(&self, index: usize) -> &[f32] {
        let start = index * self.num_components;
        let end = start + self.num_components;
        if end <= self.data.len() {
            &self.data[start..end]
        } else {
            &[]
        }
    }

    /// Overwrite the value of vertex `index`
    pub fn set_value(&mut self, index: usize, value: &[f32]) {
        let start = index * self.num_components;
        for c in 0..self.num_components {
            if let Some(slot) = self.data.get_mut(start + c) {
                *slot = value.get(c).copied().unwrap_or(0.0);
            }
        }
    }

    /// Blend an existing vertex value toward the staged current value.
    /// `m1` weights the stored value, `m2` the staged one.
    pub fn blend_with_current(&mut self, index: usize, m1: f32, m2: f32) {
        let start = index * self.num_components;
        for c in 0..self.num_components {
            if let Some(slot) = self.data.get_mut(start + c) {
                *slot = *slot * m1 + self.cur_value[c] * m2;
            }
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Approximate heap usage in bytes
    pub fn memory(&self) -> usize {
        self.data.capacity() * std::mem::size_of::<f32>() + self.name.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_clamp() {
        assert_eq!(UserAttribute::new("a", 0).num_components(), 1);
        assert_eq!(UserAttribute::new("a", 9).num_components(), 4);
    }

    #[test]
    fn test_push_current_and_read_back() {
        let mut attr = UserAttribute::new("weight", 2);
        attr.set_current(&[0.25, 0.75]);
        attr.push_current();
        attr.push(&[1.0]);
        assert_eq!(attr.len(), 2);
        assert_eq!(attr.value(0), &[0.25, 0.75]);
        assert_eq!(attr.value(1), &[1.0, 0.0]);
        assert_eq!(attr.value(2), &[] as &[f32]);
    }

    #[test]
    fn test_blend_with_current() {
        let mut attr = UserAttribute::new("w", 1);
        attr.push(&[1.0]);
        attr.set_current(&[3.0]);
        attr.blend_with_current(0, 0.5, 0.5);
        assert_eq!(attr.value(0), &[2.0]);
    }
}
