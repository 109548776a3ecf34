// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Typed key/value parameter bag shared by all modifiers.
//!
//! Every parameter keeps its default and an optional numeric range next to
//! the current value, so UIs can render editors and resets without knowing
//! the concrete modifier. The bag serializes as JSON inside the binary
//! chain records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Floats(Vec<f32>),
    UInts(Vec<u32>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Property {
    value: PropertyValue,
    default: PropertyValue,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    min: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    max: Option<PropertyValue>,
}

/// Ordered parameter bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    map: BTreeMap<String, Property>,
}

fn clamp_value(
    value: PropertyValue,
    min: &Option<PropertyValue>,
    max: &Option<PropertyValue>,
) -> PropertyValue {
    match value {
        PropertyValue::Int(mut v) => {
            if let Some(PropertyValue::Int(lo)) = min {
                v = v.max(*lo);
            }
            if let Some(PropertyValue::Int(hi)) = max {
                v = v.min(*hi);
            }
            PropertyValue::Int(v)
        }
        PropertyValue::Float(mut v) => {
            if let Some(PropertyValue::Float(lo)) = min {
                v = v.max(*lo);
            }
            if let Some(PropertyValue::Float(hi)) = max {
                v = v.min(*hi);
            }
            PropertyValue::Float(v)
        }
        other => other,
    }
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter with its default value
    pub fn define(&mut self, name: &str, default: PropertyValue) {
        self.map.insert(
            name.to_string(),
            Property {
                value: default.clone(),
                default,
                min: None,
                max: None,
            },
        );
    }

    /// Declare a numeric parameter with an inclusive range
    pub fn define_ranged(
        &mut self,
        name: &str,
        default: PropertyValue,
        min: PropertyValue,
        max: PropertyValue,
    ) {
        self.map.insert(
            name.to_string(),
            Property {
                value: default.clone(),
                default,
                min: Some(min),
                max: Some(max),
            },
        );
    }

    /// Set a value, clamping numbers into the declared range.
    /// Unknown names are inserted as range-less parameters.
    pub fn set(&mut self, name: &str, value: PropertyValue) {
        match self.map.get_mut(name) {
            Some(prop) => {
                prop.value = clamp_value(value, &prop.min, &prop.max);
            }
            None => {
                self.define(name, value);
            }
        }
    }

    /// Take over values from another bag, keeping local range declarations
    pub fn merge(&mut self, other: &Properties) {
        for (name, prop) in &other.map {
            self.set(name, prop.value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.map.get(name).map(|p| &p.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn reset(&mut self, name: &str) {
        if let Some(prop) = self.map.get_mut(name) {
            prop.value = prop.default.clone();
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    // typed accessors, falling back to a zero value for missing or
    // mistyped parameters

    pub fn bool_value(&self, name: &str) -> bool {
        matches!(self.get(name), Some(PropertyValue::Bool(true)))
    }

    pub fn int_value(&self, name: &str) -> i64 {
        match self.get(name) {
            Some(PropertyValue::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn float_value(&self, name: &str) -> f32 {
        match self.get(name) {
            Some(PropertyValue::Float(v)) => *v,
            _ => 0.0,
        }
    }

    pub fn text_value(&self, name: &str) -> String {
        match self.get(name) {
            Some(PropertyValue::Text(v)) => v.clone(),
            _ => String::new(),
        }
    }

    pub fn floats_value(&self, name: &str) -> Vec<f32> {
        match self.get(name) {
            Some(PropertyValue::Floats(v)) => v.clone(),
            _ => Vec::new(),
        }
    }

    pub fn uints_value(&self, name: &str) -> Vec<u32> {
        match self.get(name) {
            Some(PropertyValue::UInts(v)) => v.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clamps_to_range() {
        let mut props = Properties::new();
        props.define_ranged(
            "level",
            PropertyValue::Int(1),
            PropertyValue::Int(0),
            PropertyValue::Int(10),
        );
        props.set("level", PropertyValue::Int(99));
        assert_eq!(props.int_value("level"), 10);
        props.set("level", PropertyValue::Int(-5));
        assert_eq!(props.int_value("level"), 0);
    }

    #[test]
    fn test_unknown_name_is_inserted() {
        let mut props = Properties::new();
        props.set("extra", PropertyValue::Float(1.5));
        assert_eq!(props.float_value("extra"), 1.5);
    }

    #[test]
    fn test_reset_restores_default() {
        let mut props = Properties::new();
        props.define("name", PropertyValue::Text("cube".into()));
        props.set("name", PropertyValue::Text("sphere".into()));
        props.reset("name");
        assert_eq!(props.text_value("name"), "cube");
    }

    #[test]
    fn test_merge_keeps_local_ranges() {
        let mut base = Properties::new();
        base.define_ranged(
            "seg",
            PropertyValue::Int(8),
            PropertyValue::Int(3),
            PropertyValue::Int(64),
        );

        let mut stored = Properties::new();
        stored.set("seg", PropertyValue::Int(1000));
        base.merge(&stored);
        assert_eq!(base.int_value("seg"), 64);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut props = Properties::new();
        props.define("enabled", PropertyValue::Bool(true));
        props.define("offset", PropertyValue::Floats(vec![1.0, 2.0, 3.0]));
        let json = serde_json::to_string(&props).unwrap();
        let back: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(props, back);
    }
}
