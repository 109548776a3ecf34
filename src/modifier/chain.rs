// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Ordered modifier pipeline with persistence and cancellation.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use ahash::AHashMap;
use anyhow::Context;

use crate::geometry::Geometry;
use crate::io::{StreamError, StreamReader, StreamWriter};

use super::{
    ConvertLinesModifier, CreateModifier, DuplicateModifier, EnumerateModifier, ExtrudeModifier,
    GeometryModifier, NoiseModifier, NormalizeModifier, RemoveModifier, RotateModifier,
    ScaleModifier, TessellateModifier, TexCoordsModifier, TranslateModifier,
    VertexEquationModifier,
};

const CHAIN_TAG: &str = "geommodchain";
const CHAIN_VERSION: u32 = 1;

/// Shared progress and cancellation handle.
///
/// Clones observe the same state, so one clone can be handed to a worker
/// running [`ModifierChain::execute`] while another requests a stop from a
/// UI thread. A stop takes effect before the next modifier starts; the one
/// currently running finishes.
#[derive(Debug, Clone, Default)]
pub struct Monitor {
    inner: Arc<MonitorState>,
}

#[derive(Debug, Default)]
struct MonitorState {
    stop: AtomicBool,
    progress: AtomicU8,
    current: AtomicUsize,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.inner.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.inner.stop.load(Ordering::Relaxed)
    }

    /// Percentage of enabled modifiers completed, 0..=100
    pub fn progress(&self) -> u8 {
        self.inner.progress.load(Ordering::Relaxed)
    }

    /// Chain index of the modifier currently running
    pub fn current(&self) -> usize {
        self.inner.current.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.inner.stop.store(false, Ordering::Relaxed);
        self.inner.progress.store(0, Ordering::Relaxed);
        self.inner.current.store(0, Ordering::Relaxed);
    }

    fn set_progress(&self, percent: u8) {
        self.inner.progress.store(percent, Ordering::Relaxed);
    }

    fn set_current(&self, index: usize) {
        self.inner.current.store(index, Ordering::Relaxed);
    }
}

/// Maps class names to modifier constructors for deserialization
pub struct ModifierRegistry {
    factories: AHashMap<&'static str, fn() -> Box<dyn GeometryModifier>>,
}

impl ModifierRegistry {
    /// Empty registry, for callers bringing only their own modifiers
    pub fn new() -> Self {
        Self {
            factories: AHashMap::new(),
        }
    }

    /// Registry with every modifier of this crate registered
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register::<ConvertLinesModifier>();
        reg.register::<CreateModifier>();
        reg.register::<DuplicateModifier>();
        reg.register::<EnumerateModifier>();
        reg.register::<ExtrudeModifier>();
        reg.register::<NoiseModifier>();
        reg.register::<NormalizeModifier>();
        reg.register::<RemoveModifier>();
        reg.register::<RotateModifier>();
        reg.register::<ScaleModifier>();
        reg.register::<TessellateModifier>();
        reg.register::<TexCoordsModifier>();
        reg.register::<TranslateModifier>();
        reg.register::<VertexEquationModifier>();
        reg
    }

    pub fn register<M>(&mut self)
    where
        M: GeometryModifier + Default + 'static,
    {
        let name = M::default().class_name();
        self.factories
            .insert(name, || Box::new(M::default()) as Box<dyn GeometryModifier>);
    }

    pub fn create(&self, class_name: &str) -> Option<Box<dyn GeometryModifier>> {
        self.factories.get(class_name).map(|f| f())
    }

    pub fn class_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl Default for ModifierRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Ordered list of modifiers applied to a geometry in sequence
#[derive(Debug, Clone, Default)]
pub struct ModifierChain {
    modifiers: Vec<Box<dyn GeometryModifier>>,
}

impl ModifierChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn add(&mut self, modifier: Box<dyn GeometryModifier>) {
        self.modifiers.push(modifier);
    }

    pub fn insert(&mut self, index: usize, modifier: Box<dyn GeometryModifier>) {
        self.modifiers.insert(index.min(self.modifiers.len()), modifier);
    }

    pub fn remove(&mut self, index: usize) -> Box<dyn GeometryModifier> {
        self.modifiers.remove(index)
    }

    /// Swap a modifier with its predecessor; false when already first
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.modifiers.len() {
            return false;
        }
        self.modifiers.swap(index, index - 1);
        true
    }

    /// Swap a modifier with its successor; false when already last
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.modifiers.len() {
            return false;
        }
        self.modifiers.swap(index, index + 1);
        true
    }

    pub fn get(&self, index: usize) -> Option<&dyn GeometryModifier> {
        self.modifiers.get(index).map(Box::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Box<dyn GeometryModifier>> {
        self.modifiers.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn GeometryModifier> {
        self.modifiers.iter().map(Box::as_ref)
    }

    /// Run all enabled modifiers in order.
    ///
    /// The monitor's stop flag is cleared first, then checked before every
    /// modifier; a stop requested while one runs prevents the following
    /// ones from starting. The first failing modifier aborts the run.
    pub fn execute(&self, geometry: &mut Geometry, monitor: &Monitor) -> anyhow::Result<()> {
        monitor.reset();
        let total = self
            .modifiers
            .iter()
            .filter(|m| m.is_enabled())
            .count()
            .max(1);
        let mut done = 0usize;

        for (index, modifier) in self.modifiers.iter().enumerate() {
            if monitor.stop_requested() {
                log::info!("modifier chain stopped at index {index}");
                break;
            }
            if !modifier.is_enabled() {
                continue;
            }
            monitor.set_current(index);
            modifier
                .execute(geometry, monitor)
                .with_context(|| format!("modifier '{}' failed", modifier.class_name()))?;
            done += 1;
            monitor.set_progress((done * 100 / total) as u8);
        }
        Ok(())
    }

    /// Serialize the whole chain.
    ///
    /// Every modifier record carries its class name and byte length, so
    /// readers can skip records of classes they do not know.
    pub fn write(&self, w: &mut StreamWriter) -> Result<(), StreamError> {
        w.write_header(CHAIN_TAG, CHAIN_VERSION);
        w.write_u32(self.modifiers.len() as u32);
        for modifier in &self.modifiers {
            w.write_string(modifier.class_name());
            let token = w.begin_skip();
            modifier.write(w)?;
            w.end_skip(token);
        }
        Ok(())
    }

    /// Deserialize a chain written by [`ModifierChain::write`].
    /// Records with class names missing from the registry are skipped with
    /// a warning instead of failing the whole load.
    pub fn read(r: &mut StreamReader, registry: &ModifierRegistry) -> Result<Self, StreamError> {
        r.read_header(CHAIN_TAG, CHAIN_VERSION)?;
        let count = r.read_u32()?;
        let mut chain = Self::new();
        for _ in 0..count {
            let class_name = r.read_string()?;
            let byte_length = r.read_i64()?;
            match registry.create(&class_name) {
                Some(mut modifier) => {
                    modifier.read(r)?;
                    chain.add(modifier);
                }
                None => {
                    log::warn!(
                        "skipping unknown modifier '{class_name}' ({byte_length} bytes)"
                    );
                    r.skip(byte_length)?;
                }
            }
        }
        Ok(chain)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StreamError> {
        let mut w = StreamWriter::new();
        self.write(&mut w)?;
        Ok(w.into_bytes())
    }

    pub fn from_bytes(bytes: &[u8], registry: &ModifierRegistry) -> Result<Self, StreamError> {
        let mut r = StreamReader::new(bytes);
        Self::read(&mut r, registry)
    }
}

impl PartialEq for ModifierChain {
    fn eq(&self, other: &Self) -> bool {
        self.modifiers.len() == other.modifiers.len()
            && self.modifiers.iter().zip(&other.modifiers).all(|(a, b)| {
                a.class_name() == b.class_name()
                    && a.is_enabled() == b.is_enabled()
                    && a.properties() == b.properties()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Properties, PropertyValue};

    /// Appends one point per run; can request a stop mid-chain.
    #[derive(Clone, Default)]
    struct MarkerModifier {
        enabled: bool,
        props: Properties,
        stop_after: bool,
    }

    impl MarkerModifier {
        fn new(stop_after: bool) -> Self {
            Self {
                enabled: true,
                props: Properties::new(),
                stop_after,
            }
        }
    }

    impl GeometryModifier for MarkerModifier {
        fn class_name(&self) -> &'static str {
            "testmarker"
        }
        fn gui_name(&self) -> &'static str {
            "marker"
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
            let v = geometry.add_vertex_always(
                nalgebra::Point3::origin(),
                nalgebra::Vector3::zeros(),
            );
            geometry.add_point(v);
            if self.stop_after {
                monitor.request_stop();
            }
            Ok(())
        }
    }

    #[test]
    fn test_execute_runs_enabled_in_order() {
        let mut chain = ModifierChain::new();
        chain.add(Box::new(MarkerModifier::new(false)));
        let mut disabled = MarkerModifier::new(false);
        disabled.enabled = false;
        chain.add(Box::new(disabled));
        chain.add(Box::new(MarkerModifier::new(false)));

        let mut geo = Geometry::new();
        let monitor = Monitor::new();
        chain.execute(&mut geo, &monitor).unwrap();
        assert_eq!(geo.num_points(), 2);
        assert_eq!(monitor.progress(), 100);
    }

    #[test]
    fn test_stop_skips_following_modifiers() {
        let mut chain = ModifierChain::new();
        chain.add(Box::new(MarkerModifier::new(false)));
        chain.add(Box::new(MarkerModifier::new(true)));
        chain.add(Box::new(MarkerModifier::new(false)));
        chain.add(Box::new(MarkerModifier::new(false)));

        let mut geo = Geometry::new();
        let monitor = Monitor::new();
        chain.execute(&mut geo, &monitor).unwrap();
        // first two ran, stop before the third
        assert_eq!(geo.num_points(), 2);
    }

    #[test]
    fn test_execute_clears_stale_stop() {
        let mut chain = ModifierChain::new();
        chain.add(Box::new(MarkerModifier::new(false)));

        let monitor = Monitor::new();
        monitor.request_stop();
        let mut geo = Geometry::new();
        chain.execute(&mut geo, &monitor).unwrap();
        assert_eq!(geo.num_points(), 1);
    }

    #[test]
    fn test_move_up_down() {
        let mut chain = ModifierChain::new();
        chain.add(Box::new(MarkerModifier::new(false)));
        chain.add(Box::new(MarkerModifier::new(true)));
        assert!(!chain.move_up(0));
        assert!(chain.move_up(1));
        assert!(chain.move_down(0));
        assert!(!chain.move_down(1));
    }

    #[test]
    fn test_unknown_modifier_is_skipped_on_read() {
        let mut chain = ModifierChain::new();
        chain.add(Box::new(MarkerModifier::new(false)));
        let bytes = chain.to_bytes().unwrap();

        // registry without the marker class
        let registry = ModifierRegistry::new();
        let loaded = ModifierChain::from_bytes(&bytes, &registry).unwrap();
        assert_eq!(loaded.len(), 0);
    }

    #[test]
    fn test_chain_equality_compares_config() {
        let mut a = ModifierChain::new();
        a.add(Box::new(MarkerModifier::new(false)));
        let mut b = a.clone();
        assert_eq!(a, b);

        b.get_mut(0)
            .unwrap()
            .properties_mut()
            .set("extra", PropertyValue::Int(1));
        assert_ne!(a, b);
    }
}
