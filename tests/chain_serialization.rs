// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Chain persistence, registry lookup and cancellation behavior.

use meshforge::modifier::{
    CreateModifier, ExtrudeModifier, NoiseModifier, RemoveModifier, TessellateModifier,
    TranslateModifier,
};
use meshforge::{
    Geometry, GeometryModifier, ModifierChain, ModifierRegistry, Monitor, Properties,
    PropertyValue, StreamWriter,
};

fn sample_chain() -> ModifierChain {
    let mut create = CreateModifier::default();
    create
        .properties_mut()
        .set("type", PropertyValue::Text("uvsphere".into()));
    create
        .properties_mut()
        .set("segments", PropertyValue::UInts(vec![12, 8, 1]));

    let mut tess = TessellateModifier::default();
    tess.properties_mut().set("level", PropertyValue::Int(1));

    let mut noise = NoiseModifier::default();
    noise.properties_mut().set("seed", PropertyValue::Int(7));
    noise.set_enabled(false);

    let mut chain = ModifierChain::new();
    chain.add(Box::new(create));
    chain.add(Box::new(tess));
    chain.add(Box::new(noise));
    chain
}

#[test]
fn test_chain_roundtrip_preserves_config() -> anyhow::Result<()> {
    let chain = sample_chain();
    let bytes = chain.to_bytes()?;

    let registry = ModifierRegistry::with_builtins();
    let loaded = ModifierChain::from_bytes(&bytes, &registry)?;

    assert_eq!(chain, loaded);
    assert!(!loaded.get(2).unwrap().is_enabled());
    assert_eq!(
        loaded.get(0).unwrap().properties().text_value("type"),
        "uvsphere"
    );
    Ok(())
}

#[test]
fn test_roundtripped_chain_produces_identical_geometry() -> anyhow::Result<()> {
    let chain = sample_chain();
    let registry = ModifierRegistry::with_builtins();
    let loaded = ModifierChain::from_bytes(&chain.to_bytes()?, &registry)?;

    let mut a = Geometry::new();
    chain.execute(&mut a, &Monitor::new())?;
    let mut b = Geometry::new();
    loaded.execute(&mut b, &Monitor::new())?;

    assert_eq!(a.num_vertices(), b.num_vertices());
    assert_eq!(a.triangles(), b.triangles());
    assert_eq!(a.positions(), b.positions());
    Ok(())
}

#[test]
fn test_unknown_modifier_record_is_skipped() -> anyhow::Result<()> {
    // hand-build a chain record stream with one unknown class in the middle
    let translate = TranslateModifier::default();

    let mut w = StreamWriter::new();
    w.write_header("geommodchain", 1);
    w.write_u32(2);

    w.write_string("geofancy");
    let token = w.begin_skip();
    w.write_u32(0xdead_beef);
    w.write_string("opaque future payload");
    w.end_skip(token);

    w.write_string(translate.class_name());
    let token = w.begin_skip();
    translate.write(&mut w)?;
    w.end_skip(token);

    let registry = ModifierRegistry::with_builtins();
    let loaded = ModifierChain::from_bytes(w.as_bytes(), &registry)?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get(0).unwrap().class_name(), "geotranslate");
    Ok(())
}

#[test]
fn test_seeded_pipeline_is_deterministic() -> anyhow::Result<()> {
    let mut chain = sample_chain();
    chain.get_mut(2).unwrap().set_enabled(true);

    let mut remove = RemoveModifier::default();
    remove
        .properties_mut()
        .set("probability", PropertyValue::Float(0.3));
    remove.properties_mut().set("seed", PropertyValue::Int(99));
    chain.add(Box::new(remove));

    let mut extrude = ExtrudeModifier::default();
    extrude
        .properties_mut()
        .set("constant", PropertyValue::Float(0.2));
    chain.add(Box::new(extrude));

    let mut a = Geometry::new();
    chain.execute(&mut a, &Monitor::new())?;
    let mut b = Geometry::new();
    chain.execute(&mut b, &Monitor::new())?;

    assert!(a.num_triangles() > 0);
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.triangles(), b.triangles());
    Ok(())
}

/// Counts executions and optionally stops the chain, for cancellation tests
#[derive(Clone, Default)]
struct StopModifier {
    enabled: bool,
    props: Properties,
    stop: bool,
}

impl StopModifier {
    fn new(stop: bool) -> Self {
        Self {
            enabled: true,
            props: Properties::new(),
            stop,
        }
    }
}

impl GeometryModifier for StopModifier {
    fn class_name(&self) -> &'static str {
        "teststop"
    }
    fn gui_name(&self) -> &'static str {
        "stop"
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
        let v = geometry.add_vertex_always(nalgebra::Point3::origin(), nalgebra::Vector3::zeros());
        geometry.add_point(v);
        if self.stop {
            monitor.request_stop();
        }
        Ok(())
    }
}

#[test]
fn test_stop_during_chain_skips_remaining_modifiers() -> anyhow::Result<()> {
    let mut chain = ModifierChain::new();
    for i in 0..5 {
        chain.add(Box::new(StopModifier::new(i == 2)));
    }

    let mut geo = Geometry::new();
    let monitor = Monitor::new();
    chain.execute(&mut geo, &monitor)?;

    // modifiers 0..=2 ran, 3 and 4 were skipped
    assert_eq!(geo.num_points(), 3);
    assert_eq!(monitor.current(), 2);
    Ok(())
}

#[test]
fn test_external_modifiers_can_register() -> anyhow::Result<()> {
    let mut registry = ModifierRegistry::new();
    registry.register::<StopModifier>();

    let mut chain = ModifierChain::new();
    chain.add(Box::new(StopModifier::new(false)));
    let loaded = ModifierChain::from_bytes(&chain.to_bytes()?, &registry)?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get(0).unwrap().class_name(), "teststop");
    Ok(())
}
