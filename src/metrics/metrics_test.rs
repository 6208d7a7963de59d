use prometheus::Encoder;
use prometheus::TextEncoder;
use tracing_test::traced_test;

use super::*;

fn create_test_registry() -> (Registry, TargetsMetrics) {
    let registry = Registry::new();
    let metrics = TargetsMetrics::new(&registry).unwrap();
    (registry, metrics)
}

#[test]
fn test_custom_registry() {
    let (registry, metrics) = create_test_registry();

    metrics.record_update(true, 3);
    let families = registry.gather();

    let metric_names: Vec<_> = families.iter().map(|m| m.get_name()).collect();
    assert!(
        metric_names.contains(&"kvass_sidecar_targets_updated_total"),
        "Missing kvass_sidecar_targets_updated_total"
    );
    assert!(
        metric_names.contains(&"kvass_sidecar_targets_total"),
        "Missing kvass_sidecar_targets_total"
    );
}

#[test]
fn test_counter_is_labeled_by_outcome() {
    let (_registry, metrics) = create_test_registry();

    metrics.record_update(true, 1);
    metrics.record_update(true, 1);
    metrics.record_update(false, 1);

    assert_eq!(metrics.updates(true), 2);
    assert_eq!(metrics.updates(false), 1);
}

#[test]
fn test_gauge_follows_last_update() {
    let (_registry, metrics) = create_test_registry();

    metrics.record_update(true, 5);
    assert_eq!(metrics.tracked_targets(), 5);

    metrics.record_update(false, 0);
    assert_eq!(metrics.tracked_targets(), 0);
}

#[test]
fn test_text_exposition_format() {
    let (registry, metrics) = create_test_registry();
    metrics.record_update(true, 2);

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .unwrap();
    let body = String::from_utf8(buffer).unwrap();

    assert!(body.contains("kvass_sidecar_targets_updated_total{success=\"true\"} 1"));
    assert!(body.contains("kvass_sidecar_targets_total 2"));
}

#[test]
#[traced_test]
fn test_duplicate_registration_is_tolerated() {
    let registry = Registry::new();
    let first = TargetsMetrics::new(&registry).unwrap();
    let second = TargetsMetrics::new(&registry).unwrap();

    assert!(logs_contain("register kvass_sidecar_targets_updated_total failed"));

    // Only the first instance is exposed through the registry
    first.record_update(true, 7);
    second.record_update(true, 1);
    let families = registry.gather();
    let gauge = families
        .iter()
        .find(|f| f.get_name() == "kvass_sidecar_targets_total")
        .unwrap();
    assert_eq!(gauge.get_metric()[0].get_gauge().get_value(), 7.0);
}

#[test]
fn test_instances_are_independent() {
    let a = TargetsMetrics::unregistered().unwrap();
    let b = TargetsMetrics::unregistered().unwrap();

    a.record_update(true, 4);

    assert_eq!(a.updates(true), 1);
    assert_eq!(b.updates(true), 0);
    assert_eq!(b.tracked_targets(), 0);
}
