//! End-to-end tests for the inventory pipeline
//!
//! YAML model in, prepared template variables out.
//!
//! Run with: cargo test --test inventory_pipeline

use inventory_gen::{
    expand_list, merge, prepare_inventory, validate, validate_arity, Generator, InventoryError,
};
use pretty_assertions::assert_eq;
use serde_yaml::{Mapping, Value};

fn map(text: &str) -> Mapping {
    serde_yaml::from_str(text).unwrap()
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

const CLOUD: &str = r#"
name: cloud
infra: cloud
profiles:
  management:
    arity: 1
    steps:
      - step: 1
        roles: [puppetmaster]
      - step: 2
        roles: [db]
  controller:
    arity: 3
    steps:
      - step: 3
        roles: [api]
  compute:
    arity: 1+n
  storage:
    arity: 2n
hosts:
  master:
    profile: management
    ip: 10.0.0.2
  =ctrl1-3:
    profile: controller
    =ip: 10.0.0.11-13
  =compute001-004:
    profile: compute
    =ip: 10.0.1.1-4
    =mac: [52:54:00:00:01:01, 52:54:00:00:01:02, 52:54:00:00:01:03, 52:54:00:00:01:04]
"#;

// =============================================================================
// END TO END
// =============================================================================

#[test]
fn test_single_host_inventory() {
    let mut inventory = map(
        r#"
profiles:
  management:
    arity: 1
hosts:
  master:
    profile: management
infra: X
name: X
"#,
    );
    prepare_inventory(&mut inventory).unwrap();
    let inventory = Value::Mapping(inventory);
    assert_eq!(inventory["profiles"]["management"]["hosts"], yaml("[master]"));
}

#[test]
fn test_cloud_inventory() {
    let vars = Value::Mapping(Generator::default().prepare(3, map(CLOUD), &[]).unwrap());

    assert_eq!(vars["step"], Value::from(3));
    assert_eq!(vars["hosts"].as_mapping().unwrap().len(), 1 + 3 + 4);
    assert_eq!(
        vars["hosts"]["compute003"],
        yaml("{profile: compute, ip: 10.0.1.3, mac: '52:54:00:00:01:03'}")
    );
    assert_eq!(vars["hosts"]["ctrl2"], yaml("{profile: controller, ip: 10.0.0.12}"));
    assert_eq!(
        vars["profiles"]["compute"]["hosts"],
        yaml("[compute001, compute002, compute003, compute004]")
    );
    assert_eq!(vars["profiles"]["storage"]["hosts"], yaml("[]"));
    assert_eq!(vars["profiles"]["management"]["min_step"], Value::from(1));
    assert_eq!(vars["profiles"]["controller"]["min_step"], Value::from(3));
}

#[test]
fn test_overrides_win_and_lists_concatenate() {
    let overrides = map(
        r#"
name: cloud
extra_roles: [monitoring]
hosts:
  master:
    ip: 10.0.0.200
"#,
    );
    let mut model = map(CLOUD);
    model.insert(Value::from("extra_roles"), yaml("[base]"));

    let vars = Value::Mapping(Generator::default().prepare(1, model, &[overrides]).unwrap());
    assert_eq!(vars["hosts"]["master"]["ip"], yaml("10.0.0.200"));
    assert_eq!(vars["extra_roles"], yaml("[base, monitoring]"));
}

#[test]
fn test_arity_mismatch_is_invalid_configuration() {
    let model = map(&CLOUD.replace("=ctrl1-3", "=ctrl1-2").replace("10.0.0.11-13", "10.0.0.11-12"));
    let err = Generator::default().prepare(1, model, &[]).unwrap_err();
    assert!(matches!(err, InventoryError::InvalidConfiguration(_)));
    assert!(err.to_string().contains("controller"));
}

#[test]
fn test_revalidation_after_reinject() {
    let vars = Generator::default().prepare(1, map(CLOUD), &[]).unwrap();
    let again = validate(&vars).unwrap();
    assert_eq!(again.profiles.len(), 4);
}

// =============================================================================
// BUILDING BLOCKS
// =============================================================================

#[test]
fn test_expand_list_zips_fields() {
    let records = expand_list(&yaml(
        "{gw: 192.168.1.1, '=ip': 192.168.1.10-12, '=hostname': host10-12}",
    ));
    assert_eq!(
        records,
        vec![
            yaml("{gw: 192.168.1.1, ip: 192.168.1.10, hostname: host10}"),
            yaml("{gw: 192.168.1.1, ip: 192.168.1.11, hostname: host11}"),
            yaml("{gw: 192.168.1.1, ip: 192.168.1.12, hostname: host12}"),
        ]
    );
}

#[test]
fn test_merge_contract() {
    assert_eq!(merge(map("{a: 1}"), &map("{a: 2}")), map("{a: 2}"));
    assert_eq!(merge(map("{a: [1, 2]}"), &map("{a: [3, 4]}")), map("{a: [1, 2, 3, 4]}"));
    assert_eq!(
        merge(map("{a: {b: 2}}"), &map("{a: {c: 3}}")),
        map("{a: {b: 2, c: 3}}")
    );
}

#[test]
fn test_arity_contract() {
    assert!(validate_arity("1", 1).unwrap());
    assert!(!validate_arity("2", 1).unwrap());
    assert!(validate_arity(" 2 + 2n ", 8).unwrap());
    assert!(validate_arity("n", 0).unwrap());
    assert!(!validate_arity(" 2 + n ", 1).unwrap());
    assert!(validate_arity("2 + 2", 4).is_err());
}
