//! Inventory validation and reinjection
//!
//! An inventory is the fully expanded model:
//!
//! ```yaml
//! name: lab
//! infra: lab
//! profiles:
//!   management:
//!     arity: 1
//!     steps:
//!       - step: 1
//!   compute:
//!     arity: 1+2n
//! hosts:
//!   master: {profile: management}
//!   node1: {profile: compute}
//! ```
//!
//! Validation checks the sections exist, the hosts reference real profiles,
//! and every profile gets a host count its arity admits. Reinjection writes
//! the derived `hosts` list and `min_step` back into each profile.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::arity::Arity;
use crate::error::{InventoryError, Result};
use crate::model::{
    get_mapping, key_label, ARITY_KEY, HOSTS_KEY, INFRA_KEY, MIN_STEP_KEY, NAME_KEY,
    PROFILES_KEY, PROFILE_KEY, STEPS_KEY, STEP_KEY,
};

// =============================================================================
// REPORT
// =============================================================================

/// Outcome of a successful validation, one entry per profile
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub name: String,
    pub profiles: Vec<ProfileReport>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileReport {
    pub profile: String,
    pub arity: String,
    pub hosts: Vec<String>,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check an expanded inventory.
///
/// Every failure is [`InventoryError::InvalidConfiguration`]. Running this
/// again on a reinjected inventory succeeds.
pub fn validate(inventory: &Mapping) -> Result<ValidationReport> {
    let (Some(hosts), Some(profiles)) = (
        get_mapping(inventory, HOSTS_KEY),
        get_mapping(inventory, PROFILES_KEY),
    ) else {
        return Err(InventoryError::invalid("No hosts or profiles section"));
    };

    let name = match (inventory.get(INFRA_KEY), inventory.get(NAME_KEY)) {
        (Some(infra), Some(name)) if infra == name => key_label(name),
        (Some(infra), Some(name)) => {
            return Err(InventoryError::invalid(format!(
                "infra '{}' does not match name '{}'",
                key_label(infra),
                key_label(name)
            )))
        }
        _ => return Err(InventoryError::invalid("infra or name field missing")),
    };

    for (host, record) in hosts {
        let Some(profile) = record.as_mapping().and_then(|r| r.get(PROFILE_KEY)) else {
            return Err(InventoryError::invalid(format!(
                "host {} has no profile section",
                key_label(host)
            )));
        };
        if !profiles.contains_key(profile) {
            return Err(InventoryError::invalid(format!(
                "host {} references unknown profile {}",
                key_label(host),
                key_label(profile)
            )));
        }
    }

    let mut reports = Vec::with_capacity(profiles.len());
    for (profile, definition) in profiles {
        let label = key_label(profile);
        let arity = profile_arity(&label, definition)?;
        let members = hosts_for(hosts, profile);
        if !arity.admits(members.len()) {
            return Err(InventoryError::invalid(format!(
                "profile {label} has {} host(s), which does not satisfy arity {arity}",
                members.len()
            )));
        }
        debug!(profile = %label, %arity, count = members.len(), "arity satisfied");
        reports.push(ProfileReport {
            profile: label,
            arity: arity.to_string(),
            hosts: members.iter().copied().map(key_label).collect(),
        });
    }

    info!(
        hosts = hosts.len(),
        profiles = profiles.len(),
        "inventory validated"
    );
    Ok(ValidationReport {
        name,
        profiles: reports,
    })
}

fn profile_arity(label: &str, definition: &Value) -> Result<Arity> {
    let rule = match definition.as_mapping().and_then(|d| d.get(ARITY_KEY)) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => {
            return Err(InventoryError::invalid(format!(
                "profile {label} has a non-textual arity"
            )))
        }
        None => {
            return Err(InventoryError::invalid(format!(
                "profile {label} has no arity"
            )))
        }
    };
    Arity::parse(&rule)
}

/// Host names whose `profile` field equals `profile`, in inventory order
fn hosts_for<'a>(hosts: &'a Mapping, profile: &Value) -> Vec<&'a Value> {
    hosts
        .iter()
        .filter(|(_, record)| record.get(PROFILE_KEY) == Some(profile))
        .map(|(host, _)| host)
        .collect()
}

// =============================================================================
// REINJECTION
// =============================================================================

/// Write derived fields back into each profile.
///
/// - empty (`~`) profiles become empty mappings
/// - `hosts`: the hosts bound to the profile
/// - `min_step`: lowest declared step, when the profile has steps
pub fn reinject(inventory: &mut Mapping) {
    let hosts = get_mapping(inventory, HOSTS_KEY).cloned().unwrap_or_default();
    let Some(Value::Mapping(profiles)) = inventory.get_mut(PROFILES_KEY) else {
        return;
    };

    for (profile, definition) in profiles.iter_mut() {
        if definition.is_null() {
            *definition = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(fields) = definition else {
            continue;
        };

        if let Some(lowest) = fields.get(STEPS_KEY).and_then(min_step) {
            fields.insert(Value::from(MIN_STEP_KEY), Value::from(lowest));
        }
        let members: Vec<Value> = hosts_for(&hosts, profile).into_iter().cloned().collect();
        fields.insert(Value::from(HOSTS_KEY), Value::Sequence(members));
    }
}

/// Lowest step declared either as `[{step: N}, ...]` or as `{N: ..., M: ...}`
fn min_step(steps: &Value) -> Option<i64> {
    match steps {
        Value::Sequence(items) => items
            .iter()
            .filter_map(|item| item.get(STEP_KEY).and_then(Value::as_i64))
            .min(),
        Value::Mapping(by_step) => by_step.keys().filter_map(Value::as_i64).min(),
        _ => None,
    }
}

/// Validate then reinject; the usual way to hand an inventory onward
pub fn prepare_inventory(inventory: &mut Mapping) -> Result<ValidationReport> {
    let report = validate(inventory)?;
    reinject(inventory);
    Ok(report)
}
