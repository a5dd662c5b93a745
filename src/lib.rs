//! inventory-gen - Inventory expansion and validation
//!
//! Takes a compact, pattern-based description of hosts and deployment
//! profiles and produces the concrete per-host mapping handed to a template
//! renderer.
//!
//! ## Pipeline
//! raw model -> [`expand_keyed`] (host keys like `=node01-12`)
//! -> [`expand_list`] (fields like `=ip: 10.0.0.1-12`, in lock-step)
//! -> [`merge()`] (overrides) -> [`validate`] (arity per profile)
//! -> [`reinject`] (`hosts`, `min_step` per profile)
//!
//! ## Quick Start
//!
//! ```rust
//! use inventory_gen::Generator;
//!
//! let model: serde_yaml::Mapping = serde_yaml::from_str(r#"
//! name: lab
//! infra: lab
//! profiles:
//!   compute: {arity: n}
//! hosts:
//!   =node1-3: {profile: compute, =ip: 10.0.0.1-3}
//! "#).unwrap();
//!
//! let vars = Generator::default().prepare(1, model, &[]).unwrap();
//! let hosts = vars.get("hosts").and_then(|h| h.as_mapping()).unwrap();
//! assert_eq!(hosts.len(), 3);
//! ```

// Core error handling
pub mod error;

// Model vocabulary (keys, expansion marker)
pub mod model;

// Range patterns and record expansion
pub mod expand;

pub mod merge;

// Arity rules and inventory checks
pub mod arity;
pub mod inventory;

// Configuration and the end-to-end pipeline
pub mod config;
pub mod generate;

pub use arity::{validate_arity, Arity};
pub use config::GeneratorConfig;
pub use error::{InventoryError, Result};
pub use expand::{expand_keyed, expand_list, expand_pattern, expand_range, expand_value};
pub use generate::{expand_hosts, Generator, TemplateRenderer};
pub use inventory::{prepare_inventory, reinject, validate, ProfileReport, ValidationReport};
pub use merge::{merge, merge_into};
