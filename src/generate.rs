//! Inventory generation pipeline
//!
//! model -> expand `hosts` keys -> merge overrides -> set `step`
//! -> validate -> reinject -> (debug dump) -> renderer
//!
//! Rendering is left to the caller through [`TemplateRenderer`].

use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::config::{write_debug_dump, GeneratorConfig};
use crate::error::{InventoryError, Result};
use crate::expand::expand_keyed;
use crate::inventory::prepare_inventory;
use crate::merge::merge_into;
use crate::model::{HOSTS_KEY, STEP_KEY};

/// Renders a template against the prepared variables
pub trait TemplateRenderer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn render(&self, template: &str, variables: &Mapping) -> std::result::Result<String, Self::Error>;
}

/// Expand the marked keys of the `hosts` section in place
pub fn expand_hosts(model: &mut Mapping) {
    if let Some(Value::Mapping(hosts)) = model.get_mut(HOSTS_KEY) {
        *hosts = expand_keyed(hosts);
    }
}

pub struct Generator {
    config: GeneratorConfig,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generator configured from the environment
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Turn a raw model into the variables handed to a template.
    ///
    /// `overrides` are merged in order after host expansion; their scalars
    /// replace the model's.
    pub fn prepare(&self, step: i64, mut model: Mapping, overrides: &[Mapping]) -> Result<Mapping> {
        expand_hosts(&mut model);
        for extra in overrides {
            merge_into(&mut model, extra);
        }
        model.insert(Value::from(STEP_KEY), Value::from(step));

        let report = prepare_inventory(&mut model)?;
        info!(
            step,
            name = %report.name,
            profiles = report.profiles.len(),
            "inventory prepared"
        );

        if let Some(path) = &self.config.debug_dump {
            write_debug_dump(&model, path)?;
        }
        Ok(model)
    }

    /// Prepare the variables and render `template` with them
    pub fn expand_template<R: TemplateRenderer>(
        &self,
        renderer: &R,
        step: i64,
        model: Mapping,
        template: &str,
        overrides: &[Mapping],
    ) -> Result<String> {
        let variables = self.prepare(step, model, overrides)?;
        renderer
            .render(template, &variables)
            .map_err(|e| InventoryError::Render(Box::new(e)))
    }
}
