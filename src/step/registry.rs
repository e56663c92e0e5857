//! Registry de steps por nombre.
//!
//! Cada step del catálogo se registra bajo su nombre estable junto a un
//! constructor que lo rearma desde sus params serializados. La carga de
//! workflows desde disco resuelve nombres contra este registry.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::errors::{StepError, WorkflowFormatError};
use crate::steps;

use super::CurationStep;

type StepBuilder = fn(&Value) -> Result<Box<dyn CurationStep>, StepError>;

/// Catálogo nombre -> constructor. El orden de inserción se preserva para
/// que el listado sea estable.
pub struct StepRegistry {
    builders: IndexMap<String, StepBuilder>,
}

impl StepRegistry {
    pub fn empty() -> Self {
        Self {
            builders: IndexMap::new(),
        }
    }

    /// Registry con todo el catálogo incluido en el crate.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(steps::FlagMissingLabel::NAME, |_| {
            Ok(Box::new(steps::FlagMissingLabel::new()?))
        });
        registry.register(steps::FillMissingLabel::NAME, |params| {
            Ok(Box::new(steps::FillMissingLabel::from_params(params)?))
        });
        registry.register(steps::FlagMixtures::NAME, |_| {
            Ok(Box::new(steps::FlagMixtures::new()?))
        });
        registry.register(steps::KeepLargestFragment::NAME, |_| {
            Ok(Box::new(steps::KeepLargestFragment::new()?))
        });
        registry.register(steps::SanitizeStructure::NAME, |_| {
            Ok(Box::new(steps::SanitizeStructure::new()?))
        });
        registry.register(steps::RemoveStereochemistry::NAME, |_| {
            Ok(Box::new(steps::RemoveStereochemistry::new()?))
        });
        registry.register(steps::NeutralizeCharges::NAME, |_| {
            Ok(Box::new(steps::NeutralizeCharges::new()?))
        });
        registry.register(steps::RemoveExplicitHydrogens::NAME, |_| {
            Ok(Box::new(steps::RemoveExplicitHydrogens::new()?))
        });
        registry.register(steps::RemoveAllHydrogens::NAME, |_| {
            Ok(Box::new(steps::RemoveAllHydrogens::new()?))
        });
        registry.register(steps::FlagInorganic::NAME, |_| {
            Ok(Box::new(steps::FlagInorganic::new()?))
        });
        registry.register(steps::FlagBoron::NAME, |_| {
            Ok(Box::new(steps::FlagBoron::new()?))
        });
        registry.register(steps::FlagMolecularWeight::NAME, |params| {
            Ok(Box::new(steps::FlagMolecularWeight::from_params(params)?))
        });
        registry.register(steps::MakeLabelNumeric::NAME, |_| {
            Ok(Box::new(steps::MakeLabelNumeric::new()?))
        });
        registry.register(steps::BinarizeLabel::NAME, |params| {
            Ok(Box::new(steps::BinarizeLabel::from_params(params)?))
        });
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, builder: StepBuilder) {
        self.builders.insert(name.into(), builder);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }

    /// Reconstruye un step por nombre. Un nombre desconocido es un error de
    /// formato del workflow, no un pánico.
    pub fn build(
        &self,
        name: &str,
        params: &Value,
    ) -> Result<Box<dyn CurationStep>, WorkflowFormatError> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| WorkflowFormatError::UnknownStep(name.to_string()))?;
        Ok(builder(params)?)
    }
}

/// Registry global con el catálogo incluido.
pub static REGISTRY: Lazy<StepRegistry> = Lazy::new(StepRegistry::builtin);
