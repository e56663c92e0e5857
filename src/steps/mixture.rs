//! Detección y resolución de mezclas (estructuras multi-fragmento).

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

use super::replacement_or_flag;

/// Filtro que flagea toda estructura con más de un fragmento.
pub struct FlagMixtures {
    descriptor: StepDescriptor,
}

impl FlagMixtures {
    pub const NAME: &'static str = "flag_mixtures";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Filter, 2)
                .with_issue("compound is a mixture")
                .with_dependency("remove_explicit_hydrogens|remove_all_hydrogens")
                .validated()?,
        })
    }
}

impl CurationStep for FlagMixtures {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        if engine.fragment_count(record.structure()) > 1 {
            StepOutcome::Flag
        } else {
            StepOutcome::Pass
        }
    }
}

/// Alternativa de actualización: en vez de descartar la mezcla conserva el
/// fragmento más grande.
pub struct KeepLargestFragment {
    descriptor: StepDescriptor,
}

impl KeepLargestFragment {
    pub const NAME: &'static str = "keep_largest_fragment";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 2)
                .with_issue("compound is a mixture")
                .with_note("separated out a mixture component")
                .validated()?,
        })
    }
}

impl CurationStep for KeepLargestFragment {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        replacement_or_flag(engine.largest_fragment(record.structure()))
    }
}
