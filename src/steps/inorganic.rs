//! Filtro de compuestos inorgánicos.

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

/// Flagea estructuras con átomos fuera del conjunto orgánico permitido.
pub struct FlagInorganic {
    descriptor: StepDescriptor,
}

impl FlagInorganic {
    pub const NAME: &'static str = "flag_inorganic";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Filter, 4)
                .with_issue("compound is inorganic")
                .validated()?,
        })
    }
}

impl CurationStep for FlagInorganic {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        if engine.has_foreign_atoms(record.structure()) {
            StepOutcome::Flag
        } else {
            StepOutcome::Pass
        }
    }
}
