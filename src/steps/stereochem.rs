//! Step de estereoquímica.

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

use super::replacement_or_flag;

/// Aplana los centros estereoquímicos de cada estructura.
pub struct RemoveStereochemistry {
    descriptor: StepDescriptor,
}

impl RemoveStereochemistry {
    pub const NAME: &'static str = "remove_stereochemistry";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 3)
                .with_issue("compound failed to be flattened")
                .with_note("compound flattened")
                .validated()?,
        })
    }
}

impl CurationStep for RemoveStereochemistry {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        replacement_or_flag(engine.remove_stereochemistry(record.structure()))
    }
}
