//! Filtro de compuestos con boro.

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

/// Flagea estructuras que contengan al menos un átomo de boro.
pub struct FlagBoron {
    descriptor: StepDescriptor,
}

impl FlagBoron {
    pub const NAME: &'static str = "flag_boron";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Filter, 4)
                .with_issue("compound has boron")
                .validated()?,
        })
    }
}

impl CurationStep for FlagBoron {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        if engine.contains_element(record.structure(), "B") {
            StepOutcome::Flag
        } else {
            StepOutcome::Pass
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextEngine;

    #[test]
    fn test_flag_boron_ignores_bromine() {
        let engine = TextEngine::new();
        let step = FlagBoron::new().unwrap();
        let mut records = vec![
            Record::from_raw(0, "CB(O)O", &engine, false),
            Record::from_raw(1, "CCBr", &engine, false),
        ];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (0, 1));
        assert!(!records[0].passing());
        assert!(records[1].passing());
    }
}
