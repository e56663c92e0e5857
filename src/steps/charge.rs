//! Neutralización de cargas formales.

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

use super::replacement_or_flag;

/// Lleva los átomos cargados a su forma neutra ajustando hidrógenos.
pub struct NeutralizeCharges {
    descriptor: StepDescriptor,
}

impl NeutralizeCharges {
    pub const NAME: &'static str = "neutralize_charges";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 3)
                .with_issue("compound failed to be neutralized")
                .with_note("compound neutralized")
                .validated()?,
        })
    }
}

impl CurationStep for NeutralizeCharges {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        replacement_or_flag(engine.neutralize_charges(record.structure()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextEngine;

    #[test]
    fn test_neutralize_salt_pair() {
        let engine = TextEngine::new();
        let step = NeutralizeCharges::new().unwrap();
        let mut records = vec![
            Record::from_raw(0, "[NH4+].[Cl-]", &engine, false),
            Record::from_raw(1, "CCO", &engine, false),
        ];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (1, 0));
        assert_eq!(records[0].structure().as_text(), "Cl.N");
        assert_eq!(records[0].notes().len(), 1);
        assert!(records[1].notes().is_empty());
    }
}
