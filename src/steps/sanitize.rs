//! Step de sanitización.

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

use super::replacement_or_flag;

/// Re-canonicaliza cada estructura con el engine; flagea las que quedaron
/// ilegibles.
pub struct SanitizeStructure {
    descriptor: StepDescriptor,
}

impl SanitizeStructure {
    pub const NAME: &'static str = "sanitize_structure";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 3)
                .with_issue("compound failed to be sanitized")
                .with_note("compound sanitized")
                .validated()?,
        })
    }
}

impl CurationStep for SanitizeStructure {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        replacement_or_flag(engine.sanitize(record.structure()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextEngine;

    #[test]
    fn test_sanitize_is_noop_on_canonical_input() {
        let engine = TextEngine::new();
        let step = SanitizeStructure::new().unwrap();
        let mut records = vec![Record::from_raw(0, "CCO", &engine, false)];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (0, 0));
    }
}
