//! Steps de manejo de hidrógenos explícitos.

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

use super::replacement_or_flag;

/// Elimina los hidrógenos explícitos que el engine considera redundantes.
pub struct RemoveExplicitHydrogens {
    descriptor: StepDescriptor,
}

impl RemoveExplicitHydrogens {
    pub const NAME: &'static str = "remove_explicit_hydrogens";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 3)
                .with_issue("failed to remove explicit hydrogen atoms")
                .with_note("removed explicit hydrogen atoms")
                .validated()?,
        })
    }
}

impl CurationStep for RemoveExplicitHydrogens {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        replacement_or_flag(engine.remove_explicit_hydrogens(record.structure()))
    }
}

/// Variante agresiva: elimina todos los hidrógenos explícitos, incluso los
/// que portan información (isótopos, fragmentos [H] sueltos).
pub struct RemoveAllHydrogens {
    descriptor: StepDescriptor,
}

impl RemoveAllHydrogens {
    pub const NAME: &'static str = "remove_all_hydrogens";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 3)
                .with_issue("failed to remove all explicit hydrogen atoms")
                .with_note("removed all explicit hydrogen atoms")
                .validated()?,
        })
    }
}

impl CurationStep for RemoveAllHydrogens {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        replacement_or_flag(engine.remove_all_hydrogens(record.structure()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextEngine;

    #[test]
    fn test_remove_all_drops_loose_h_fragment() {
        let engine = TextEngine::new();
        let step = RemoveAllHydrogens::new().unwrap();
        let mut records = vec![Record::from_raw(0, "CCCCCC.[H]", &engine, false)];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (1, 0));
        assert_eq!(records[0].structure().as_text(), "CCCCCC");
    }

    #[test]
    fn test_remove_all_flags_pure_hydrogen() {
        let engine = TextEngine::new();
        let step = RemoveAllHydrogens::new().unwrap();
        let mut records = vec![Record::from_raw(0, "[H]", &engine, false)];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (0, 1));
        assert!(!records[0].passing());
    }
}
