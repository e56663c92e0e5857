//! chemcurate: motor de workflows de curación de estructuras químicas.
//!
//! La librería expone las piezas del pipeline:
//! - `record` para el estado de cada estructura bajo curación.
//! - `step` y `steps` para el contrato Filter/Update y el catálogo incluido.
//! - `workflow` para el secuenciador, sus diagnósticos y su persistencia.
//! - `curated` para el resultado agregado y sus exports.
//! - `engine` para la frontera con la capacidad química (con un engine de
//!   texto incluido).
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;
pub mod constants;
pub mod curated;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod record;
pub mod step;
pub mod steps;
pub mod workflow;

pub use curated::{CuratedSet, ExportRow, SaveDocument};
pub use engine::{fingerprint, EngineError, Structure, StructureEngine, TextEngine};
pub use errors::{RecordError, SaveError, StepError, WorkflowFormatError};
pub use record::{CurationStatus, Label, Record, RecordId};
pub use step::{CurationStep, DependencyExpr, StepDescriptor, StepKind, StepOutcome, REGISTRY};
pub use workflow::{Diagnostic, Workflow, WorkflowDocument, WorkflowMetadata};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_errors_render() {
        let e = RecordError::InvalidStructure("".into()).to_string();
        assert!(e.contains("replacement structure is invalid"));
    }

    #[test]
    fn test_registry_is_populated() {
        assert!(REGISTRY.contains("remove_stereochemistry"));
    }
}
