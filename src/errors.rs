//! Errores del motor de curación, separados por fase: construcción de steps,
//! formato de workflow, operación sobre records.

use thiserror::Error;

/// Errores de construcción de un step. Son fatales e inmediatos: un step
/// mal declarado nunca llega a formar parte de un workflow.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("curation step '{0}' declares neither issue nor note text")]
    MissingText(String),
    #[error("filter step '{0}' must not declare note text")]
    FilterWithNote(String),
    #[error("curation step '{0}': {1}")]
    InvalidParameter(String, String),
    #[error("curation step '{step}': malformed constructor arguments: {source}")]
    BadArguments {
        step: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errores de las dos operaciones sancionadas sobre un `Record`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// El reemplazo es el centinela inválido o una estructura vacía. Los
    /// steps deben flagear un issue en lugar de propagar estructuras
    /// inválidas al record.
    #[error("replacement structure is invalid ('{0}'); curation steps must flag an issue instead")]
    InvalidStructure(String),
}

/// Errores al cargar o guardar el documento persistido de un workflow.
/// Fatales para la operación de carga, recuperables por el caller.
#[derive(Debug, Error)]
pub enum WorkflowFormatError {
    #[error("could not find curation step '{0}' in the registry")]
    UnknownStep(String),
    #[error("steps and positions do not match: expected contiguous 0..{expected}, found {found}")]
    PositionMismatch { expected: usize, found: String },
    #[error(transparent)]
    Step(#[from] StepError),
    #[error("workflow document error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("workflow file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errores al guardar o recargar el documento completo de resultados.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("unsupported save format version {0}")]
    UnsupportedVersion(u32),
    #[error("save document error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("save file error: {0}")]
    Io(#[from] std::io::Error),
}
