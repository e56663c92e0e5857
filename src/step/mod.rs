//! Steps de curación: la unidad polimórfica de trabajo del workflow.
//!
//! Un step declara su identidad (nombre estable, rank, dependencias) y sus
//! textos de issue/nota, y aporta un hook por-record (`run`). El loop
//! compartido (`apply`) aplica el contrato común a ambas variantes:
//! records fallados se saltean siempre, un Filter sólo puede flagear, un
//! Update puede reemplazar estructura/label o flagear cuando el engine
//! falla. Los conteos devueltos son exactos respecto de la ejecución
//! secuencial.

pub mod dependency;
pub mod registry;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::PLACEHOLDER_TEXT;
use crate::engine::{Structure, StructureEngine};
use crate::errors::StepError;
use crate::record::{Label, Record};

pub use dependency::DependencyExpr;
pub use registry::{StepRegistry, REGISTRY};

/// Variante del step: filtrar (sólo issues) o actualizar (issues o notas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    Filter,
    Update,
}

/// Resultado del hook por-record.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// El record pasa sin cambios.
    Pass,
    /// El record falla este step; se flagea con el issue del step.
    Flag,
    /// Reemplazo de estructura (sólo Update).
    Structure(Structure),
    /// Reemplazo de label (sólo Update).
    Label { value: Option<Label>, force: bool },
}

/// Metadata de identidad de un step. Se valida en construcción: un step
/// mal declarado nunca entra a un workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    pub name: String,
    pub kind: StepKind,
    /// Convención de autoría (menor corre antes); el orden real es el de la
    /// lista del workflow.
    pub rank: u32,
    issue_text: Option<String>,
    note_text: Option<String>,
    dependency: Vec<DependencyExpr>,
}

impl StepDescriptor {
    pub fn new(name: impl Into<String>, kind: StepKind, rank: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            rank,
            issue_text: None,
            note_text: None,
            dependency: Vec::new(),
        }
    }

    pub fn with_issue(mut self, text: impl Into<String>) -> Self {
        self.issue_text = Some(text.into());
        self
    }

    pub fn with_note(mut self, text: impl Into<String>) -> Self {
        self.note_text = Some(text.into());
        self
    }

    pub fn with_dependency(mut self, expr: impl Into<String>) -> Self {
        self.dependency.push(DependencyExpr::new(expr));
        self
    }

    /// Validación explícita de construcción. Textos vacíos cuentan como
    /// ausentes.
    pub fn validated(mut self) -> Result<Self, StepError> {
        if matches!(self.issue_text.as_deref(), Some("")) {
            self.issue_text = None;
        }
        if matches!(self.note_text.as_deref(), Some("")) {
            self.note_text = None;
        }
        if self.issue_text.is_none() && self.note_text.is_none() {
            return Err(StepError::MissingText(self.name.clone()));
        }
        if self.kind == StepKind::Filter && self.note_text.is_some() {
            return Err(StepError::FilterWithNote(self.name.clone()));
        }
        Ok(self)
    }

    pub fn issue_text(&self) -> Option<&str> {
        self.issue_text.as_deref()
    }

    pub fn note_text(&self) -> Option<&str> {
        self.note_text.as_deref()
    }

    pub fn dependency(&self) -> &[DependencyExpr] {
        &self.dependency
    }

    /// True si alguno de los textos quedó en el placeholder genérico; el
    /// workflow lo reporta como diagnóstico, no como error.
    pub fn has_placeholder_text(&self) -> bool {
        self.issue_text.as_deref() == Some(PLACEHOLDER_TEXT)
            || self.note_text.as_deref() == Some(PLACEHOLDER_TEXT)
    }

    /// Expresiones de dependencia no satisfechas por los nombres de steps
    /// ya agendados antes que éste. Cada expresión puede ser un grupo OR;
    /// todas deben satisfacerse de forma independiente.
    pub fn missing_dependencies(&self, preceding: &[&str]) -> Vec<DependencyExpr> {
        self.dependency
            .iter()
            .filter(|expr| !expr.satisfied_by(preceding))
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for dyn CurationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurationStep")
            .field("descriptor", self.descriptor())
            .finish_non_exhaustive()
    }
}

/// Unidad de trabajo del workflow.
pub trait CurationStep: Send + Sync {
    fn descriptor(&self) -> &StepDescriptor;

    /// Argumentos de constructor para la persistencia del workflow. Deben
    /// bastar para reconstruir el step vía registry.
    fn params(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }

    /// Hook por-record. Los fallos del engine deben convertirse en
    /// `StepOutcome::Flag`, nunca propagarse.
    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome;

    /// Aplica el step a todo el batch y devuelve `(notas, issues)`.
    fn apply(&self, records: &mut [Record], engine: &dyn StructureEngine) -> (usize, usize) {
        let descriptor = self.descriptor();
        let mut notes = 0;
        let mut issues = 0;
        for record in records.iter_mut() {
            if record.failed() {
                continue;
            }
            match self.run(record, engine) {
                StepOutcome::Pass => {}
                StepOutcome::Flag => {
                    record.flag_issue(descriptor.issue_text().unwrap_or("curation step failed"));
                    issues += 1;
                }
                StepOutcome::Structure(replacement) if descriptor.kind == StepKind::Update => {
                    let note = descriptor.note_text().unwrap_or_default();
                    match record.update_structure(replacement, note) {
                        Ok(true) => notes += 1,
                        Ok(false) => {}
                        Err(_) => {
                            // el step devolvió un reemplazo inválido: se
                            // trata como fallo del step sobre ese record
                            record.flag_issue(
                                descriptor.issue_text().unwrap_or("curation step failed"),
                            );
                            issues += 1;
                        }
                    }
                }
                StepOutcome::Label { value, force } if descriptor.kind == StepKind::Update => {
                    let note = descriptor.note_text().unwrap_or_default();
                    if record.update_label(value, note, force) {
                        notes += 1;
                    }
                }
                // un Filter no puede mutar: cualquier reemplazo que devuelva
                // se descarta sin tocar el record
                StepOutcome::Structure(_) | StepOutcome::Label { .. } => {}
            }
        }
        (notes, issues)
    }
}
