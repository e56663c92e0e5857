//! Workflow de curación: secuencia ordenada de steps sobre un batch de
//! records.
//!
//! La construcción valida el orden (Update después de Filter) y las
//! dependencias declaradas; ambos producen diagnósticos estructurados, no
//! errores. El run es estrictamente secuencial: cada step procesa el batch
//! completo y registra sus conteos y su duración antes de que arranque el
//! siguiente.

pub mod persist;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::CONFIG;
use crate::constants::{LOADING_STAGE, NA};
use crate::curated::CuratedSet;
use crate::engine::StructureEngine;
use crate::hashing::hash_str;
use crate::record::Record;
use crate::step::{CurationStep, DependencyExpr, StepKind};

pub use persist::WorkflowDocument;

/// Metadata descriptiva del workflow; viaja en el documento persistido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowMetadata {
    pub name: String,
    pub description: String,
    pub repo_url: String,
}

impl Default for WorkflowMetadata {
    fn default() -> Self {
        Self {
            name: NA.to_string(),
            description: NA.to_string(),
            repo_url: NA.to_string(),
        }
    }
}

/// Diagnóstico advisory emitido durante la construcción del workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Un Update agendado después de un Filter puede invalidar el filtro.
    UpdateAfterFilter { step: String },
    /// Una expresión de dependencia no queda satisfecha por ningún step
    /// anterior.
    MissingDependency { step: String, expr: DependencyExpr },
    /// El step quedó con el texto placeholder genérico.
    PlaceholderText { step: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UpdateAfterFilter { step } => write!(
                f,
                "update step '{step}' comes after a filter step; updating \
                 records after filtering could cause the end result to \
                 violate the filter"
            ),
            Diagnostic::MissingDependency { step, expr } => write!(
                f,
                "step '{step}' declares dependency '{expr}' not satisfied by \
                 any earlier step"
            ),
            Diagnostic::PlaceholderText { step } => {
                write!(f, "step '{step}' uses placeholder issue/note text")
            }
        }
    }
}

pub struct Workflow {
    steps: Vec<Box<dyn CurationStep>>,
    metadata: WorkflowMetadata,
    engine: Arc<dyn StructureEngine>,
    track_history: bool,
    diagnostics: Vec<Diagnostic>,
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("steps", &self.steps.len())
            .field("metadata", &self.metadata)
            .field("track_history", &self.track_history)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

impl Workflow {
    pub fn new(steps: Vec<Box<dyn CurationStep>>, engine: Arc<dyn StructureEngine>) -> Self {
        Self::with_options(
            steps,
            engine,
            WorkflowMetadata::default(),
            CONFIG.track_history,
            CONFIG.suppress_warnings,
        )
    }

    pub fn with_options(
        steps: Vec<Box<dyn CurationStep>>,
        engine: Arc<dyn StructureEngine>,
        metadata: WorkflowMetadata,
        track_history: bool,
        suppress_warnings: bool,
    ) -> Self {
        let diagnostics = Self::check_steps(&steps);
        if !suppress_warnings {
            for diagnostic in &diagnostics {
                tracing::warn!(workflow = %metadata.name, "{diagnostic}");
            }
        }
        Self {
            steps,
            metadata,
            engine,
            track_history,
            diagnostics,
        }
    }

    /// Chequeos de construcción: orden Filter/Update, dependencias
    /// declaradas, textos placeholder. Ninguno es fatal.
    fn check_steps(steps: &[Box<dyn CurationStep>]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut seen_filter = false;
        for (i, step) in steps.iter().enumerate() {
            let descriptor = step.descriptor();
            match descriptor.kind {
                StepKind::Filter => seen_filter = true,
                StepKind::Update => {
                    if seen_filter {
                        diagnostics.push(Diagnostic::UpdateAfterFilter {
                            step: descriptor.name.clone(),
                        });
                    }
                }
            }
            let preceding: Vec<&str> = steps[..i]
                .iter()
                .map(|s| s.descriptor().name.as_str())
                .collect();
            for expr in descriptor.missing_dependencies(&preceding) {
                diagnostics.push(Diagnostic::MissingDependency {
                    step: descriptor.name.clone(),
                    expr,
                });
            }
            if descriptor.has_placeholder_text() {
                diagnostics.push(Diagnostic::PlaceholderText {
                    step: descriptor.name.clone(),
                });
            }
        }
        diagnostics
    }

    pub fn steps(&self) -> &[Box<dyn CurationStep>] {
        &self.steps
    }

    pub fn metadata(&self) -> &WorkflowMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: WorkflowMetadata) {
        self.metadata = metadata;
    }

    pub fn engine(&self) -> &dyn StructureEngine {
        self.engine.as_ref()
    }

    pub fn track_history(&self) -> bool {
        self.track_history
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Hash estable de la cadena de identidad; identifica el pipeline, no
    /// sus parámetros.
    pub fn identity_hash(&self) -> String {
        hash_str(&self.to_string())
    }

    /// Punto de entrada principal: corre los records por todos los steps en
    /// orden de lista. El índice 0 de los conteos corresponde a la carga.
    pub fn run(&self, mut records: Vec<Record>, source: &str) -> CuratedSet<'_> {
        let mut timings = vec![Duration::ZERO];
        let mut num_issues = vec![records.iter().filter(|r| r.failed()).count()];
        let mut num_notes = vec![0usize];

        for step in &self.steps {
            let started = Instant::now();
            let (notes, issues) = step.apply(&mut records, self.engine.as_ref());
            timings.push(started.elapsed());
            num_issues.push(issues);
            num_notes.push(notes);
            tracing::debug!(
                step = %step.descriptor().name,
                notes,
                issues,
                "curation step applied"
            );
        }

        CuratedSet::new(self, records, num_issues, num_notes, timings, source)
    }

    /// Interpreta entradas de texto crudo con el engine del workflow y las
    /// corre. Los ids son el índice de cada entrada.
    pub fn curate_texts<S: AsRef<str>>(&self, raw: &[S]) -> CuratedSet<'_> {
        let records = raw
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Record::from_raw(i as i64, text.as_ref(), self.engine.as_ref(), self.track_history)
            })
            .collect();
        self.run(records, "list of structures")
    }
}

/// Cadena de identidad: marcador de carga seguido de los nombres de steps,
/// unidos por ' -> '.
impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LOADING_STAGE}")?;
        for step in &self.steps {
            write!(f, " -> {}", step.descriptor().name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextEngine;
    use crate::steps::{FlagInorganic, RemoveStereochemistry};

    fn engine() -> Arc<dyn StructureEngine> {
        Arc::new(TextEngine::new())
    }

    fn quiet(steps: Vec<Box<dyn CurationStep>>) -> Workflow {
        Workflow::with_options(steps, engine(), WorkflowMetadata::default(), false, true)
    }

    #[test]
    fn test_identity_string() {
        let workflow = quiet(vec![
            Box::new(RemoveStereochemistry::new().unwrap()),
            Box::new(FlagInorganic::new().unwrap()),
        ]);
        assert_eq!(
            workflow.to_string(),
            "StructureLoading -> remove_stereochemistry -> flag_inorganic"
        );
        assert_eq!(workflow.identity_hash().len(), 64);
    }

    #[test]
    fn test_filter_then_update_warns_once() {
        let workflow = quiet(vec![
            Box::new(FlagInorganic::new().unwrap()),
            Box::new(RemoveStereochemistry::new().unwrap()),
        ]);
        let ordering: Vec<_> = workflow
            .diagnostics()
            .iter()
            .filter(|d| matches!(d, Diagnostic::UpdateAfterFilter { .. }))
            .collect();
        assert_eq!(ordering.len(), 1);
    }

    #[test]
    fn test_update_then_filter_is_clean() {
        let workflow = quiet(vec![
            Box::new(RemoveStereochemistry::new().unwrap()),
            Box::new(FlagInorganic::new().unwrap()),
        ]);
        assert!(workflow.diagnostics().is_empty());
    }

    #[test]
    fn test_missing_dependency_is_advisory() {
        use crate::steps::FlagMixtures;

        let workflow = quiet(vec![Box::new(FlagMixtures::new().unwrap())]);
        assert!(workflow
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingDependency { .. })));

        // con un step del grupo OR adelante no hay diagnóstico
        use crate::steps::RemoveExplicitHydrogens;
        let workflow = quiet(vec![
            Box::new(RemoveExplicitHydrogens::new().unwrap()),
            Box::new(FlagMixtures::new().unwrap()),
        ]);
        assert!(workflow
            .diagnostics()
            .iter()
            .all(|d| !matches!(d, Diagnostic::MissingDependency { .. })));
    }
}
