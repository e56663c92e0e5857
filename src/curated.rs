//! Resultado agregado de una corrida de curación.
//!
//! `CuratedSet` envuelve los records finales junto a los tres arreglos
//! paralelos de la corrida (issues, notas, duraciones) y deriva de ellos el
//! conteo de sobrevivientes después de cada step. Los usuarios no lo
//! construyen directamente; lo devuelve `Workflow::run`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{PASSED, SAVE_FORMAT_VERSION};
use crate::errors::SaveError;
use crate::record::{Label, Record, RecordId};
use crate::step::StepKind;
use crate::workflow::{Workflow, WorkflowDocument};

/// Fila del export tabular. Las columnas opcionales se omiten del JSON
/// cuando no se pidieron.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub id: RecordId,
    pub structure: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

pub struct CuratedSet<'wf> {
    workflow: &'wf Workflow,
    records: Vec<Record>,
    num_issues: Vec<usize>,
    num_notes: Vec<usize>,
    timings: Vec<Duration>,
    remaining: Vec<usize>,
    run_id: Uuid,
    source: String,
}

impl<'wf> CuratedSet<'wf> {
    /// Sólo `Workflow::run` debería construir esto; los arreglos paralelos
    /// traen la entrada de carga en el índice 0.
    pub(crate) fn new(
        workflow: &'wf Workflow,
        records: Vec<Record>,
        num_issues: Vec<usize>,
        num_notes: Vec<usize>,
        timings: Vec<Duration>,
        source: &str,
    ) -> Self {
        let steps = workflow.steps().len();
        assert_eq!(num_issues.len(), steps + 1);
        assert_eq!(num_notes.len(), steps + 1);
        assert_eq!(timings.len(), steps + 1);

        let mut remaining = vec![records.len()];
        for issues in &num_issues {
            let last = remaining[remaining.len() - 1];
            remaining.push(last - issues);
        }
        assert_eq!(remaining.len(), steps + 2);

        Self {
            workflow,
            records,
            num_issues,
            num_notes,
            timings,
            remaining,
            run_id: Uuid::new_v4(),
            source: source.to_string(),
        }
    }

    pub fn workflow(&self) -> &Workflow {
        self.workflow
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Sobrevivientes después de cada etapa; índice 0 es la carga cruda,
    /// índice 1 lo que sobrevivió al parseo.
    pub fn remaining(&self) -> &[usize] {
        &self.remaining
    }

    pub fn num_issues(&self) -> &[usize] {
        &self.num_issues
    }

    pub fn num_notes(&self) -> &[usize] {
        &self.num_notes
    }

    pub fn timings(&self) -> &[Duration] {
        &self.timings
    }

    pub fn total_elapsed(&self) -> Duration {
        self.timings.iter().sum()
    }

    /// Máscara booleana en el orden de entrada: true para los records que
    /// siguen pasando.
    pub fn get_passing_mask(&self) -> Vec<bool> {
        self.records.iter().map(Record::passing).collect()
    }

    /// Índices de los steps con un nombre dado, en orden de corrida.
    fn positions_of(&self, name: &str) -> Vec<usize> {
        self.workflow
            .steps()
            .iter()
            .enumerate()
            .filter(|(_, step)| step.descriptor().name == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Issues causados en una etapa por índice (0 es la carga).
    pub fn num_issues_at_step(&self, idx: usize) -> Option<usize> {
        self.num_issues.get(idx).copied()
    }

    /// Issues causados por cada ocurrencia del step nombrado.
    pub fn num_issues_for_step(&self, name: &str) -> Vec<usize> {
        self.positions_of(name)
            .into_iter()
            .map(|i| self.num_issues[i + 1])
            .collect()
    }

    pub fn num_notes_at_step(&self, idx: usize) -> Option<usize> {
        self.num_notes.get(idx).copied()
    }

    pub fn num_notes_for_step(&self, name: &str) -> Vec<usize> {
        self.positions_of(name)
            .into_iter()
            .map(|i| self.num_notes[i + 1])
            .collect()
    }

    /// Records que pasan después de una etapa por índice (0 es la carga).
    pub fn remaining_after_step(&self, idx: usize) -> Option<usize> {
        self.remaining.get(idx + 1).copied()
    }

    pub fn remaining_for_step(&self, name: &str) -> Vec<usize> {
        self.positions_of(name)
            .into_iter()
            .map(|i| self.remaining[i + 2])
            .collect()
    }

    fn exported<'a>(&'a self, include_failed: bool) -> impl Iterator<Item = &'a Record> {
        self.records
            .iter()
            .filter(move |record| include_failed || record.passing())
    }

    /// Vista tabular con columnas opcionales de issue y notas.
    pub fn rows(
        &self,
        include_issues: bool,
        include_notes: bool,
        include_failed: bool,
    ) -> Vec<ExportRow> {
        self.exported(include_failed)
            .map(|record| ExportRow {
                id: record.id.clone(),
                structure: self.workflow.engine().serialize(record.structure()),
                issue: include_issues
                    .then(|| record.issue().unwrap_or(PASSED).to_string()),
                notes: include_notes.then(|| record.notes().to_vec()),
            })
            .collect()
    }

    /// Formas serializadas de las estructuras curadas.
    pub fn texts(&self, include_failed: bool) -> Vec<String> {
        self.exported(include_failed)
            .map(|record| self.workflow.engine().serialize(record.structure()))
            .collect()
    }

    pub fn ids(&self, include_failed: bool) -> Vec<RecordId> {
        self.exported(include_failed)
            .map(|record| record.id.clone())
            .collect()
    }

    pub fn labels(&self, include_failed: bool) -> Vec<Option<Label>> {
        self.exported(include_failed)
            .map(|record| record.label().cloned())
            .collect()
    }

    /// Reporte legible de la corrida: identidad del workflow, conteos por
    /// step y resumen final.
    pub fn report_string(&self) -> String {
        let mut report = String::new();
        report.push_str("chemcurate curation report\n");
        report.push_str(&format!(
            "Report generated on {}\n",
            Local::now().format("%H:%M:%S, %B %d, %Y")
        ));
        report.push_str(&format!(
            "Engine: {} {}\n\n",
            self.workflow.engine().name(),
            self.workflow.engine().version()
        ));
        report.push_str(&format!("Using workflow {}\n", self.workflow));
        report.push_str(&format!("Workflow hash: {}\n", self.workflow.identity_hash()));
        report.push_str(&format!("Run id: {}\n\n", self.run_id));
        report.push_str(&format!(
            "Loaded {} records from '{}' for curation\n",
            self.remaining[0], self.source
        ));

        for (i, step) in self.workflow.steps().iter().enumerate() {
            let descriptor = step.descriptor();
            let issues = self.num_issues[i + 1];
            let notes = self.num_notes[i + 1];
            let remaining = self.remaining[i + 2];
            match descriptor.kind {
                StepKind::Filter => report.push_str(&format!(
                    "Curation Step {i}: {}; Flagged {issues} records with \
                     issues; {remaining} records remaining\n",
                    descriptor.name
                )),
                StepKind::Update => report.push_str(&format!(
                    "Curation Step {i}: {}; Updated/altered {notes} records; \
                     Flagged {issues} records with issues; {remaining} \
                     records remaining\n",
                    descriptor.name
                )),
            }
        }

        let total_issues: usize = self.num_issues.iter().sum();
        let total_notes: usize = self.num_notes.iter().sum();
        report.push_str(&format!(
            "\nCompleted workflow in {:.3} seconds\n",
            self.total_elapsed().as_secs_f64()
        ));
        report.push_str(&format!("REMOVED {total_issues}\n"));
        if total_notes > 0 {
            report.push_str(&format!("ALTERED {total_notes}\n"));
        }
        report.push_str(&format!(
            "FINAL RECORD COUNT: {}\n",
            self.remaining[self.remaining.len() - 1]
        ));
        report
    }

    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        fs::write(path, self.report_string())?;
        Ok(())
    }

    /// Una línea por record: id, estructura, issue o "PASSED", notas;
    /// separado por tabs.
    pub fn save_as_txt(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&format!(
                "{}\t{}\t{}",
                record.id,
                self.workflow.engine().serialize(record.structure()),
                record.issue().unwrap_or(PASSED)
            ));
            for note in record.notes() {
                out.push('\t');
                out.push_str(note);
            }
            out.push('\n');
        }
        fs::write(path, out)?;
        Ok(())
    }

    /// Lista JSON pretty-printed con id, estructura, issue y notas por
    /// record.
    pub fn save_as_json(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let rows = self.rows(true, true, true);
        fs::write(path, serde_json::to_string_pretty(&rows)?)?;
        Ok(())
    }

    /// Documento autocontenido con el workflow, todos los records (historia
    /// incluida si se trackeó) y las estadísticas de la corrida. Es la
    /// forma más completa y pesada de guardar los resultados.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let document = SaveDocument {
            version: SAVE_FORMAT_VERSION,
            run_id: self.run_id,
            source: self.source.clone(),
            identity: self.workflow.to_string(),
            identity_hash: self.workflow.identity_hash(),
            workflow: WorkflowDocument::from_workflow(self.workflow),
            num_issues: self.num_issues.clone(),
            num_notes: self.num_notes.clone(),
            timings_secs: self.timings.iter().map(Duration::as_secs_f64).collect(),
            records: self.records.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }
}

/// Forma persistida completa de una corrida.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDocument {
    pub version: u32,
    pub run_id: Uuid,
    pub source: String,
    pub identity: String,
    pub identity_hash: String,
    pub workflow: WorkflowDocument,
    pub num_issues: Vec<usize>,
    pub num_notes: Vec<usize>,
    pub timings_secs: Vec<f64>,
    pub records: Vec<Record>,
}

impl SaveDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let raw = fs::read_to_string(path)?;
        let document: SaveDocument = serde_json::from_str(&raw)?;
        if document.version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion(document.version));
        }
        Ok(document)
    }
}
