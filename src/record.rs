//! Record de curación: identidad, estructura, label y proveniencia.
//!
//! El record es la unidad que atraviesa el pipeline. Su máquina de estados
//! es deliberadamente chica:
//!
//! - `Loaded -> {Passing, Failed}` según el engine pueda o no interpretar la
//!   entrada.
//! - `Passing --update(sin cambio)--> Passing` (no-op, sin nota).
//! - `Passing --update(cambio)--> Passing` (nota agregada).
//! - `Passing --flag--> Failed` (terminal: ningún step vuelve a tocarlo).
//!
//! La detección de cambios es exacta y barata: se compara el fingerprint
//! cacheado contra el del reemplazo, nunca el contenido.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::PARSE_FAILURE_ISSUE;
use crate::engine::{fingerprint, Structure, StructureEngine};
use crate::errors::RecordError;

/// Identificador opaco de un record. La unicidad no se exige: es un dato
/// del usuario para seguir sus compuestos, no una clave del motor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{i}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

/// Valor escalar del label. La distinción de variantes participa en la
/// detección de cambios: mismo valor con otro tipo cuenta como cambio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(i) => write!(f, "{i}"),
            Label::Float(v) => write!(f, "{v}"),
            Label::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Estado etiquetado del record: o sigue en carrera o falló con su único
/// issue. Hace irrepresentable el estado ilegal "failed sin issue".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurationStatus {
    Passing,
    Failed { issue: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    structure: Structure,
    label: Option<Label>,
    status: CurationStatus,
    notes: Vec<String>,
    track_history: bool,
    structure_history: Vec<Structure>,
    label_history: Vec<Option<Label>>,
    content_fingerprint: String,
}

impl Record {
    /// Crea un record a partir de una estructura ya interpretada. `None` o
    /// una estructura vacía se sustituyen por el centinela inválido y el
    /// record nace fallado con el issue de parseo.
    pub fn new(id: impl Into<RecordId>, structure: Option<Structure>, track_history: bool) -> Self {
        let (structure, status) = match structure {
            Some(s) if !s.is_empty() => (s, CurationStatus::Passing),
            _ => (
                Structure::invalid(),
                CurationStatus::Failed { issue: PARSE_FAILURE_ISSUE.to_string() },
            ),
        };
        let content_fingerprint = fingerprint(&structure);
        Self {
            id: id.into(),
            structure,
            label: None,
            status,
            notes: Vec::new(),
            track_history,
            structure_history: Vec::new(),
            label_history: Vec::new(),
            content_fingerprint,
        }
    }

    /// Crea un record interpretando la entrada cruda con el engine dado.
    pub fn from_raw(
        id: impl Into<RecordId>,
        raw: &str,
        engine: &dyn StructureEngine,
        track_history: bool,
    ) -> Self {
        Self::new(id, engine.parse(raw).ok(), track_history)
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn status(&self) -> &CurationStatus {
        &self.status
    }

    pub fn failed(&self) -> bool {
        matches!(self.status, CurationStatus::Failed { .. })
    }

    pub fn passing(&self) -> bool {
        !self.failed()
    }

    /// El único issue del record, si falló.
    pub fn issue(&self) -> Option<&str> {
        match &self.status {
            CurationStatus::Failed { issue } => Some(issue),
            CurationStatus::Passing => None,
        }
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn track_history(&self) -> bool {
        self.track_history
    }

    pub fn structure_history(&self) -> &[Structure] {
        &self.structure_history
    }

    pub fn label_history(&self) -> &[Option<Label>] {
        &self.label_history
    }

    pub fn content_fingerprint(&self) -> &str {
        &self.content_fingerprint
    }

    /// Reemplaza la estructura si el contenido realmente cambió.
    ///
    /// Devuelve `Ok(true)` cuando hubo cambio (nota agregada, fingerprint
    /// actualizado, snapshot tomado si hay historia) y `Ok(false)` en el
    /// no-op idempotente. Un reemplazo inválido/vacío es un error del
    /// caller: el step debería haber flageado un issue.
    pub fn update_structure(&mut self, new: Structure, note: &str) -> Result<bool, RecordError> {
        if new.is_empty() {
            return Err(RecordError::InvalidStructure("empty structure".to_string()));
        }
        let new_fingerprint = fingerprint(&new);
        if new_fingerprint == self.content_fingerprint {
            return Ok(false);
        }
        self.notes.push(note.to_string());
        if self.track_history {
            self.structure_history.push(self.structure.clone());
        }
        self.content_fingerprint = new_fingerprint;
        self.structure = new;
        Ok(true)
    }

    /// Actualiza el label. Una nota se agrega cuando el valor difiere por
    /// valor-o-tipo, o cuando `force` es true; el valor nuevo se asigna
    /// exactamente en esos mismos casos. Sin nota no hay asignación.
    pub fn update_label(&mut self, new: Option<Label>, note: &str, force: bool) -> bool {
        if !force && new == self.label {
            return false;
        }
        self.notes.push(note.to_string());
        if self.track_history {
            self.label_history.push(self.label.clone());
        }
        self.label = new;
        true
    }

    /// Flagea el record con su issue. Escritura única: una vez fallado,
    /// llamadas posteriores son no-ops.
    pub fn flag_issue(&mut self, issue: &str) {
        if let CurationStatus::Passing = self.status {
            self.status = CurationStatus::Failed { issue: issue.to_string() };
        }
    }
}
