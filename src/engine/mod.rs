//! Frontera con el motor químico externo.
//!
//! El núcleo de curación nunca inspecciona el contenido de una estructura:
//! sólo la transporta como handle opaco (`Structure`) y delega toda
//! transformación química en un `StructureEngine`. Esto replica la relación
//! provider/trait del resto del stack: el motor se registra por nombre y
//! versión y los steps lo reciben en tiempo de ejecución.

pub mod text_engine;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use text_engine::TextEngine;

use crate::hashing::hash_bytes;

/// Handle opaco a una estructura química. Internamente guarda la forma
/// canónica que produjo el engine; el núcleo sólo la usa como bytes para
/// fingerprinting y como texto para exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Structure {
    canonical: String,
}

impl Structure {
    /// Centinela inválido: estructura vacía. Lo produce la carga cuando el
    /// engine no pudo interpretar la entrada.
    pub fn invalid() -> Self {
        Self { canonical: String::new() }
    }

    /// Construye un handle a partir de la forma canónica emitida por un
    /// engine. Sólo los engines deberían llamarlo.
    pub(crate) fn from_canonical(canonical: String) -> Self {
        Self { canonical }
    }

    /// Una estructura sin átomos (o el centinela inválido).
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Forma textual canónica.
    pub fn as_text(&self) -> &str {
        &self.canonical
    }

    /// Serialización binaria canónica, insumo exclusivo del fingerprint.
    pub fn to_binary(&self) -> &[u8] {
        self.canonical.as_bytes()
    }
}

/// Fingerprint determinista de una estructura: hash de su serialización
/// canónica. Función pura y libre de estado; cada entidad que necesita
/// detección de cambios la compone por campo, no por herencia.
pub fn fingerprint(structure: &Structure) -> String {
    hash_bytes(structure.to_binary())
}

/// Fallos reportados por el engine. Los steps deben convertirlos en
/// `flag_issue` sobre el record afectado, nunca dejarlos propagar al run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine could not parse input '{0}'")]
    Parse(String),
    #[error("structure operation '{op}' failed: {reason}")]
    Operation { op: &'static str, reason: String },
}

/// Capacidad química externa, inyectada como colaborador del workflow.
///
/// Todas las operaciones son síncronas y puras respecto al handle recibido.
pub trait StructureEngine: Send + Sync {
    /// Nombre estable del engine, para reportes.
    fn name(&self) -> &str;
    /// Versión del engine, para reportes.
    fn version(&self) -> &str;

    /// Interpreta una representación textual. Entrada vacía o ilegible es
    /// un `EngineError::Parse`.
    fn parse(&self, raw: &str) -> Result<Structure, EngineError>;
    /// Serializa el handle de vuelta a texto.
    fn serialize(&self, structure: &Structure) -> String;

    /// Re-canonicaliza una estructura, fallando si quedó ilegible.
    fn sanitize(&self, structure: &Structure) -> Result<Structure, EngineError>;
    /// Elimina centros estereoquímicos.
    fn remove_stereochemistry(&self, structure: &Structure) -> Result<Structure, EngineError>;
    /// Remueve cargas formales.
    fn neutralize_charges(&self, structure: &Structure) -> Result<Structure, EngineError>;
    /// Remueve especificaciones de hidrógeno explícito redundantes.
    fn remove_explicit_hydrogens(&self, structure: &Structure) -> Result<Structure, EngineError>;
    /// Remueve todos los hidrógenos explícitos, incluidos los requeridos.
    fn remove_all_hydrogens(&self, structure: &Structure) -> Result<Structure, EngineError>;

    /// Cantidad de fragmentos desconectados.
    fn fragment_count(&self, structure: &Structure) -> usize;
    /// Fragmento de mayor cantidad de átomos pesados.
    fn largest_fragment(&self, structure: &Structure) -> Result<Structure, EngineError>;

    /// True si la estructura contiene el elemento dado.
    fn contains_element(&self, structure: &Structure, symbol: &str) -> bool;
    /// True si contiene átomos fuera del conjunto orgánico permitido.
    fn has_foreign_atoms(&self, structure: &Structure) -> bool;
    /// Peso molecular aproximado (átomos pesados + H explícitos).
    fn molecular_weight(&self, structure: &Structure) -> Result<f64, EngineError>;
}
