//! Catálogo de steps concretos.
//!
//! Cada step envuelve una operación del `StructureEngine` (o del label) y
//! declara sus textos de issue/nota. Los fallos del engine se convierten en
//! `StepOutcome::Flag`; ninguno deja propagar un error al run.

pub mod boron;
pub mod charge;
pub mod hydrogen;
pub mod inorganic;
pub mod label;
pub mod mixture;
pub mod mw;
pub mod sanitize;
pub mod stereochem;

pub use boron::FlagBoron;
pub use charge::NeutralizeCharges;
pub use hydrogen::{RemoveAllHydrogens, RemoveExplicitHydrogens};
pub use inorganic::FlagInorganic;
pub use label::{BinarizeLabel, FillMissingLabel, FlagMissingLabel, MakeLabelNumeric};
pub use mixture::{FlagMixtures, KeepLargestFragment};
pub use mw::FlagMolecularWeight;
pub use sanitize::SanitizeStructure;
pub use stereochem::RemoveStereochemistry;

use crate::engine::{EngineError, Structure};
use crate::step::StepOutcome;

/// Mapea el resultado de una operación del engine al outcome del step:
/// reemplazo válido o flag; los fallos son por-record, nunca fatales al run.
pub(crate) fn replacement_or_flag(result: Result<Structure, EngineError>) -> StepOutcome {
    match result {
        Ok(structure) => StepOutcome::Structure(structure),
        Err(_) => StepOutcome::Flag,
    }
}
