//! Filtro por peso molecular.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::Record;
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

/// Flagea estructuras cuyo peso molecular queda fuera del rango `[min, max]`.
///
/// `max` es opcional: sin cota superior solo se aplica la cota inferior.
pub struct FlagMolecularWeight {
    descriptor: StepDescriptor,
    min: f64,
    max: Option<f64>,
}

#[derive(Deserialize)]
struct MwParams {
    #[serde(default = "default_min")]
    min: f64,
    #[serde(default)]
    max: Option<f64>,
}

fn default_min() -> f64 {
    1.0
}

impl FlagMolecularWeight {
    pub const NAME: &'static str = "flag_molecular_weight";

    pub fn new(min: f64, max: Option<f64>) -> Result<Self, StepError> {
        if min <= 0.0 {
            return Err(StepError::InvalidParameter(
                "min".into(),
                format!("must be positive, got {min}"),
            ));
        }
        if let Some(max) = max {
            if min > max {
                return Err(StepError::InvalidParameter(
                    "max".into(),
                    format!("must be >= min ({min}), got {max}"),
                ));
            }
        }
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Filter, 4)
                .with_issue("molecular weight too big or small")
                .validated()?,
            min,
            max,
        })
    }

    pub fn from_params(params: &Value) -> Result<Self, StepError> {
        let parsed: MwParams =
            serde_json::from_value(params.clone()).map_err(|source| StepError::BadArguments {
                step: Self::NAME.into(),
                source,
            })?;
        Self::new(parsed.min, parsed.max)
    }
}

impl CurationStep for FlagMolecularWeight {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn params(&self) -> Value {
        match self.max {
            Some(max) => json!({ "min": self.min, "max": max }),
            None => json!({ "min": self.min }),
        }
    }

    fn run(&self, record: &Record, engine: &dyn StructureEngine) -> StepOutcome {
        match engine.molecular_weight(record.structure()) {
            Ok(mw) => {
                let too_small = mw < self.min;
                let too_big = self.max.map(|max| mw > max).unwrap_or(false);
                if too_small || too_big {
                    StepOutcome::Flag
                } else {
                    StepOutcome::Pass
                }
            }
            Err(_) => StepOutcome::Flag,
        }
    }
}
