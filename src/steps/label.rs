//! Steps sobre el label asociado a cada registro.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::engine::StructureEngine;
use crate::errors::StepError;
use crate::record::{Label, Record};
use crate::step::{CurationStep, StepDescriptor, StepKind, StepOutcome};

/// Filtro que flagea los registros sin label.
pub struct FlagMissingLabel {
    descriptor: StepDescriptor,
}

impl FlagMissingLabel {
    pub const NAME: &'static str = "flag_missing_label";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Filter, 0)
                .with_issue("label value is missing")
                .validated()?,
        })
    }
}

impl CurationStep for FlagMissingLabel {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, _engine: &dyn StructureEngine) -> StepOutcome {
        if record.label().is_none() {
            StepOutcome::Flag
        } else {
            StepOutcome::Pass
        }
    }
}

/// Rellena los labels ausentes con un valor fijo en vez de descartar.
pub struct FillMissingLabel {
    descriptor: StepDescriptor,
    fill: Label,
}

#[derive(Deserialize)]
struct FillParams {
    fill: Option<Label>,
}

impl FillMissingLabel {
    pub const NAME: &'static str = "fill_missing_label";

    pub fn new(fill: Label) -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 0)
                .with_note("filled missing label value")
                .validated()?,
            fill,
        })
    }

    pub fn from_params(params: &Value) -> Result<Self, StepError> {
        let parsed: FillParams =
            serde_json::from_value(params.clone()).map_err(|source| StepError::BadArguments {
                step: Self::NAME.into(),
                source,
            })?;
        let fill = parsed.fill.ok_or_else(|| {
            StepError::InvalidParameter("fill".into(), "a fill value is required".into())
        })?;
        Self::new(fill)
    }
}

impl CurationStep for FillMissingLabel {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn params(&self) -> Value {
        json!({ "fill": self.fill })
    }

    fn run(&self, record: &Record, _engine: &dyn StructureEngine) -> StepOutcome {
        if record.label().is_none() {
            StepOutcome::Label {
                value: Some(self.fill.clone()),
                force: false,
            }
        } else {
            StepOutcome::Pass
        }
    }
}

/// Convierte el label a numérico (float); flagea los que no lo admiten.
pub struct MakeLabelNumeric {
    descriptor: StepDescriptor,
}

impl MakeLabelNumeric {
    pub const NAME: &'static str = "make_label_numeric";

    pub fn new() -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 5)
                .with_issue("label value is not numeric")
                .with_note("label made numeric")
                .validated()?,
        })
    }
}

impl CurationStep for MakeLabelNumeric {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn run(&self, record: &Record, _engine: &dyn StructureEngine) -> StepOutcome {
        match record.label() {
            Some(Label::Float(_)) => StepOutcome::Pass,
            Some(Label::Int(v)) => StepOutcome::Label {
                value: Some(Label::Float(*v as f64)),
                force: false,
            },
            Some(Label::Text(raw)) => match raw.trim().parse::<f64>() {
                Ok(v) => StepOutcome::Label {
                    value: Some(Label::Float(v)),
                    force: false,
                },
                Err(_) => StepOutcome::Flag,
            },
            None => StepOutcome::Flag,
        }
    }
}

/// Binariza un label numérico contra un umbral.
///
/// El resultado siempre se reasigna con `force` para dejar nota aunque el
/// valor binario coincida con el label previo.
pub struct BinarizeLabel {
    descriptor: StepDescriptor,
    threshold: f64,
    greater: bool,
}

#[derive(Deserialize)]
struct BinarizeParams {
    threshold: f64,
    #[serde(default = "default_greater")]
    greater: bool,
}

fn default_greater() -> bool {
    true
}

impl BinarizeLabel {
    pub const NAME: &'static str = "binarize_label";

    pub fn new(threshold: f64, greater: bool) -> Result<Self, StepError> {
        Ok(Self {
            descriptor: StepDescriptor::new(Self::NAME, StepKind::Update, 6)
                .with_issue("label value is not numeric")
                .with_note("binarized label")
                .with_dependency("make_label_numeric")
                .validated()?,
            threshold,
            greater,
        })
    }

    pub fn from_params(params: &Value) -> Result<Self, StepError> {
        let parsed: BinarizeParams =
            serde_json::from_value(params.clone()).map_err(|source| StepError::BadArguments {
                step: Self::NAME.into(),
                source,
            })?;
        Self::new(parsed.threshold, parsed.greater)
    }
}

impl CurationStep for BinarizeLabel {
    fn descriptor(&self) -> &StepDescriptor {
        &self.descriptor
    }

    fn params(&self) -> Value {
        json!({ "threshold": self.threshold, "greater": self.greater })
    }

    fn run(&self, record: &Record, _engine: &dyn StructureEngine) -> StepOutcome {
        let numeric = match record.label() {
            Some(Label::Float(v)) => *v,
            Some(Label::Int(v)) => *v as f64,
            _ => return StepOutcome::Flag,
        };
        let hit = if self.greater {
            numeric > self.threshold
        } else {
            numeric < self.threshold
        };
        StepOutcome::Label {
            value: Some(Label::Int(i64::from(hit))),
            force: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextEngine;

    fn labelled(id: i64, label: Option<Label>) -> Record {
        let engine = TextEngine::new();
        let structure = engine.parse("CCO").unwrap();
        let record = Record::new(id, Some(structure), false);
        match label {
            Some(label) => record.with_label(label),
            None => record,
        }
    }

    #[test]
    fn test_flag_missing_label() {
        let engine = TextEngine::new();
        let step = FlagMissingLabel::new().unwrap();
        let mut records = vec![labelled(0, None), labelled(1, Some(Label::Int(3)))];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (0, 1));
        assert_eq!(records[0].issue(), Some("label value is missing"));
        assert!(records[1].passing());
    }

    #[test]
    fn test_fill_missing_label_leaves_present_labels() {
        let engine = TextEngine::new();
        let step = FillMissingLabel::new(Label::Float(0.0)).unwrap();
        let mut records = vec![labelled(0, None), labelled(1, Some(Label::Int(7)))];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (1, 0));
        assert_eq!(records[0].label(), Some(&Label::Float(0.0)));
        assert_eq!(records[1].label(), Some(&Label::Int(7)));
    }

    #[test]
    fn test_fill_missing_label_requires_fill_param() {
        assert!(FillMissingLabel::from_params(&json!({})).is_err());
        assert!(FillMissingLabel::from_params(&json!({ "fill": 1.5 })).is_ok());
    }

    #[test]
    fn test_make_label_numeric_conversions() {
        let engine = TextEngine::new();
        let step = MakeLabelNumeric::new().unwrap();
        let mut records = vec![
            labelled(0, Some(Label::Int(4))),
            labelled(1, Some(Label::Text("2.5".into()))),
            labelled(2, Some(Label::Text("active".into()))),
            labelled(3, Some(Label::Float(1.0))),
            labelled(4, None),
        ];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (2, 2));
        assert_eq!(records[0].label(), Some(&Label::Float(4.0)));
        assert_eq!(records[1].label(), Some(&Label::Float(2.5)));
        assert!(!records[2].passing());
        assert_eq!(records[3].label(), Some(&Label::Float(1.0)));
        assert!(records[3].notes().is_empty());
        assert!(!records[4].passing());
    }

    #[test]
    fn test_binarize_label_forces_note() {
        let engine = TextEngine::new();
        let step = BinarizeLabel::new(5.0, true).unwrap();
        let mut records = vec![
            labelled(0, Some(Label::Float(7.2))),
            labelled(1, Some(Label::Float(3.0))),
            labelled(2, Some(Label::Int(1))),
            labelled(3, Some(Label::Text("x".into()))),
        ];
        let (notes, issues) = step.apply(&mut records, &engine);
        assert_eq!((notes, issues), (3, 1));
        assert_eq!(records[0].label(), Some(&Label::Int(1)));
        assert_eq!(records[1].label(), Some(&Label::Int(0)));
        // el valor ya era 0/1 pero force deja nota igual
        assert_eq!(records[2].label(), Some(&Label::Int(0)));
        assert_eq!(records[2].notes().len(), 1);
        assert!(!records[3].passing());
    }

    #[test]
    fn test_binarize_params_round_trip() {
        let step = BinarizeLabel::new(0.5, false).unwrap();
        let rebuilt = BinarizeLabel::from_params(&step.params()).unwrap();
        assert_eq!(rebuilt.threshold, 0.5);
        assert!(!rebuilt.greater);
    }
}
