//! Persistencia del workflow como documento JSON.
//!
//! El documento guarda la metadata y los steps indexados por posición
//! textual ("0", "1", ...). Al cargar, las posiciones deben formar el rango
//! contiguo 0..n y cada nombre debe resolverse en el registry.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::StructureEngine;
use crate::errors::WorkflowFormatError;
use crate::hashing::hash_json;
use crate::step::{CurationStep, StepRegistry, REGISTRY};

use super::{Workflow, WorkflowMetadata};

/// Forma serializada de un workflow. Cada entrada de `steps` lleva el
/// nombre del step más sus kwargs de constructor, aplanados en el mismo
/// objeto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub name: String,
    pub description: String,
    pub repo_url: String,
    pub steps: BTreeMap<String, Map<String, Value>>,
}

impl WorkflowDocument {
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let mut steps = BTreeMap::new();
        for (position, step) in workflow.steps().iter().enumerate() {
            let mut entry = Map::new();
            entry.insert(
                "name".to_string(),
                Value::String(step.descriptor().name.clone()),
            );
            if let Value::Object(params) = step.params() {
                for (key, value) in params {
                    entry.insert(key, value);
                }
            }
            steps.insert(position.to_string(), entry);
        }
        let metadata = workflow.metadata();
        Self {
            name: metadata.name.clone(),
            description: metadata.description.clone(),
            repo_url: metadata.repo_url.clone(),
            steps,
        }
    }

    pub fn metadata(&self) -> WorkflowMetadata {
        WorkflowMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            repo_url: self.repo_url.clone(),
        }
    }

    /// Rearma la lista de steps en orden de posición. Posiciones no
    /// contiguas o duplicadas y nombres desconocidos son errores de formato
    /// distintos.
    pub fn build_steps(
        &self,
        registry: &StepRegistry,
    ) -> Result<Vec<Box<dyn CurationStep>>, WorkflowFormatError> {
        let expected = self.steps.len();
        let mut ordered: Vec<Option<&Map<String, Value>>> = vec![None; expected];
        for (key, entry) in &self.steps {
            let position = key.parse::<usize>().ok().filter(|p| *p < expected);
            match position {
                Some(p) if ordered[p].is_none() => ordered[p] = Some(entry),
                _ => {
                    return Err(WorkflowFormatError::PositionMismatch {
                        expected,
                        found: self.found_positions(),
                    })
                }
            }
        }

        let mut steps = Vec::with_capacity(expected);
        for entry in ordered.into_iter().flatten() {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| WorkflowFormatError::UnknownStep(String::new()))?;
            let mut params = entry.clone();
            params.remove("name");
            steps.push(registry.build(name, &Value::Object(params))?);
        }
        Ok(steps)
    }

    /// Hash del documento completo, parámetros y metadata incluidos. A
    /// diferencia del hash de identidad del workflow, dos pipelines con los
    /// mismos steps pero distintos kwargs difieren aquí.
    pub fn content_hash(&self) -> Result<String, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        Ok(hash_json(&value))
    }

    fn found_positions(&self) -> String {
        let keys: Vec<&str> = self.steps.keys().map(String::as_str).collect();
        keys.join(",")
    }
}

impl Workflow {
    /// Serializa el workflow a su documento JSON en disco.
    pub fn save_workflow_file(&self, path: impl AsRef<Path>) -> Result<(), WorkflowFormatError> {
        let document = WorkflowDocument::from_workflow(self);
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Carga un workflow desde su documento JSON, resolviendo cada step en
    /// el registry global.
    pub fn load(
        path: impl AsRef<Path>,
        engine: Arc<dyn StructureEngine>,
    ) -> Result<Self, WorkflowFormatError> {
        Self::load_with_registry(path, engine, &REGISTRY)
    }

    pub fn load_with_registry(
        path: impl AsRef<Path>,
        engine: Arc<dyn StructureEngine>,
        registry: &StepRegistry,
    ) -> Result<Self, WorkflowFormatError> {
        let raw = fs::read_to_string(path)?;
        let document: WorkflowDocument = serde_json::from_str(&raw)?;
        let steps = document.build_steps(registry)?;
        let mut workflow = Workflow::new(steps, engine);
        workflow.set_metadata(document.metadata());
        Ok(workflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::steps::{FlagMolecularWeight, RemoveStereochemistry};

    fn sample_document() -> WorkflowDocument {
        serde_json::from_value(json!({
            "name": "NA",
            "description": "NA",
            "repo_url": "NA",
            "steps": {
                "0": { "name": RemoveStereochemistry::NAME },
                "1": { "name": FlagMolecularWeight::NAME, "min": 20.0, "max": 900.0 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_build_steps_in_position_order() {
        let steps = sample_document().build_steps(&REGISTRY).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].descriptor().name, RemoveStereochemistry::NAME);
        assert_eq!(steps[1].descriptor().name, FlagMolecularWeight::NAME);
        assert_eq!(steps[1].params(), json!({ "min": 20.0, "max": 900.0 }));
    }

    #[test]
    fn test_gap_in_positions_is_format_error() {
        let mut document = sample_document();
        let entry = document.steps.remove("1").unwrap();
        document.steps.insert("5".to_string(), entry);
        let err = document.build_steps(&REGISTRY).unwrap_err();
        assert!(matches!(err, WorkflowFormatError::PositionMismatch { .. }));
        assert!(err.to_string().contains("steps and positions"));
    }

    #[test]
    fn test_unknown_name_is_format_error() {
        let mut document = sample_document();
        document
            .steps
            .get_mut("0")
            .unwrap()
            .insert("name".to_string(), json!("MadeUpCurationStep"));
        let err = document.build_steps(&REGISTRY).unwrap_err();
        assert!(err.to_string().contains("could not find curation step"));
    }
}
