//! Exports del set curado: archivos de texto, JSON y el documento completo.

use std::fs;
use std::sync::Arc;

use serde_json::Value;
use tempfile::tempdir;

use chemcurate::steps::{FlagInorganic, RemoveStereochemistry};
use chemcurate::{
    CurationStep, SaveDocument, SaveError, StructureEngine, TextEngine, Workflow,
    WorkflowMetadata,
};

fn sample_workflow() -> Workflow {
    let steps: Vec<Box<dyn CurationStep>> = vec![
        Box::new(RemoveStereochemistry::new().unwrap()),
        Box::new(FlagInorganic::new().unwrap()),
    ];
    let engine: Arc<dyn StructureEngine> = Arc::new(TextEngine::new());
    let mut workflow = Workflow::new(steps, engine);
    workflow.set_metadata(WorkflowMetadata {
        name: "exports".to_string(),
        description: "NA".to_string(),
        repo_url: "NA".to_string(),
    });
    workflow
}

const INPUTS: [&str; 4] = ["None", "[Ni+2].[Cl-].[Cl-]", "C[C@H](N)C(=O)O", "CCO"];

#[test]
fn txt_export_is_tab_separated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curated.txt");

    let workflow = sample_workflow();
    let curated = workflow.curate_texts(&INPUTS);
    curated.save_as_txt(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "0\t\tfailed to parse structure");
    assert_eq!(lines[1], "1\t[Cl-].[Cl-].[Ni+2]\tcompound is inorganic");
    assert_eq!(lines[2], "2\tCC(N)C(=O)O\tPASSED\tcompound flattened");
    assert_eq!(lines[3], "3\tCCO\tPASSED");
}

#[test]
fn json_export_has_one_object_per_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curated.json");

    let workflow = sample_workflow();
    let curated = workflow.curate_texts(&INPUTS);
    curated.save_as_json(&path).unwrap();

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1]["issue"], "compound is inorganic");
    assert_eq!(rows[2]["structure"], "CC(N)C(=O)O");
    assert_eq!(rows[2]["issue"], "PASSED");
    assert_eq!(rows[2]["notes"][0], "compound flattened");
}

#[test]
fn report_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.txt");

    let workflow = sample_workflow();
    let curated = workflow.curate_texts(&INPUTS);
    curated.write_report(&path).unwrap();

    let report = fs::read_to_string(&path).unwrap();
    assert!(report.contains("chemcurate curation report"));
    assert!(report.contains("Engine: text-notation"));
    assert!(report.contains("Using workflow StructureLoading -> remove_stereochemistry"));
    assert!(report.contains("FINAL RECORD COUNT: 2"));
}

#[test]
fn save_document_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curated_full.json");

    let workflow = sample_workflow();
    let curated = workflow.curate_texts(&INPUTS);
    curated.save(&path).unwrap();

    let document = SaveDocument::load(&path).unwrap();
    assert_eq!(document.run_id, curated.run_id());
    assert_eq!(document.source, "list of structures");
    assert_eq!(document.identity, workflow.to_string());
    assert_eq!(document.identity_hash, workflow.identity_hash());
    assert_eq!(document.records.len(), 4);
    assert_eq!(document.num_issues, curated.num_issues());
    assert_eq!(document.workflow.name, "exports");
    assert_eq!(document.workflow.steps.len(), 2);

    // los records recargados conservan estado y notas
    assert!(document.records[1].failed());
    assert_eq!(document.records[2].notes(), ["compound flattened"]);
}

#[test]
fn save_document_rejects_future_versions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curated_full.json");

    let workflow = sample_workflow();
    let curated = workflow.curate_texts(&INPUTS);
    curated.save(&path).unwrap();

    let mut parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    parsed["version"] = Value::from(99);
    fs::write(&path, serde_json::to_string(&parsed).unwrap()).unwrap();

    let err = SaveDocument::load(&path).unwrap_err();
    assert!(matches!(err, SaveError::UnsupportedVersion(99)));
}
