//! Corrida completa del pipeline sobre un lote mixto: entradas ilegibles,
//! sales inorgánicas, mezclas y estereoisómeros.

use std::sync::Arc;

use chemcurate::steps::{FlagInorganic, FlagMixtures, RemoveStereochemistry};
use chemcurate::{CuratedSet, CurationStep, StructureEngine, TextEngine, Workflow};

fn sample_inputs() -> Vec<&'static str> {
    vec![
        "None",
        "[Ni+2].[Cl-].[Cl-]",
        "CCCC(=O)O",
        "CCCCCC",
        "CCCCCC.[H]",
        "CCCCCC.CCO",
        "CCO.CCCCCNCCCC",
        "C[C@H](N)C(=O)O",
        "C[C@@H](N)C(=O)O",
        "CC(N)C(=O)O",
    ]
}

fn curate(workflow: &Workflow) -> CuratedSet<'_> {
    workflow.curate_texts(&sample_inputs())
}

fn sample_workflow() -> Workflow {
    let steps: Vec<Box<dyn CurationStep>> = vec![
        Box::new(RemoveStereochemistry::new().unwrap()),
        Box::new(FlagInorganic::new().unwrap()),
        Box::new(FlagMixtures::new().unwrap()),
    ];
    let engine: Arc<dyn StructureEngine> = Arc::new(TextEngine::new());
    Workflow::new(steps, engine)
}

#[test]
fn counts_per_stage() {
    let workflow = sample_workflow();
    let curated = curate(&workflow);

    // carga: una entrada ilegible
    assert_eq!(curated.num_issues_at_step(0), Some(1));
    // flatten: dos entradas con estereoquímica real
    assert_eq!(curated.num_notes_at_step(1), Some(2));
    assert_eq!(curated.num_issues_at_step(1), Some(0));
    // un inorgánico, tres mezclas
    assert_eq!(curated.num_issues_at_step(2), Some(1));
    assert_eq!(curated.num_issues_at_step(3), Some(3));

    assert_eq!(curated.remaining(), &[10, 9, 9, 8, 5]);
}

#[test]
fn survivors_are_flattened_canonical_forms() {
    let workflow = sample_workflow();
    let curated = curate(&workflow);

    assert_eq!(
        curated.texts(false),
        vec![
            "CCCC(=O)O".to_string(),
            "CCCCCC".to_string(),
            "CC(N)C(=O)O".to_string(),
            "CC(N)C(=O)O".to_string(),
            "CC(N)C(=O)O".to_string(),
        ]
    );
}

#[test]
fn full_export_keeps_input_order() {
    let workflow = sample_workflow();
    let curated = curate(&workflow);

    assert_eq!(
        curated.texts(true),
        vec![
            "".to_string(),
            "[Cl-].[Cl-].[Ni+2]".to_string(),
            "CCCC(=O)O".to_string(),
            "CCCCCC".to_string(),
            "CCCCCC.[H]".to_string(),
            "CCCCCC.CCO".to_string(),
            "CCCCCNCCCC.CCO".to_string(),
            "CC(N)C(=O)O".to_string(),
            "CC(N)C(=O)O".to_string(),
            "CC(N)C(=O)O".to_string(),
        ]
    );
}

#[test]
fn passing_mask_matches_final_count() {
    let workflow = sample_workflow();
    let curated = curate(&workflow);

    let mask = curated.get_passing_mask();
    assert_eq!(
        mask,
        vec![false, false, true, true, false, false, false, true, true, true]
    );
    let survivors = mask.iter().filter(|&&b| b).count();
    assert_eq!(survivors, *curated.remaining().last().unwrap());
}

#[test]
fn per_name_queries_follow_run_order() {
    let workflow = sample_workflow();
    let curated = curate(&workflow);

    assert_eq!(curated.num_issues_for_step("flag_inorganic"), vec![1]);
    assert_eq!(curated.num_issues_for_step("flag_mixtures"), vec![3]);
    assert_eq!(
        curated.num_notes_for_step("remove_stereochemistry"),
        vec![2]
    );
    assert_eq!(curated.remaining_for_step("flag_mixtures"), vec![5]);
    assert_eq!(curated.num_issues_for_step("no_such_step"), Vec::<usize>::new());

    // índices directos: 0 es la carga
    assert_eq!(curated.remaining_after_step(0), Some(9));
    assert_eq!(curated.remaining_after_step(1), Some(9));
    assert_eq!(curated.remaining_after_step(2), Some(8));
    assert_eq!(curated.remaining_after_step(3), Some(5));
}

#[test]
fn repeated_step_name_reports_one_entry_per_occurrence() {
    // el mismo nombre puede aparecer dos veces; las consultas por nombre
    // devuelven un valor por ocurrencia, en orden de corrida
    let steps: Vec<Box<dyn CurationStep>> = vec![
        Box::new(RemoveStereochemistry::new().unwrap()),
        Box::new(FlagInorganic::new().unwrap()),
        Box::new(FlagMixtures::new().unwrap()),
        Box::new(FlagMixtures::new().unwrap()),
    ];
    let engine: Arc<dyn StructureEngine> = Arc::new(TextEngine::new());
    let workflow = Workflow::new(steps, engine);
    let curated = curate(&workflow);

    // la primera pasada flagea las tres mezclas, la segunda no encuentra nada
    assert_eq!(curated.num_issues_for_step("flag_mixtures"), vec![3, 0]);
    assert_eq!(curated.remaining_for_step("flag_mixtures"), vec![5, 5]);
    assert_eq!(curated.num_notes_for_step("flag_mixtures"), vec![0, 0]);
    // los nombres únicos siguen devolviendo un solo valor
    assert_eq!(curated.num_issues_for_step("flag_inorganic"), vec![1]);
    assert_eq!(curated.remaining(), &[10, 9, 9, 8, 5, 5]);
}

#[test]
fn failed_records_are_never_touched_again() {
    let workflow = sample_workflow();
    let curated = curate(&workflow);

    let unparsable = &curated.records()[0];
    assert!(unparsable.failed());
    assert_eq!(unparsable.issue(), Some("failed to parse structure"));
    assert!(unparsable.notes().is_empty());

    // el inorgánico conserva el issue de su primer flag pese a la mezcla
    let nickel = &curated.records()[1];
    assert_eq!(nickel.issue(), Some("compound is inorganic"));
}
