//! Demo del pipeline de curación: arma un workflow con el engine de texto,
//! corre un lote de entradas de ejemplo e imprime el reporte.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use chemcurate::steps::{
    FlagInorganic, FlagMixtures, FlagMolecularWeight, RemoveExplicitHydrogens,
    RemoveStereochemistry,
};
use chemcurate::{CurationStep, StructureEngine, TextEngine, Workflow, WorkflowMetadata};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let steps: Vec<Box<dyn CurationStep>> = vec![
        Box::new(RemoveStereochemistry::new()?),
        Box::new(RemoveExplicitHydrogens::new()?),
        Box::new(FlagMixtures::new()?),
        Box::new(FlagInorganic::new()?),
        Box::new(FlagMolecularWeight::new(20.0, Some(900.0))?),
    ];
    let engine: Arc<dyn StructureEngine> = Arc::new(TextEngine::new());
    let mut workflow = Workflow::new(steps, engine);
    workflow.set_metadata(WorkflowMetadata {
        name: "demo".to_string(),
        description: "pipeline de demostración".to_string(),
        repo_url: "NA".to_string(),
    });

    let inputs = [
        "None",
        "[Ni+2].[Cl-].[Cl-]",
        "CCCC(=O)O",
        "CCCCCC",
        "CCCCCC.[H]",
        "CCCCCC.CCO",
        "C[C@H](N)C(=O)O",
        "CC(N)C(=O)O",
    ];
    let curated = workflow.curate_texts(&inputs);

    print!("{}", curated.report_string());
    Ok(())
}
