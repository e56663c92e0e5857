//! Constantes del motor de curación.
//!
//! Este módulo agrupa valores estáticos que participan en la identidad del
//! workflow y en los documentos persistidos. Cambiarlos invalida hashes y
//! reportes previos, así que deben mantenerse estables entre versiones
//! compatibles.

/// Valor por defecto para los campos libres de metadata (`name`,
/// `description`, `repo_url`) cuando el usuario no los define.
pub const NA: &str = "NA";

/// Marcador que reemplaza al `issue` en los exports cuando el record pasó
/// la curación completa.
pub const PASSED: &str = "PASSED";

/// Nombre de la etapa de carga. Siempre encabeza la cadena identidad del
/// workflow (`StructureLoading -> step -> ...`) y ocupa el índice 0 de las
/// estadísticas por paso.
pub const LOADING_STAGE: &str = "StructureLoading";

/// Issue asignado a los records cuya estructura no pudo ser interpretada
/// por el engine durante la carga.
pub const PARSE_FAILURE_ISSUE: &str = "failed to parse structure";

/// Texto genérico que algunos autores dejan como placeholder en sus steps.
/// Usarlo dispara un diagnóstico (no un error) durante la validación.
pub const PLACEHOLDER_TEXT: &str = "NA";

/// Versión del documento de guardado completo (`CuratedSet::save`). Se
/// incluye en el JSON para poder rechazar documentos incompatibles.
pub const SAVE_FORMAT_VERSION: u32 = 1;
