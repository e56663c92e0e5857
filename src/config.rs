//! Configuración central del motor.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`) con los valores por defecto que usan los workflows cuando el
//! caller no los fija explícitamente.

use once_cell::sync::Lazy;
use std::env;

/// Configuración global del motor de curación.
pub struct CurationConfig {
    /// Suprimir la emisión de diagnósticos por `tracing::warn!`. Los
    /// diagnósticos estructurados siguen disponibles en el workflow.
    pub suppress_warnings: bool,
    /// Conservar snapshots de estructura/label previos a cada mutación.
    pub track_history: bool,
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(default)
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<CurationConfig> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    CurationConfig {
        suppress_warnings: env_flag("CHEMCURATE_SUPPRESS_WARNINGS", false),
        track_history: env_flag("CHEMCURATE_TRACK_HISTORY", false),
    }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_flag_parsing() {
        assert!(!env_flag("CHEMCURATE_TEST_UNSET_FLAG", false));
        assert!(env_flag("CHEMCURATE_TEST_UNSET_FLAG", true));
    }
}
