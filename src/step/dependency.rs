//! Expresiones de dependencia entre steps.
//!
//! Una expresión nombra steps que deberían aparecer antes en el workflow.
//! La sintaxis soporta grupos OR con `|` ("a|b" se satisface si `a` o `b`
//! preceden al step). Un step con varias expresiones exige que todas se
//! satisfagan (conjunción de disyunciones). El chequeo es consultivo: una
//! dependencia faltante produce un diagnóstico, nunca un error.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyExpr(String);

impl DependencyExpr {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Nombres alternativos del grupo OR.
    pub fn alternatives(&self) -> impl Iterator<Item = &str> {
        self.0.split('|').map(str::trim).filter(|s| !s.is_empty())
    }

    /// True si alguno de los nombres del grupo aparece entre los steps
    /// precedentes.
    pub fn satisfied_by(&self, preceding: &[&str]) -> bool {
        self.alternatives().any(|name| preceding.contains(&name))
    }
}

impl fmt::Display for DependencyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DependencyExpr {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_name() {
        let expr = DependencyExpr::new("sanitize_structure");
        assert!(expr.satisfied_by(&["sanitize_structure", "flag_boron"]));
        assert!(!expr.satisfied_by(&["flag_boron"]));
        assert!(!expr.satisfied_by(&[]));
    }

    #[test]
    fn test_or_group() {
        let expr = DependencyExpr::new("remove_explicit_hydrogens|remove_all_hydrogens");
        assert!(expr.satisfied_by(&["remove_all_hydrogens"]));
        assert!(expr.satisfied_by(&["remove_explicit_hydrogens"]));
        assert!(!expr.satisfied_by(&["sanitize_structure"]));
        assert_eq!(expr.alternatives().count(), 2);
    }

    #[test]
    fn test_or_group_tolerates_spaces() {
        let expr = DependencyExpr::new("a | b");
        assert!(expr.satisfied_by(&["b"]));
    }
}
