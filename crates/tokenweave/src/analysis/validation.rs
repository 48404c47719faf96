//! Validation pass: unresolved aliases and structural warnings.
//!
//! Validation never fails. Every problem becomes a record in the returned
//! [`ValidationReport`].

use super::context::DependencyContext;
use super::types::{
    ValidationError, ValidationErrorKind, ValidationReport, ValidationWarning,
    ValidationWarningKind,
};
use crate::config::AnalysisConfig;
use crate::domain::TokenId;
use std::collections::HashMap;

/// Validate the aliases and structure of one run.
///
/// `depths` must hold the depth of every token in the context; `cycle_count`
/// is the number of reported cycles, which also makes the report invalid.
#[must_use]
pub fn validate(
    context: &DependencyContext<'_>,
    depths: &HashMap<TokenId, usize>,
    cycle_count: usize,
    config: &AnalysisConfig,
) -> ValidationReport {
    let map = context.map();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for token in context.tokens() {
        for target in map.dependencies(&token.id) {
            if !context.is_known(target) {
                errors.push(ValidationError {
                    kind: ValidationErrorKind::MissingReference,
                    token_id: token.id.clone(),
                    referenced_id: Some(target.clone()),
                    message: format!(
                        "Token {} references missing token {}",
                        token.id, target
                    ),
                });
            }
        }
    }

    for token in context.tokens() {
        let depth = depths.get(&token.id).copied().unwrap_or(0);
        if depth > config.deep_nesting_threshold {
            warnings.push(ValidationWarning {
                kind: ValidationWarningKind::DeepNesting,
                token_id: token.id.clone(),
                message: format!(
                    "Token {} has alias depth {} (threshold {})",
                    token.id, depth, config.deep_nesting_threshold
                ),
            });
        }
        if map.dependent_count(&token.id) == 0 {
            warnings.push(ValidationWarning {
                kind: ValidationWarningKind::UnusedToken,
                token_id: token.id.clone(),
                message: format!("Token {} is not referenced by any token", token.id),
            });
        }
    }

    tracing::debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        cycles = cycle_count,
        "Validation complete"
    );

    ValidationReport {
        is_valid: errors.is_empty() && cycle_count == 0,
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModeValue, Token, TokenValue, ValueTypeId};
    use serde_json::json;

    fn token(id: &str, target: Option<&str>) -> Token {
        let value = match target {
            Some(t) => TokenValue::Alias(TokenId::from(t)),
            None => TokenValue::Literal(json!(4)),
        };
        Token {
            id: TokenId::from(id),
            display_name: id.to_string(),
            resolved_value_type_id: ValueTypeId::from("number"),
            values_by_mode: vec![ModeValue {
                mode_ids: vec![],
                value,
            }],
        }
    }

    fn depths_of(context: &DependencyContext<'_>) -> HashMap<TokenId, usize> {
        let mut calculator = context.depths();
        context
            .tokens()
            .iter()
            .map(|t| (t.id.clone(), calculator.depth(&t.id)))
            .collect()
    }

    #[test]
    fn missing_reference_names_both_tokens() {
        let tokens = vec![token("x", Some("y"))];
        let context = DependencyContext::new(&tokens);
        let report = validate(&context, &depths_of(&context), 0, &AnalysisConfig::default());

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].token_id, TokenId::from("x"));
        assert_eq!(report.errors[0].referenced_id, Some(TokenId::from("y")));
        assert_eq!(report.errors[0].kind.as_str(), "missing_reference");
    }

    #[test]
    fn cycles_make_report_invalid() {
        let tokens = vec![token("a", None)];
        let context = DependencyContext::new(&tokens);
        let report = validate(&context, &depths_of(&context), 1, &AnalysisConfig::default());

        assert!(report.errors.is_empty());
        assert!(!report.is_valid);
    }

    #[test]
    fn deep_nesting_respects_threshold() {
        let tokens = vec![
            token("t0", None),
            token("t1", Some("t0")),
            token("t2", Some("t1")),
            token("t3", Some("t2")),
        ];
        let context = DependencyContext::new(&tokens);
        let config = AnalysisConfig {
            deep_nesting_threshold: 2,
            ..AnalysisConfig::default()
        };
        let report = validate(&context, &depths_of(&context), 0, &config);

        let deep: Vec<_> = report
            .warnings_of(ValidationWarningKind::DeepNesting)
            .map(|w| w.token_id.as_str())
            .collect();
        assert_eq!(deep, vec!["t3"]);
        assert!(report.is_valid);
    }

    #[test]
    fn unreferenced_tokens_are_unused() {
        let tokens = vec![token("base", None), token("alias", Some("base"))];
        let context = DependencyContext::new(&tokens);
        let report = validate(&context, &depths_of(&context), 0, &AnalysisConfig::default());

        let unused: Vec<_> = report
            .warnings_of(ValidationWarningKind::UnusedToken)
            .map(|w| w.token_id.as_str())
            .collect();
        assert_eq!(unused, vec!["alias"]);
    }
}
