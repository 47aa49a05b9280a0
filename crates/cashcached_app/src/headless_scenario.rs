//! Scenario definition for headless page runs

use crate::page::FormKind;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Sequence of headless steps
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse scenario {}", path.display()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Scroll { y: f64 },
    Toggle { index: usize },
    SetField { form: FormKind, name: String, value: String },
    Submit { form: FormKind },
    Resolve { form: FormKind, outcome: ResolveOutcome },
    Unmount,
    AssertExists { id: String },
    AssertTextContains { id: String, value: String },
    AssertDispatchCount { count: usize },
    AssertListenerCount { count: usize },
}

/// Outcome supplied for the oldest in-flight dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOutcome {
    Delivered,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let scenario = HeadlessScenario::from_json(
            r#"{"steps": [
                {"type": "scroll", "y": 120},
                {"type": "set_field", "form": "contact", "name": "from_name", "value": "Ana"},
                {"type": "resolve", "form": "contact", "outcome": "failed"},
                {"type": "unmount"},
                {"type": "assert_listener_count", "count": 0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(scenario.steps[0], ScenarioStep::Scroll { y } if y == 120.0));
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::Resolve { form: FormKind::Contact, outcome: ResolveOutcome::Failed }
        ));
        assert!(matches!(scenario.steps[3], ScenarioStep::Unmount));
    }

    #[test]
    fn rejects_unknown_form() {
        let err = HeadlessScenario::from_json(
            r#"{"steps": [{"type": "submit", "form": "newsletter"}]}"#,
        );
        assert!(err.is_err());
    }
}
