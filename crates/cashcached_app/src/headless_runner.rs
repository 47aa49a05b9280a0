//! Scenario runner that drives a mounted page without a browser.
//!
//! The contact form dispatches to a [`ManualDispatcher`]; `resolve` steps
//! supply its outcomes in order.

use crate::config::SiteConfig;
use crate::headless_assert::{
    evaluate_assert_count, evaluate_assert_exists, evaluate_assert_text_contains,
    AssertionResult,
};
use crate::headless_report::HeadlessReport;
use crate::headless_scenario::{HeadlessScenario, ResolveOutcome, ScenarioStep};
use crate::page::{FormKind, SitePage};
use anyhow::{bail, Context, Result};
use cashcached_core::{
    DispatchFailure, DispatchOutcome, InFlight, ManualDispatcher, ScrollPosition, ScrollSource,
    Submission,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Final outcome of a scenario run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against a freshly mounted page
pub fn run_scenario(input: &str, config: &SiteConfig) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, config)
}

/// Execute a pre-loaded scenario against a freshly mounted page
pub fn run_loaded_scenario(scenario: &HeadlessScenario, config: &SiteConfig) -> Result<RunOutcome> {
    let mut run = ScenarioRun::mount(config)?;

    for (step_index, step) in scenario.steps.iter().enumerate() {
        debug!(step_index, ?step, "scenario step");
        if let Some((assertion, message)) = run
            .step(step)
            .with_context(|| format!("scenario step {step_index} failed"))?
        {
            let report =
                HeadlessReport::failed(assertion, step_index, message, run.dispatcher.call_count());
            return Ok(RunOutcome::Failed { report });
        }
    }

    Ok(RunOutcome::Passed {
        report: HeadlessReport::passed(scenario.steps.len(), run.dispatcher.call_count()),
    })
}

struct ScenarioRun {
    source: ScrollSource,
    dispatcher: Arc<ManualDispatcher>,
    page: Option<SitePage>,
    in_flight: HashMap<FormKind, InFlight>,
}

impl ScenarioRun {
    fn mount(config: &SiteConfig) -> Result<Self> {
        let source = ScrollSource::new();
        let dispatcher = Arc::new(ManualDispatcher::new());
        let page = SitePage::mount(config, &source, dispatcher.clone())?;
        Ok(Self {
            source,
            dispatcher,
            page: Some(page),
            in_flight: HashMap::new(),
        })
    }

    fn page_mut(&mut self) -> Result<&mut SitePage> {
        self.page
            .as_mut()
            .context("the page has been unmounted")
    }

    /// Run one step. `Some((assertion, message))` reports a failed assertion.
    fn step(&mut self, step: &ScenarioStep) -> Result<Option<(&'static str, String)>> {
        match step {
            ScenarioStep::Scroll { y } => {
                self.page_mut()?;
                self.source.emit(ScrollPosition::new(*y));
            }
            ScenarioStep::Toggle { index } => {
                let faq = self.page_mut()?.faq_mut();
                if *index >= faq.len() {
                    bail!("FAQ index {index} out of range (len {})", faq.len());
                }
                faq.toggle(*index);
            }
            ScenarioStep::SetField { form, name, value } => {
                self.page_mut()?
                    .form_mut(*form)
                    .update_field(name, value.as_str())?;
            }
            ScenarioStep::Submit { form } => {
                match self.page_mut()?.form_mut(*form).submit() {
                    Submission::Dispatched(in_flight) => {
                        self.in_flight.insert(*form, in_flight);
                    }
                    Submission::Accepted => {}
                    Submission::Suppressed => debug!(%form, "submit suppressed"),
                }
            }
            ScenarioStep::Resolve { form, outcome } => {
                self.page_mut()?;
                let in_flight = self
                    .in_flight
                    .remove(form)
                    .with_context(|| format!("no {form} submission is in flight"))?;
                let outcome = match outcome {
                    ResolveOutcome::Delivered => DispatchOutcome::Delivered,
                    ResolveOutcome::Failed => DispatchOutcome::Failed(DispatchFailure::Transport(
                        "simulated failure".to_string(),
                    )),
                };
                if !self.dispatcher.resolve_next(outcome) {
                    bail!("no dispatch is pending");
                }
                let controller = self.page_mut()?.form_mut(*form);
                pollster::block_on(in_flight.settle(controller));
            }
            ScenarioStep::Unmount => {
                let Some(mut page) = self.page.take() else {
                    bail!("the page has already been unmounted");
                };
                page.unmount();
                self.in_flight.clear();
            }
            ScenarioStep::AssertExists { id } => {
                let snapshot = self.page_mut()?.snapshot();
                return Ok(failure("assert_exists", evaluate_assert_exists(id, &snapshot)));
            }
            ScenarioStep::AssertTextContains { id, value } => {
                let snapshot = self.page_mut()?.snapshot();
                return Ok(failure(
                    "assert_text_contains",
                    evaluate_assert_text_contains(id, value, &snapshot),
                ));
            }
            ScenarioStep::AssertDispatchCount { count } => {
                return Ok(failure(
                    "assert_dispatch_count",
                    evaluate_assert_count("dispatch count", *count, self.dispatcher.call_count()),
                ));
            }
            ScenarioStep::AssertListenerCount { count } => {
                return Ok(failure(
                    "assert_listener_count",
                    evaluate_assert_count("scroll listeners", *count, self.source.listener_count()),
                ));
            }
        }
        Ok(None)
    }
}

fn failure(assertion: &'static str, result: AssertionResult) -> Option<(&'static str, String)> {
    match result {
        AssertionResult::Passed => None,
        AssertionResult::Failed { message, .. } => Some((assertion, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless_report::ReportStatus;
    use pretty_assertions::assert_eq;

    fn run(steps: &str) -> Result<RunOutcome> {
        run_scenario(&format!(r#"{{"steps": {steps}}}"#), &SiteConfig::default())
    }

    #[test]
    fn empty_scenario_passes() {
        let outcome = run("[]").unwrap();
        assert!(!outcome.is_failed());
        assert_eq!(outcome.report().steps, 0);
    }

    #[test]
    fn failed_assertion_reports_step() {
        let outcome = run(
            r#"[
                {"type": "scroll", "y": 100},
                {"type": "assert_text_contains", "id": "hero.transform", "value": "translateY(10px)"}
            ]"#,
        )
        .unwrap();

        let report = outcome.report();
        assert!(outcome.is_failed());
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.failed_step_index, Some(1));
        assert_eq!(report.assertion.as_deref(), Some("assert_text_contains"));
        assert!(report.message.as_deref().unwrap().contains("translateY(80px)"));
    }

    #[test]
    fn resolve_without_submission_is_an_error() {
        let err = run(r#"[{"type": "resolve", "form": "contact", "outcome": "delivered"}]"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("no contact submission is in flight"));
    }

    #[test]
    fn steps_after_unmount_are_errors() {
        let err = run(r#"[{"type": "unmount"}, {"type": "scroll", "y": 5}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("unmounted"));
    }

    #[test]
    fn toggle_out_of_range_is_an_error() {
        assert!(run(r#"[{"type": "toggle", "index": 99}]"#).is_err());
    }

    #[test]
    fn unknown_field_is_an_error() {
        let err = run(
            r#"[{"type": "set_field", "form": "contact", "name": "phone", "value": "555"}]"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("phone"));
    }
}
