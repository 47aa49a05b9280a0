//! CashCached Site
//!
//! Composes the core controllers into the landing page and runs it headless:
//!
//! - [`SitePage`] owns the hero, the FAQ list and the two forms
//! - [`SiteConfig`] loads `site.toml` with environment overrides
//! - [`run_scenario`] replays a JSON scenario and produces a [`HeadlessReport`]

pub mod config;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_scenario;
pub mod page;

pub use config::{ContactConfig, ScrollConfig, SiteConfig};
pub use headless_assert::{AssertionResult, DiagnosticsElement, DiagnosticsSnapshot};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use headless_scenario::{HeadlessScenario, ResolveOutcome, ScenarioStep};
pub use page::{FormKind, SitePage};
