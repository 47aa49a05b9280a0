//! Subcommand implementations

use anyhow::{bail, Context, Result};
use cashcached_app::{run_loaded_scenario, FormKind, HeadlessScenario, SiteConfig, SitePage};
use cashcached_core::{ScrollSource, Submission, SubmissionState};
use cashcached_emailjs::EmailJsDispatcher;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Load `site.toml` if present, otherwise defaults; then apply environment overrides
fn load_config(path: &Path) -> Result<SiteConfig> {
    let mut config = SiteConfig::load_or_default(path)?;
    config.apply_env();
    Ok(config)
}

pub fn scenario(file: &Path, report: Option<&Path>, config: &Path) -> Result<ExitCode> {
    let config = load_config(config)?;
    let scenario = HeadlessScenario::from_path(file)?;
    let outcome = run_loaded_scenario(&scenario, &config)?;

    match report {
        Some(path) => {
            outcome.report().write_to_path(path)?;
            info!(path = %path.display(), "report written");
        }
        None => outcome.report().write_to_writer(&mut std::io::stdout().lock())?,
    }

    if outcome.is_failed() {
        warn!(file = %file.display(), "scenario failed");
        Ok(ExitCode::FAILURE)
    } else {
        info!(file = %file.display(), "scenario passed");
        Ok(ExitCode::SUCCESS)
    }
}

pub async fn contact(config: &Path, name: &str, email: &str, message: &str) -> Result<ExitCode> {
    let config = load_config(config)?;
    config.contact.ensure_ready()?;

    let dispatcher = EmailJsDispatcher::new(
        config.contact.endpoint.as_str(),
        Duration::from_secs(config.contact.timeout_secs),
    )
    .context("Failed to build the EmailJS client")?;

    let source = ScrollSource::new();
    let mut page = SitePage::mount(&config, &source, Arc::new(dispatcher))?;
    let form = page.form_mut(FormKind::Contact);
    form.update_field("from_name", name)?;
    form.update_field("user_email", email)?;
    form.update_field("message", message)?;

    let missing = form.missing_required();
    if !missing.is_empty() {
        bail!("missing required fields: {}", missing.join(", "));
    }

    let Submission::Dispatched(in_flight) = form.submit() else {
        bail!("contact form did not dispatch");
    };
    let state = in_flight.settle(form).await;

    if let Some(status) = form.status_message() {
        println!("{status}");
    }
    page.unmount();

    Ok(if state == SubmissionState::Success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn init(dir: &Path, force: bool) -> Result<ExitCode> {
    let path = dir.join("site.toml");
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&path, SiteConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "wrote default site config");
    Ok(ExitCode::SUCCESS)
}
