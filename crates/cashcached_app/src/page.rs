//! The landing page view: hero, FAQ and the two forms

use crate::config::SiteConfig;
use crate::headless_assert::{DiagnosticsElement, DiagnosticsSnapshot};
use anyhow::{Context, Result};
use cashcached_content::{
    consultation_copy, consultation_schema, contact_copy, contact_schema, FaqCatalog,
};
use cashcached_core::{
    DisclosureList, Dispatcher, ScrollOffsetController, ScrollSource, SubmissionController,
};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Which form a step or lookup addresses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Contact,
    Consultation,
}

impl FormKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Consultation => "consultation",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mounted page state.
///
/// Owns every controller on the page. The hero stays bound to the scroll
/// source until [`unmount`](Self::unmount) or drop.
#[derive(Debug)]
pub struct SitePage {
    hero: ScrollOffsetController,
    faq: DisclosureList,
    contact: SubmissionController,
    consultation: SubmissionController,
}

impl SitePage {
    pub fn mount(
        config: &SiteConfig,
        source: &ScrollSource,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<Self> {
        let catalog = FaqCatalog::builtin().context("Failed to load the built-in FAQ catalog")?;

        let mut hero = ScrollOffsetController::new(config.scroll.damping);
        hero.activate(source);

        let contact = SubmissionController::remote(
            FormKind::Contact.as_str(),
            contact_schema(),
            config.contact.dispatch_target(),
            dispatcher,
        )
        .with_copy(contact_copy());

        let consultation =
            SubmissionController::local(FormKind::Consultation.as_str(), consultation_schema())
                .with_copy(consultation_copy());

        debug!(faq_items = catalog.len(), "site page mounted");

        Ok(Self {
            hero,
            faq: catalog.to_disclosure_list(),
            contact,
            consultation,
        })
    }

    /// Release the scroll subscription. Controllers keep their last state.
    pub fn unmount(&mut self) {
        self.hero.deactivate();
        debug!("site page unmounted");
    }

    pub fn hero(&self) -> &ScrollOffsetController {
        &self.hero
    }

    pub fn faq(&self) -> &DisclosureList {
        &self.faq
    }

    pub fn faq_mut(&mut self) -> &mut DisclosureList {
        &mut self.faq
    }

    pub fn form(&self, kind: FormKind) -> &SubmissionController {
        match kind {
            FormKind::Contact => &self.contact,
            FormKind::Consultation => &self.consultation,
        }
    }

    pub fn form_mut(&mut self, kind: FormKind) -> &mut SubmissionController {
        match kind {
            FormKind::Contact => &mut self.contact,
            FormKind::Consultation => &mut self.consultation,
        }
    }

    /// Observable page state keyed by element id
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let mut snapshot = DiagnosticsSnapshot::default();
        snapshot.insert("hero.transform", self.hero.offset().css_transform());

        for (index, item) in self.faq.iter().enumerate() {
            let state = if item.is_expanded() {
                "expanded"
            } else {
                "collapsed"
            };
            snapshot.insert(format!("faq.{index}"), state);
            snapshot.insert(format!("faq.{index}.question"), item.question());
        }

        for kind in [FormKind::Contact, FormKind::Consultation] {
            let form = self.form(kind);
            snapshot.insert(
                format!("{kind}.status"),
                form.status_message().unwrap_or_default(),
            );
            snapshot.insert(format!("{kind}.button"), form.submit_label());
            for (name, value) in form.fields().iter() {
                snapshot
                    .elements
                    .insert(format!("{kind}.field.{name}"), DiagnosticsElement::text(value));
            }
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashcached_core::{ManualDispatcher, ScrollPosition, Submission, SubmissionState};
    use pretty_assertions::assert_eq;

    fn mount(source: &ScrollSource) -> (SitePage, Arc<ManualDispatcher>) {
        let dispatcher = Arc::new(ManualDispatcher::new());
        let page = SitePage::mount(&SiteConfig::default(), source, dispatcher.clone()).unwrap();
        (page, dispatcher)
    }

    fn text(snapshot: &DiagnosticsSnapshot, id: &str) -> String {
        snapshot.elements[id].text.clone().unwrap_or_default()
    }

    #[test]
    fn mount_binds_hero_and_loads_faq() {
        let source = ScrollSource::new();
        let (page, _) = mount(&source);

        assert_eq!(source.listener_count(), 1);
        assert_eq!(page.faq().len(), 6);
        assert_eq!(page.faq().expanded_count(), 0);
        assert_eq!(page.form(FormKind::Contact).state(), SubmissionState::Idle);
        assert!(!page.form(FormKind::Consultation).is_remote());
    }

    #[test]
    fn unmount_and_drop_release_scroll_listener() {
        let source = ScrollSource::new();
        let (mut page, _) = mount(&source);
        page.unmount();
        assert_eq!(source.listener_count(), 0);

        let (page, _) = mount(&source);
        assert_eq!(source.listener_count(), 1);
        drop(page);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn snapshot_reflects_controllers() {
        let source = ScrollSource::new();
        let (mut page, _) = mount(&source);

        source.emit(ScrollPosition::new(100.0));
        page.faq_mut().toggle(1);
        page.form_mut(FormKind::Contact)
            .update_field("from_name", "Ana")
            .unwrap();

        let snapshot = page.snapshot();
        assert_eq!(text(&snapshot, "hero.transform"), "translateY(80px)");
        assert_eq!(text(&snapshot, "faq.0"), "collapsed");
        assert_eq!(text(&snapshot, "faq.1"), "expanded");
        assert_eq!(text(&snapshot, "contact.field.from_name"), "Ana");
        assert_eq!(text(&snapshot, "contact.button"), "Send Message");
        assert_eq!(text(&snapshot, "contact.status"), "");
        assert_eq!(text(&snapshot, "consultation.button"), "Schedule Consultation");
        assert!(snapshot.elements.contains_key("consultation.field.consultation_date"));
    }

    #[test]
    fn contact_uses_configured_identifiers() {
        let source = ScrollSource::new();
        let mut config = SiteConfig::default();
        config.contact.service_id = "service_x".to_string();
        config.contact.template_id = "template_y".to_string();
        config.contact.public_key = "pk_z".to_string();

        let dispatcher = Arc::new(ManualDispatcher::new());
        let mut page = SitePage::mount(&config, &source, dispatcher.clone()).unwrap();

        let submission = page.form_mut(FormKind::Contact).submit();
        assert!(matches!(submission, Submission::Dispatched(_)));
        let request = &dispatcher.requests()[0];
        assert_eq!(request.service_id, "service_x");
        assert_eq!(request.template_id, "template_y");
        assert_eq!(request.credential.expose(), "pk_z");
    }

    #[test]
    fn form_kind_parses_snake_case() {
        let kind: FormKind = serde_json::from_str("\"consultation\"").unwrap();
        assert_eq!(kind, FormKind::Consultation);
        assert_eq!(kind.to_string(), "consultation");
    }
}
