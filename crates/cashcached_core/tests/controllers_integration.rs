//! Integration tests for the three site controllers
//!
//! These tests verify that:
//! - The hero offset tracks scroll notifications only while its view is alive
//! - FAQ items toggle independently
//! - Contact and consultation forms keep their different outcome semantics

use cashcached_core::{
    Credential, DispatchFailure, DispatchOutcome, DispatchTarget, DisclosureList, FieldSpec,
    FormFields, FormSchema, ManualDispatcher, ScrollOffsetController, ScrollPosition,
    ScrollSource, Submission, SubmissionController, SubmissionState,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn contact_form(dispatcher: &Arc<ManualDispatcher>) -> SubmissionController {
    SubmissionController::remote(
        "contact",
        FormSchema::new([
            FieldSpec::required("from_name"),
            FieldSpec::required("user_email"),
            FieldSpec::required("message"),
        ]),
        DispatchTarget::new("service_test", "template_test", Credential::new("public-key")),
        dispatcher.clone(),
    )
}

fn consultation_form() -> SubmissionController {
    SubmissionController::local(
        "consultation",
        FormSchema::new([
            FieldSpec::required("consultation_name"),
            FieldSpec::required("consultation_email"),
            FieldSpec::required("consultation_date"),
            FieldSpec::required("consultation_time"),
            FieldSpec::optional("consultation_message"),
        ]),
    )
}

/// A view that scrolls, unmounts, and leaves no listener behind
#[test]
fn test_scroll_offset_lifecycle() {
    let source = ScrollSource::new();
    let mut hero = ScrollOffsetController::with_default_damping();
    hero.activate(&source);

    for y in [0.0f64, 33.0, 250.0, 1024.5] {
        source.emit(ScrollPosition::new(y));
        assert_eq!(hero.offset().px(), y * 0.8);
    }
    let seen = hero.recomputations();

    drop(hero);
    assert_eq!(source.listener_count(), 0);
    source.emit(ScrollPosition::new(10.0));
    assert_eq!(source.listener_count(), 0);
    assert_eq!(seen, 4);
}

#[test]
fn test_faq_items_are_independent() {
    let mut faq = DisclosureList::from_pairs([
        ("How does it integrate?", "API connectors."),
        ("Can I use products independently?", "Yes."),
        ("How secure is it?", "Bank-level."),
    ]);

    faq.toggle(0);
    faq.toggle(2);
    faq.toggle(0);

    let flags: Vec<bool> = faq.iter().map(|item| item.is_expanded()).collect();
    assert_eq!(flags, vec![false, false, true]);
}

/// Fields {Ana, ana@x.com, Hello} are delivered once and then cleared
#[test]
fn test_contact_form_delivered_scenario() {
    let dispatcher = Arc::new(ManualDispatcher::new());
    let mut form = contact_form(&dispatcher);
    form.update_field("from_name", "Ana").unwrap();
    form.update_field("user_email", "ana@x.com").unwrap();
    form.update_field("message", "Hello").unwrap();

    let Submission::Dispatched(in_flight) = form.submit() else {
        panic!("contact form should dispatch");
    };
    assert_eq!(form.state(), SubmissionState::Sending);

    let expected: FormFields = [
        ("from_name", "Ana"),
        ("user_email", "ana@x.com"),
        ("message", "Hello"),
    ]
    .into_iter()
    .collect();
    let requests = dispatcher.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].params, expected);
    assert_eq!(requests[0].credential.expose(), "public-key");

    dispatcher.resolve_next(DispatchOutcome::Delivered);
    let state = pollster::block_on(in_flight.settle(&mut form));

    let cleared: FormFields = [("from_name", ""), ("user_email", ""), ("message", "")]
        .into_iter()
        .collect();
    assert_eq!(state, SubmissionState::Success);
    assert_eq!(form.fields(), &cleared);
    assert_eq!(form.status_message(), Some("Submitted."));
}

#[test]
fn test_contact_form_failure_then_retry() {
    let dispatcher = Arc::new(ManualDispatcher::new());
    let mut form = contact_form(&dispatcher);
    form.update_field("from_name", "Ana").unwrap();
    form.update_field("message", "Hello").unwrap();
    let before = form.fields().clone();

    let Submission::Dispatched(in_flight) = form.submit() else {
        panic!("contact form should dispatch");
    };
    assert!(matches!(form.submit(), Submission::Suppressed));

    dispatcher.resolve_next(DispatchOutcome::Failed(DispatchFailure::Rejected {
        status: 400,
        body: "The Public Key is invalid".to_string(),
    }));
    assert_eq!(
        pollster::block_on(in_flight.settle(&mut form)),
        SubmissionState::Failure
    );
    assert_eq!(form.fields(), &before);

    let Submission::Dispatched(retry) = form.submit() else {
        panic!("retry should dispatch");
    };
    dispatcher.resolve_next(DispatchOutcome::Delivered);
    assert_eq!(
        pollster::block_on(retry.settle(&mut form)),
        SubmissionState::Success
    );
    assert_eq!(dispatcher.call_count(), 2);
}

#[test]
fn test_consultation_form_never_dispatches() {
    let dispatcher = Arc::new(ManualDispatcher::new());
    let _contact = contact_form(&dispatcher);
    let mut form = consultation_form();
    form.update_field("consultation_name", "Ana").unwrap();
    form.update_field("consultation_email", "ana@x.com").unwrap();
    form.update_field("consultation_date", "2026-11-02").unwrap();
    form.update_field("consultation_time", "14:30").unwrap();

    assert!(matches!(form.submit(), Submission::Accepted));
    assert_eq!(form.state(), SubmissionState::Accepted);
    assert_eq!(dispatcher.call_count(), 0);
    assert!(form.missing_required().is_empty());
}
