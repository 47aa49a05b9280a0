//! Contact and consultation form definitions

use cashcached_core::{FieldKind, FieldSpec, FormSchema, SubmissionCopy};

/// Contact form: every field required, delivered by email
pub fn contact_schema() -> FormSchema {
    FormSchema::new([
        FieldSpec::required("from_name")
            .label("Name")
            .placeholder("Your name"),
        FieldSpec::required("user_email")
            .label("Email")
            .placeholder("your@email.com")
            .kind(FieldKind::Email),
        FieldSpec::required("message")
            .label("Message")
            .placeholder("Your message")
            .kind(FieldKind::TextArea),
    ])
}

pub fn contact_copy() -> SubmissionCopy {
    SubmissionCopy {
        submit_label: "Send Message".to_string(),
        sending_label: "Sending...".to_string(),
        success_message: "Message sent successfully!".to_string(),
        failure_message: "Failed to send message. Please try again.".to_string(),
    }
}

/// Consultation form: the message is the only optional field
pub fn consultation_schema() -> FormSchema {
    FormSchema::new([
        FieldSpec::required("consultation_name")
            .label("Name")
            .placeholder("Your name"),
        FieldSpec::required("consultation_email")
            .label("Email")
            .placeholder("your@email.com")
            .kind(FieldKind::Email),
        FieldSpec::required("consultation_date")
            .label("Preferred Date")
            .kind(FieldKind::Date),
        FieldSpec::required("consultation_time")
            .label("Preferred Time")
            .kind(FieldKind::Time),
        FieldSpec::optional("consultation_message")
            .label("Tell us about your needs")
            .placeholder("Brief description of your requirements")
            .kind(FieldKind::TextArea),
    ])
}

pub fn consultation_copy() -> SubmissionCopy {
    SubmissionCopy {
        submit_label: "Schedule Consultation".to_string(),
        sending_label: "Scheduling...".to_string(),
        success_message: "Consultation request received! We'll be in touch shortly."
            .to_string(),
        failure_message: "Failed to schedule consultation. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_fields_are_all_required() {
        let schema = contact_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["from_name", "user_email", "message"]);
        assert!(schema.fields().iter().all(|f| f.required));
    }

    #[test]
    fn consultation_message_is_optional() {
        let schema = consultation_schema();
        assert_eq!(schema.fields().len(), 5);
        let optional: Vec<&str> = schema
            .fields()
            .iter()
            .filter(|f| !f.required)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(optional, vec!["consultation_message"]);
        assert_eq!(
            schema.field("consultation_date").map(|f| f.kind),
            Some(FieldKind::Date)
        );
    }
}
