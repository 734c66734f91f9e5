//! Field validation for meeting drafts and records.
//!
//! Validation runs before any storage call. Failures are reported per field,
//! using the same field paths the form inputs use (`participants[0].email`),
//! so each message can be shown next to the offending input.
//!
//! # Example
//!
//! ```
//! use meeting_minutes::draft::MeetingDraft;
//! use meeting_minutes::validation::validate_draft;
//!
//! let draft = MeetingDraft {
//!     title: "Sprint Planning".to_string(),
//!     date: "2024-05-01".to_string(),
//!     start_time: "09:00".to_string(),
//!     ..MeetingDraft::default()
//! };
//! assert!(validate_draft(&draft).is_ok());
//!
//! let errors = validate_draft(&MeetingDraft::default()).unwrap_err();
//! assert!(errors.for_field("title").is_some());
//! ```

mod patterns;

use std::collections::HashSet;
use std::fmt;

use crate::dates;
use crate::draft::MeetingDraft;
use crate::meeting::{ActionStatus, MeetingRecord};

pub use patterns::is_valid_email;

/// A validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the offending field, e.g. `actionItems[2].dueDate`.
    pub field: String,
    /// Message to show next to the field.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Whether no errors were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// The first error reported for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    fn push(&mut self, field: impl Into<String>, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Messages shown to users.
mod messages {
    pub const TITLE_REQUIRED: &str = "Título é obrigatório";
    pub const DATE_REQUIRED: &str = "Data é obrigatória";
    pub const DATE_INVALID: &str = "Data inválida";
    pub const START_TIME_REQUIRED: &str = "Horário de início é obrigatório";
    pub const NAME_REQUIRED: &str = "Nome é obrigatório";
    pub const EMAIL_INVALID: &str = "Email inválido";
    pub const TOPIC_REQUIRED: &str = "Tópico é obrigatório";
    pub const DESCRIPTION_REQUIRED: &str = "Descrição é obrigatória";
    pub const DECISION_REQUIRED: &str = "Decisão é obrigatória";
    pub const RESPONSIBLE_REQUIRED: &str = "Responsável é obrigatório";
    pub const DUE_DATE_REQUIRED: &str = "Prazo é obrigatório";
    pub const DUE_DATE_INVALID: &str = "Prazo inválido";
    pub const STATUS_INVALID: &str = "Status inválido";
    pub const DUPLICATE_ID: &str = "Identificador duplicado";
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate form data before a record is built from it.
///
/// # Errors
///
/// Returns every field error found, in form order.
pub fn validate_draft(draft: &MeetingDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if is_blank(&draft.title) {
        errors.push("title", messages::TITLE_REQUIRED);
    }
    if is_blank(&draft.date) {
        errors.push("date", messages::DATE_REQUIRED);
    } else if dates::parse_iso(&draft.date).is_none() {
        errors.push("date", messages::DATE_INVALID);
    }
    if is_blank(&draft.start_time) {
        errors.push("startTime", messages::START_TIME_REQUIRED);
    }

    for (i, participant) in draft.participants.iter().enumerate() {
        check_participant(&mut errors, i, &participant.name, &participant.email);
    }
    for (i, discussion) in draft.discussions.iter().enumerate() {
        check_discussion(&mut errors, i, &discussion.topic, &discussion.description);
    }
    for (i, decision) in draft.decisions.iter().enumerate() {
        check_decision(&mut errors, i, &decision.topic, &decision.decision);
    }
    for (i, item) in draft.action_items.iter().enumerate() {
        check_action_item(&mut errors, i, &item.description, &item.responsible);
        if is_blank(&item.due_date) {
            errors.push(format!("actionItems[{i}].dueDate"), messages::DUE_DATE_REQUIRED);
        } else if dates::parse_iso(&item.due_date).is_none() {
            errors.push(format!("actionItems[{i}].dueDate"), messages::DUE_DATE_INVALID);
        }
        if item.status.parse::<ActionStatus>().is_err() {
            errors.push(format!("actionItems[{i}].status"), messages::STATUS_INVALID);
        }
    }

    let ids = draft
        .participants
        .iter()
        .map(|p| p.id.as_deref())
        .chain(draft.discussions.iter().map(|d| d.id.as_deref()))
        .chain(draft.decisions.iter().map(|d| d.id.as_deref()))
        .chain(draft.action_items.iter().map(|a| a.id.as_deref()))
        .flatten();
    check_unique_ids(&mut errors, ids);

    errors.into_result()
}

/// Validate a complete record against the schema contract.
///
/// Types already guarantee the due dates and statuses; this checks the
/// required text fields, email syntax and id uniqueness.
///
/// # Errors
///
/// Returns every field error found.
pub fn validate_record(record: &MeetingRecord) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if is_blank(&record.title) {
        errors.push("title", messages::TITLE_REQUIRED);
    }
    if is_blank(&record.start_time) {
        errors.push("startTime", messages::START_TIME_REQUIRED);
    }
    for (i, participant) in record.participants.iter().enumerate() {
        let email = participant.email.as_deref().unwrap_or_default();
        check_participant(&mut errors, i, &participant.name, email);
    }
    for (i, discussion) in record.discussions.iter().enumerate() {
        check_discussion(&mut errors, i, &discussion.topic, &discussion.description);
    }
    for (i, decision) in record.decisions.iter().enumerate() {
        check_decision(&mut errors, i, &decision.topic, &decision.decision);
    }
    for (i, item) in record.action_items.iter().enumerate() {
        check_action_item(&mut errors, i, &item.description, &item.responsible);
    }
    check_unique_ids(&mut errors, record.ids());

    errors.into_result()
}

/// Check that none of `record`'s ids is already used by another record.
///
/// `others` must not contain `record` itself.
///
/// # Errors
///
/// Returns one error per id found elsewhere in the collection.
pub fn validate_ids_free<'a>(
    record: &MeetingRecord,
    others: impl IntoIterator<Item = &'a MeetingRecord>,
) -> Result<(), ValidationErrors> {
    let taken: HashSet<&str> = others.into_iter().flat_map(|m| m.ids()).collect();
    let mut errors = ValidationErrors::default();
    for id in record.ids().filter(|id| taken.contains(id)) {
        errors.push(format!("id:{id}"), messages::DUPLICATE_ID);
    }
    errors.into_result()
}

fn check_participant(errors: &mut ValidationErrors, i: usize, name: &str, email: &str) {
    if is_blank(name) {
        errors.push(format!("participants[{i}].name"), messages::NAME_REQUIRED);
    }
    // An empty email is the same as no email.
    if !is_blank(email) && !is_valid_email(email) {
        errors.push(format!("participants[{i}].email"), messages::EMAIL_INVALID);
    }
}

fn check_discussion(errors: &mut ValidationErrors, i: usize, topic: &str, description: &str) {
    if is_blank(topic) {
        errors.push(format!("discussions[{i}].topic"), messages::TOPIC_REQUIRED);
    }
    if is_blank(description) {
        errors.push(
            format!("discussions[{i}].description"),
            messages::DESCRIPTION_REQUIRED,
        );
    }
}

fn check_decision(errors: &mut ValidationErrors, i: usize, topic: &str, decision: &str) {
    if is_blank(topic) {
        errors.push(format!("decisions[{i}].topic"), messages::TOPIC_REQUIRED);
    }
    if is_blank(decision) {
        errors.push(format!("decisions[{i}].decision"), messages::DECISION_REQUIRED);
    }
}

fn check_action_item(errors: &mut ValidationErrors, i: usize, description: &str, responsible: &str) {
    if is_blank(description) {
        errors.push(
            format!("actionItems[{i}].description"),
            messages::DESCRIPTION_REQUIRED,
        );
    }
    if is_blank(responsible) {
        errors.push(
            format!("actionItems[{i}].responsible"),
            messages::RESPONSIBLE_REQUIRED,
        );
    }
}

fn check_unique_ids<'a>(errors: &mut ValidationErrors, ids: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(format!("id:{id}"), messages::DUPLICATE_ID);
        }
    }
}
