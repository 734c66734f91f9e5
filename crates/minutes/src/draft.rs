//! Form data and the create/edit flows.
//!
//! A [`MeetingDraft`] is what a form (or a draft file) holds before it becomes
//! a [`MeetingRecord`]: plain strings, possibly empty, possibly invalid.
//! Turning a draft into a record always validates first, so storage is never
//! reached with bad data.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use figment::providers::{Format, Json, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::error::{Error, Result};
use crate::meeting::{
    generate_id, ActionItem, ActionStatus, Decision, Discussion, EntityKind, MeetingRecord,
    Participant,
};
use crate::validation::validate_draft;

/// Editable meeting data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeetingDraft {
    /// Meeting title.
    pub title: String,
    /// Calendar date, `yyyy-MM-dd`.
    pub date: String,
    /// Start time, `HH:mm`.
    #[serde(alias = "start_time")]
    pub start_time: String,
    /// End time, `HH:mm`. Empty when unknown.
    #[serde(alias = "end_time")]
    pub end_time: String,
    /// Location. Empty when unknown.
    pub location: String,
    /// Attendees.
    pub participants: Vec<ParticipantDraft>,
    /// Agenda items. Blank entries are dropped.
    pub agenda: Vec<String>,
    /// Topics discussed.
    pub discussions: Vec<DiscussionDraft>,
    /// Decisions taken.
    pub decisions: Vec<DecisionDraft>,
    /// Follow-up tasks.
    #[serde(alias = "action_items")]
    pub action_items: Vec<ActionItemDraft>,
    /// Free-form notes.
    #[serde(alias = "general_notes")]
    pub general_notes: String,
}

/// Editable participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantDraft {
    /// Existing id, kept on edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Email, empty when none.
    pub email: String,
    /// Role, empty when none.
    pub role: String,
}

/// Editable discussion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionDraft {
    /// Existing id, kept on edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// What was discussed.
    pub topic: String,
    /// Summary.
    pub description: String,
    /// Extra remarks.
    pub notes: String,
}

/// Editable decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionDraft {
    /// Existing id, kept on edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// What the decision is about.
    pub topic: String,
    /// The decision itself.
    pub decision: String,
    /// Why it was taken.
    pub rationale: String,
}

/// Editable action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionItemDraft {
    /// Existing id, kept on edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// What has to be done.
    pub description: String,
    /// Who is responsible.
    pub responsible: String,
    /// Due date, `yyyy-MM-dd` or a full ISO instant.
    #[serde(alias = "due_date")]
    pub due_date: String,
    /// One of `pending`, `in-progress`, `completed`.
    pub status: String,
}

impl Default for ActionItemDraft {
    fn default() -> Self {
        Self {
            id: None,
            description: String::new(),
            responsible: String::new(),
            due_date: String::new(),
            status: ActionStatus::Pending.to_string(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Sub-entity ids a draft may carry over. Anything else gets a fresh id.
type KnownIds<'a> = HashSet<&'a str>;

fn id_or_new(id: Option<&String>, known: &KnownIds<'_>, kind: EntityKind) -> String {
    id.filter(|id| known.contains(id.as_str()))
        .cloned()
        .unwrap_or_else(|| generate_id(kind))
}

/// Parse a field `validate_draft` has already accepted.
fn validated_instant(value: &str, field: &str) -> Result<DateTime<Utc>> {
    dates::parse_iso(value).ok_or_else(|| {
        Error::Validation(
            vec![crate::validation::FieldError::new(field, "Data inválida")].into(),
        )
    })
}

impl MeetingDraft {
    /// Read a draft from a TOML or JSON file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Decode(format!("draft file not found: {}", path.display())));
        }
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let figment = if is_json {
            Figment::from(Json::file(path))
        } else {
            Figment::from(Toml::file(path))
        };
        figment
            .extract()
            .map_err(|e| Error::Decode(format!("{}: {e}", path.display())))
    }

    /// Run the create-flow: validate, then build a new record with fresh ids
    /// and both timestamps set to `now` (to the millisecond).
    ///
    /// Ids carried by the draft are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the draft is invalid.
    pub fn create(&self, now: DateTime<Utc>) -> Result<MeetingRecord> {
        validate_draft(self)?;
        let now = dates::to_millis(now);
        self.build(generate_id(EntityKind::Meeting), &KnownIds::new(), now, now)
    }

    /// Run the edit-flow against `existing`: validate, then rebuild the record
    /// keeping its id and creation time and refreshing its update time.
    ///
    /// Sub-entity ids are kept only when `existing` already owns them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the draft is invalid.
    pub fn apply(&self, existing: &MeetingRecord, now: DateTime<Utc>) -> Result<MeetingRecord> {
        validate_draft(self)?;
        let known: KnownIds<'_> = existing.ids().skip(1).collect();
        let mut record = self.build(
            existing.id.clone(),
            &known,
            existing.created_at,
            existing.created_at,
        )?;
        record.touch(now);
        Ok(record)
    }

    /// Pre-fill a draft from a stored record, for editing.
    #[must_use]
    pub fn from_record(record: &MeetingRecord) -> Self {
        Self {
            title: record.title.clone(),
            date: dates::format_iso_date(&record.date),
            start_time: record.start_time.clone(),
            end_time: record.end_time.clone().unwrap_or_default(),
            location: record.location.clone().unwrap_or_default(),
            participants: record
                .participants
                .iter()
                .map(|p| ParticipantDraft {
                    id: Some(p.id.clone()),
                    name: p.name.clone(),
                    email: p.email.clone().unwrap_or_default(),
                    role: p.role.clone().unwrap_or_default(),
                })
                .collect(),
            agenda: record.agenda.clone(),
            discussions: record
                .discussions
                .iter()
                .map(|d| DiscussionDraft {
                    id: Some(d.id.clone()),
                    topic: d.topic.clone(),
                    description: d.description.clone(),
                    notes: d.notes.clone().unwrap_or_default(),
                })
                .collect(),
            decisions: record
                .decisions
                .iter()
                .map(|d| DecisionDraft {
                    id: Some(d.id.clone()),
                    topic: d.topic.clone(),
                    decision: d.decision.clone(),
                    rationale: d.rationale.clone().unwrap_or_default(),
                })
                .collect(),
            action_items: record
                .action_items
                .iter()
                .map(|a| ActionItemDraft {
                    id: Some(a.id.clone()),
                    description: a.description.clone(),
                    responsible: a.responsible.clone(),
                    due_date: dates::to_iso(&a.due_date),
                    status: a.status.to_string(),
                })
                .collect(),
            general_notes: record.general_notes.clone().unwrap_or_default(),
        }
    }

    fn build(
        &self,
        id: String,
        known: &KnownIds<'_>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<MeetingRecord> {
        let date = validated_instant(&self.date, "date")?;

        let participants = self
            .participants
            .iter()
            .map(|p| Participant {
                id: id_or_new(p.id.as_ref(), known, EntityKind::Participant),
                name: p.name.trim().to_string(),
                email: optional(&p.email),
                role: optional(&p.role),
            })
            .collect();

        let discussions = self
            .discussions
            .iter()
            .map(|d| Discussion {
                id: id_or_new(d.id.as_ref(), known, EntityKind::Discussion),
                topic: d.topic.trim().to_string(),
                description: d.description.trim().to_string(),
                notes: optional(&d.notes),
            })
            .collect();

        let decisions = self
            .decisions
            .iter()
            .map(|d| Decision {
                id: id_or_new(d.id.as_ref(), known, EntityKind::Decision),
                topic: d.topic.trim().to_string(),
                decision: d.decision.trim().to_string(),
                rationale: optional(&d.rationale),
            })
            .collect();

        let action_items = self
            .action_items
            .iter()
            .enumerate()
            .map(|(i, a)| {
                Ok(ActionItem {
                    id: id_or_new(a.id.as_ref(), known, EntityKind::ActionItem),
                    description: a.description.trim().to_string(),
                    responsible: a.responsible.trim().to_string(),
                    due_date: validated_instant(&a.due_date, &format!("actionItems[{i}].dueDate"))?,
                    status: a.status.parse().unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MeetingRecord {
            id,
            title: self.title.trim().to_string(),
            date,
            start_time: self.start_time.trim().to_string(),
            end_time: optional(&self.end_time),
            location: optional(&self.location),
            participants,
            agenda: self
                .agenda
                .iter()
                .filter_map(|item| optional(item))
                .collect(),
            discussions,
            decisions,
            action_items,
            general_notes: optional(&self.general_notes),
            created_at,
            updated_at,
        })
    }
}
