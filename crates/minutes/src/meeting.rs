//! Core meeting types.
//!
//! This module defines the meeting record aggregate and its sub-entities, in
//! the exact shape they are persisted in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::{self, iso_instant};

/// Progress of an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    /// Not started yet.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl ActionStatus {
    /// All statuses, in workflow order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// The label shown to users.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::InProgress => "Em Andamento",
            Self::Completed => "Concluída",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ActionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown action item status: {other}")),
        }
    }
}

/// Kinds of entity that carry a generated id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A meeting record.
    Meeting,
    /// A participant.
    Participant,
    /// A discussion.
    Discussion,
    /// A decision.
    Decision,
    /// An action item.
    ActionItem,
}

impl EntityKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Participant => "participant",
            Self::Discussion => "discussion",
            Self::Decision => "decision",
            Self::ActionItem => "action",
        }
    }
}

/// Generate a fresh client-side id for the given entity kind.
///
/// Ids are time-ordered (UUID v7), which keeps them unique across the whole
/// collection and not just within one list.
#[must_use]
pub fn generate_id(kind: EntityKind) -> String {
    format!("{}_{}", kind.prefix(), Uuid::now_v7().simple())
}

/// Someone who attended the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role in the meeting or organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Participant {
    /// Create a participant with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(EntityKind::Participant),
            name: name.into(),
            email: None,
            role: None,
        }
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A topic that was discussed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    /// Stable identifier.
    pub id: String,
    /// What was discussed.
    pub topic: String,
    /// Summary of the discussion.
    pub description: String,
    /// Extra remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Discussion {
    /// Create a discussion with a fresh id.
    #[must_use]
    pub fn new(topic: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: generate_id(EntityKind::Discussion),
            topic: topic.into(),
            description: description.into(),
            notes: None,
        }
    }
}

/// A decision that was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Stable identifier.
    pub id: String,
    /// What the decision is about.
    pub topic: String,
    /// The decision itself.
    pub decision: String,
    /// Why it was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl Decision {
    /// Create a decision with a fresh id.
    #[must_use]
    pub fn new(topic: impl Into<String>, decision: impl Into<String>) -> Self {
        Self {
            id: generate_id(EntityKind::Decision),
            topic: topic.into(),
            decision: decision.into(),
            rationale: None,
        }
    }
}

/// A follow-up task assigned during the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    /// Stable identifier.
    pub id: String,
    /// What has to be done.
    pub description: String,
    /// Who is responsible.
    pub responsible: String,
    /// When it is due.
    #[serde(with = "iso_instant")]
    pub due_date: DateTime<Utc>,
    /// Current progress.
    pub status: ActionStatus,
}

impl ActionItem {
    /// Create a pending action item with a fresh id.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        responsible: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id(EntityKind::ActionItem),
            description: description.into(),
            responsible: responsible.into(),
            due_date,
            status: ActionStatus::Pending,
        }
    }
}

/// The minutes of one meeting.
///
/// This is the aggregate root: the persisted collection is a sequence of
/// these, and every sub-entity lives inside exactly one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    /// Identifier, unique within the collection.
    pub id: String,
    /// Meeting title.
    pub title: String,
    /// Day the meeting took place.
    #[serde(with = "iso_instant")]
    pub date: DateTime<Utc>,
    /// Start time (`HH:mm`).
    pub start_time: String,
    /// End time (`HH:mm`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Where the meeting happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Attendees, in display order.
    pub participants: Vec<Participant>,
    /// Agenda items, in order.
    pub agenda: Vec<String>,
    /// Topics discussed.
    pub discussions: Vec<Discussion>,
    /// Decisions taken.
    pub decisions: Vec<Decision>,
    /// Follow-up tasks.
    pub action_items: Vec<ActionItem>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_notes: Option<String>,
    /// When the record was created. Never changes.
    #[serde(with = "iso_instant")]
    pub created_at: DateTime<Utc>,
    /// When the record was last saved.
    #[serde(with = "iso_instant")]
    pub updated_at: DateTime<Utc>,
}

impl MeetingRecord {
    /// Create an empty record with a fresh id, timestamped at `now`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        date: DateTime<Utc>,
        start_time: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let now = dates::to_millis(now);
        Self {
            id: generate_id(EntityKind::Meeting),
            title: title.into(),
            date,
            start_time: start_time.into(),
            end_time: None,
            location: None,
            participants: Vec::new(),
            agenda: Vec::new(),
            discussions: Vec::new(),
            decisions: Vec::new(),
            action_items: Vec::new(),
            general_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as saved at `now`, at millisecond precision.
    ///
    /// `updated_at` never goes below `created_at`, even with a skewed clock.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = dates::to_millis(now).max(self.created_at);
    }

    /// Every id carried by this record, its own first.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.id.as_str())
            .chain(self.participants.iter().map(|p| p.id.as_str()))
            .chain(self.discussions.iter().map(|d| d.id.as_str()))
            .chain(self.decisions.iter().map(|d| d.id.as_str()))
            .chain(self.action_items.iter().map(|a| a.id.as_str()))
    }

    /// Action items with the given status.
    pub fn action_items_by_status(
        &self,
        status: ActionStatus,
    ) -> impl Iterator<Item = &ActionItem> + '_ {
        self.action_items
            .iter()
            .filter(move |item| item.status == status)
    }

    /// Action items not started yet.
    pub fn pending_action_items(&self) -> impl Iterator<Item = &ActionItem> + '_ {
        self.action_items_by_status(ActionStatus::Pending)
    }

    /// Action items being worked on.
    pub fn in_progress_action_items(&self) -> impl Iterator<Item = &ActionItem> + '_ {
        self.action_items_by_status(ActionStatus::InProgress)
    }

    /// Action items that are done.
    pub fn completed_action_items(&self) -> impl Iterator<Item = &ActionItem> + '_ {
        self.action_items_by_status(ActionStatus::Completed)
    }

    /// How long the meeting lasted, from its start and end times.
    #[must_use]
    pub fn duration(&self) -> MeetingDuration {
        MeetingDuration::between(&self.start_time, self.end_time.as_deref())
    }
}

/// Sort records newest meeting date first. Ties keep their stored order.
pub fn sort_by_date_desc(records: &mut [MeetingRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Length of a meeting as shown in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingDuration {
    /// No end time recorded.
    Ongoing,
    /// Less than an hour.
    Minutes(i64),
    /// A whole number of hours.
    Hours(i64),
    /// Hours and leftover minutes.
    HoursMinutes(i64, i64),
    /// The times could not be interpreted.
    Invalid,
}

impl MeetingDuration {
    /// Compute the duration between two `HH:mm` times.
    #[must_use]
    pub fn between(start: &str, end: Option<&str>) -> Self {
        let Some(end) = end.filter(|e| !e.trim().is_empty()) else {
            return Self::Ongoing;
        };
        let (Some(start), Some(end)) = (dates::parse_time_of_day(start), dates::parse_time_of_day(end))
        else {
            return Self::Invalid;
        };

        let minutes = (end - start).num_minutes();
        if minutes < 0 {
            Self::Invalid
        } else if minutes < 60 {
            Self::Minutes(minutes)
        } else if minutes % 60 == 0 {
            Self::Hours(minutes / 60)
        } else {
            Self::HoursMinutes(minutes / 60, minutes % 60)
        }
    }
}

impl fmt::Display for MeetingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "Em andamento"),
            Self::Minutes(m) => write!(f, "{m} minutos"),
            Self::Hours(1) => write!(f, "1 hora"),
            Self::Hours(h) => write!(f, "{h} horas"),
            Self::HoursMinutes(h, m) => write!(f, "{h}h {m}min"),
            Self::Invalid => write!(f, "Duração inválida"),
        }
    }
}
