//! Printable layout of a meeting record.
//!
//! [`render_view`] turns a record into an ordered list of styled text blocks,
//! the same content shown on screen when a meeting is opened. Views are kept
//! in a [`ViewRegistry`] under an element id so the exporter can find the
//! region to print.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::dates;
use crate::meeting::MeetingRecord;

/// Element id given to views built by [`render_view`].
pub const DEFAULT_ELEMENT_ID: &str = "meeting-minutes-content";

const NOT_INFORMED: &str = "Não informado";

/// Visual role of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// Document title.
    Title,
    /// Meeting title under the document title.
    Subtitle,
    /// Section heading.
    Heading,
    /// Heading of an entry inside a section.
    Subheading,
    /// Regular text.
    Body,
    /// Secondary text such as notes.
    Emphasis,
    /// Footer text.
    Footer,
}

impl BlockStyle {
    /// Font size relative to the base size.
    #[must_use]
    pub fn scale(self) -> f32 {
        match self {
            Self::Title => 1.6,
            Self::Subtitle => 1.3,
            Self::Heading => 1.15,
            Self::Subheading => 1.05,
            Self::Body | Self::Emphasis => 1.0,
            Self::Footer => 0.85,
        }
    }

    /// Whether the block is set in bold.
    #[must_use]
    pub fn is_bold(self) -> bool {
        matches!(self, Self::Title | Self::Heading | Self::Subheading)
    }
}

/// One paragraph of styled text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// How the block is drawn.
    pub style: BlockStyle,
    /// The text, unwrapped.
    pub text: String,
}

impl Block {
    fn new(style: BlockStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// A rendered region of the screen, addressable by element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    /// Id used to look the region up.
    pub element_id: String,
    /// Blocks in display order.
    pub blocks: Vec<Block>,
}

impl RenderedView {
    /// Give the view a different element id.
    #[must_use]
    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = element_id.into();
        self
    }

    /// All block texts joined by newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, style: BlockStyle, text: impl Into<String>) {
        self.blocks.push(Block::new(style, text));
    }
}

/// Build the printable view of `record`, stamped with `generated_at`.
#[must_use]
pub fn render_view(record: &MeetingRecord, generated_at: DateTime<Utc>) -> RenderedView {
    let mut view = RenderedView {
        element_id: DEFAULT_ELEMENT_ID.to_string(),
        blocks: Vec::new(),
    };

    view.push(BlockStyle::Title, "ATA DE REUNIÃO");
    view.push(BlockStyle::Subtitle, record.title.as_str());

    view.push(BlockStyle::Heading, "INFORMAÇÕES GERAIS");
    view.push(
        BlockStyle::Body,
        format!("Data: {}", dates::format_date(&record.date)),
    );
    view.push(
        BlockStyle::Body,
        format!("Horário de Início: {}", or_not_informed(Some(&record.start_time))),
    );
    view.push(
        BlockStyle::Body,
        format!(
            "Horário de Término: {}",
            or_not_informed(record.end_time.as_deref())
        ),
    );
    view.push(
        BlockStyle::Body,
        format!("Local: {}", or_not_informed(record.location.as_deref())),
    );

    view.push(BlockStyle::Heading, "PARTICIPANTES");
    for p in &record.participants {
        let mut line = format!("• {}", p.name);
        if let Some(role) = p.role.as_deref().filter(|r| !r.is_empty()) {
            line.push_str(&format!(" - {role}"));
        }
        if let Some(email) = p.email.as_deref().filter(|e| !e.is_empty()) {
            line.push_str(&format!(" ({email})"));
        }
        view.push(BlockStyle::Body, line);
    }

    if !record.agenda.is_empty() {
        view.push(BlockStyle::Heading, "PAUTA");
        for item in &record.agenda {
            view.push(BlockStyle::Body, format!("• {item}"));
        }
    }

    if !record.discussions.is_empty() {
        view.push(BlockStyle::Heading, "DISCUSSÕES");
        for d in &record.discussions {
            view.push(BlockStyle::Subheading, d.topic.as_str());
            view.push(BlockStyle::Body, d.description.as_str());
            if let Some(notes) = d.notes.as_deref().filter(|n| !n.is_empty()) {
                view.push(BlockStyle::Emphasis, format!("Observações: {notes}"));
            }
        }
    }

    if !record.decisions.is_empty() {
        view.push(BlockStyle::Heading, "DECISÕES TOMADAS");
        for d in &record.decisions {
            view.push(BlockStyle::Subheading, d.topic.as_str());
            view.push(BlockStyle::Body, format!("Decisão: {}", d.decision));
            if let Some(rationale) = d.rationale.as_deref().filter(|r| !r.is_empty()) {
                view.push(BlockStyle::Body, format!("Justificativa: {rationale}"));
            }
        }
    }

    if !record.action_items.is_empty() {
        view.push(BlockStyle::Heading, "AÇÕES E TAREFAS");
        view.push(
            BlockStyle::Subheading,
            "Descrição | Responsável | Prazo | Status",
        );
        for item in &record.action_items {
            view.push(
                BlockStyle::Body,
                format!(
                    "{} | {} | {} | {}",
                    item.description,
                    item.responsible,
                    dates::format_date(&item.due_date),
                    item.status.label()
                ),
            );
        }
    }

    if let Some(notes) = record.general_notes.as_deref().filter(|n| !n.is_empty()) {
        view.push(BlockStyle::Heading, "OBSERVAÇÕES GERAIS");
        view.push(BlockStyle::Body, notes);
    }

    view.push(
        BlockStyle::Footer,
        format!(
            "Ata gerada em {} às {}",
            dates::format_date(&generated_at),
            generated_at.format(dates::TIME_OF_DAY_FORMAT)
        ),
    );
    view.push(BlockStyle::Footer, "Sistema de Criação de Atas de Reunião");

    view
}

fn or_not_informed(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_INFORMED,
    }
}

/// Rendered views by element id.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: HashMap<String, RenderedView>,
}

impl ViewRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `view`, replacing any view with the same id. Returns the id.
    pub fn insert(&mut self, view: RenderedView) -> String {
        let id = view.element_id.clone();
        self.views.insert(id.clone(), view);
        id
    }

    /// Look a view up.
    #[must_use]
    pub fn get(&self, element_id: &str) -> Option<&RenderedView> {
        self.views.get(element_id)
    }

    /// Drop a view, returning it if it was registered.
    pub fn remove(&mut self, element_id: &str) -> Option<RenderedView> {
        self.views.remove(element_id)
    }
}
