//! Page model: what one render of the radar shows.
//!
//! A [`Page`] holds one [`Section`] per selected source, in registry order.
//! A section either lists the source's items or carries the "could not load"
//! warning. Both the terminal UI and the plain/JSON printers draw from this
//! model, so the choice between items and warning is made in one place.

use crate::feed::{fetch_selected, FetchOutcome, FetchSettings, NewsItem, Source, SourceReport};
use chrono::{DateTime, Local};
use serde::Serialize;

pub const PAGE_TITLE: &str = "📰 Radar de Informação Estratégica";
pub const SECTION_HEADING_PREFIX: &str = "Últimas atualizações: ";
pub const UNAVAILABLE_WARNING: &str =
    "Não foi possível carregar as notícias desta fonte no momento.";
pub const NO_SELECTION_PROMPT: &str = "👈 Selecione pelo menos uma fonte na barra lateral.";
pub const READ_MORE_LABEL: &str = "👉 Ler matéria completa";
pub const SIDEBAR_NOTICE: &str =
    "ℹ️ Este painel busca dados diretamente das fontes oficiais, sem algoritmos de recomendação.";

/// Format of the "last updated" stamp, e.g. `16/10/2026 09:30`.
pub const UPDATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// "Atualizado em: ..." line for the page header.
pub fn updated_at_line(at: DateTime<Local>) -> String {
    format!("Atualizado em: {}", at.format(UPDATED_AT_FORMAT))
}

/// Body of a source's section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionBody {
    Items { items: Vec<NewsItem> },
    /// The fetch failed (`reason` set) or returned no entries (`reason` unset).
    Unavailable { reason: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: String,
    pub url: String,
    pub body: SectionBody,
}

impl Section {
    pub fn heading(&self) -> String {
        format!("{}{}", SECTION_HEADING_PREFIX, self.label)
    }

    /// Items of this section; empty when unavailable.
    pub fn items(&self) -> &[NewsItem] {
        match &self.body {
            SectionBody::Items { items } => items,
            SectionBody::Unavailable { .. } => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self.body, SectionBody::Unavailable { .. })
    }
}

/// Map a fetch outcome to a section body. An empty successful fetch is shown
/// the same way as a failure.
pub fn section_body(outcome: &FetchOutcome) -> SectionBody {
    match outcome {
        FetchOutcome::Loaded(items) if !items.is_empty() => SectionBody::Items {
            items: items.clone(),
        },
        FetchOutcome::Loaded(_) => SectionBody::Unavailable { reason: None },
        FetchOutcome::Failed(reason) => SectionBody::Unavailable {
            reason: Some(reason.clone()),
        },
    }
}

impl From<SourceReport> for Section {
    fn from(report: SourceReport) -> Self {
        let body = section_body(&report.outcome);
        Self {
            label: report.source.label,
            url: report.source.url,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub updated_at: String,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn from_reports(reports: Vec<SourceReport>, updated_at: DateTime<Local>) -> Self {
        Self {
            updated_at: updated_at.format(UPDATED_AT_FORMAT).to_string(),
            sections: reports.into_iter().map(Section::from).collect(),
        }
    }

    /// True when no source was selected (not when sources failed).
    pub fn has_no_selection(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Fetch every selected source once and assemble the page.
pub async fn fetch_page(
    client: &reqwest::Client,
    selected: &[Source],
    settings: &FetchSettings,
) -> Page {
    let reports = fetch_selected(client, selected, settings).await;
    Page::from_reports(reports, Local::now())
}
