/// Handler modules for EGYMI Compass tools
pub mod help;

use serde::Serialize;
use std::sync::Arc;

use crate::advisor::RegulationAdvisor;
use crate::error::{CompassError, Result};
use crate::models::{Answer, Query, QueryKind, QuickTopic};
use crate::regulations;
use crate::state::{TabState, TabStates};

pub use help::HelpHandler;

/// Per-tab view returned by the status tool
#[derive(Debug, Serialize)]
pub struct TabReport {
    pub tab: &'static str,
    pub kind: QueryKind,
    #[serde(flatten)]
    pub state: TabState,
}

/// Shared by every shell: submits queries through the advisor while keeping
/// per-tab state.
pub struct ToolHandlers {
    pub(crate) advisor: Arc<RegulationAdvisor>,
    pub(crate) tabs: Arc<TabStates>,
    pub(crate) help: HelpHandler,
}

impl ToolHandlers {
    pub fn new(advisor: Arc<RegulationAdvisor>, tabs: Arc<TabStates>) -> Self {
        Self {
            advisor,
            tabs,
            help: HelpHandler::new(),
        }
    }

    pub async fn submit(&self, query: Query) -> Result<Answer> {
        let kind = query.kind;
        let ticket = self.tabs.begin(&query)?;

        match self.advisor.ask(&query).await {
            Ok(answer) => {
                ticket.complete(answer.clone());
                Ok(answer)
            }
            // Rejected before any request: the tab keeps its previous state.
            Err(e @ CompassError::InvalidInput(_)) => {
                drop(ticket);
                Err(e)
            }
            Err(e) => {
                ticket.fail(user_message(kind, &e));
                Err(e)
            }
        }
    }

    /// Re-submit the last query of a tab.
    pub async fn retry(&self, kind: QueryKind) -> Result<Answer> {
        let query = self.tabs.retry_query(kind).ok_or_else(|| {
            CompassError::InvalidInput(format!("nothing to retry on the '{}' tab", kind.tab()))
        })?;
        tracing::info!(tab = %kind, "Manual retry");
        self.submit(query).await
    }

    pub fn status(&self) -> Vec<TabReport> {
        self.tabs
            .snapshot()
            .into_iter()
            .map(|(kind, state)| TabReport {
                tab: kind.tab(),
                kind,
                state,
            })
            .collect()
    }
}

/// Regulation-detail query; a missing title is filled from the core catalog.
pub fn regulation_query(law_id: &str, law_title: Option<&str>) -> Query {
    let title = law_title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| regulations::find(law_id).map(|r| r.title))
        .unwrap_or_default();
    Query::regulation_detail(law_id.trim(), title)
}

/// Knowledge query from a free question, or from a quick topic when one is given.
pub fn knowledge_query(question: &str, topic: Option<usize>) -> Result<Query> {
    match topic {
        Some(number) => regulations::topic(number)
            .map(Query::knowledge)
            .ok_or_else(|| {
                CompassError::InvalidInput(format!(
                    "unknown quick topic {number} (1-{})",
                    regulations::QUICK_TOPICS.len()
                ))
            }),
        None => Ok(Query::knowledge(question)),
    }
}

pub fn quick_topics() -> Vec<QuickTopic> {
    regulations::QUICK_TOPICS
        .iter()
        .enumerate()
        .map(|(i, question)| QuickTopic {
            number: i + 1,
            question,
        })
        .collect()
}

/// Map a tab name (or kind name) to its query kind.
pub fn parse_tab(name: &str) -> Option<QueryKind> {
    let name = name.trim().to_lowercase();
    QueryKind::ALL.into_iter().find(|kind| {
        kind.tab() == name
            || serde_json::to_value(kind)
                .ok()
                .and_then(|v| v.as_str().map(|s| s == name))
                .unwrap_or(false)
    })
}

/// User-facing message for a failed request on the given tab.
pub fn user_message(kind: QueryKind, err: &CompassError) -> String {
    if err.is_service_failure() {
        return kind.failure_message().to_string();
    }
    match err {
        CompassError::Config(detail) => format!("Konfigurációs hiba: {detail}"),
        CompassError::Busy(_) => "A kérés már folyamatban van, várd meg a választ.".to_string(),
        _ => "Adj meg egy kérdést vagy jogszabályszöveget.".to_string(),
    }
}
