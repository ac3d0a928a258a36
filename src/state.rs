//! Per-tab request state for the shells.
//!
//! Each tab allows one outstanding request. A tab's slot is written only by
//! the ticket of its own request, so a late answer for a tab the user left
//! still lands in that tab.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{CompassError, Result};
use crate::models::{Answer, Query, QueryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TabStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabState {
    pub status: TabStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_answer: Option<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Last submitted query, kept for manual retry
    #[serde(skip)]
    pub last_query: Option<Query>,
}

impl Default for TabState {
    fn default() -> Self {
        Self {
            status: TabStatus::Idle,
            last_answer: None,
            last_error: None,
            updated_at: None,
            last_query: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct TabStates {
    tabs: Mutex<HashMap<QueryKind, TabState>>,
}

impl TabStates {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKind, TabState>> {
        self.tabs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark the tab as loading. Fails with `Busy` while a request is outstanding.
    pub fn begin(&self, query: &Query) -> Result<TabTicket<'_>> {
        let kind = query.kind;
        let mut tabs = self.lock();
        let tab = tabs.entry(kind).or_default();
        if tab.status == TabStatus::Loading {
            tracing::warn!(tab = %kind, "Rejecting submission, request already in flight");
            return Err(CompassError::Busy(kind.tab().to_string()));
        }
        let previous = tab.status;
        let previous_query = tab.last_query.replace(query.clone());
        tab.status = TabStatus::Loading;
        tab.updated_at = Some(Utc::now());
        Ok(TabTicket {
            states: self,
            kind,
            previous,
            previous_query,
            resolved: false,
        })
    }

    /// The query to re-submit for a manual retry, if the tab has one.
    pub fn retry_query(&self, kind: QueryKind) -> Option<Query> {
        self.lock().get(&kind).and_then(|tab| tab.last_query.clone())
    }

    pub fn get(&self, kind: QueryKind) -> TabState {
        self.lock().get(&kind).cloned().unwrap_or_default()
    }

    /// All four tabs in display order.
    pub fn snapshot(&self) -> Vec<(QueryKind, TabState)> {
        let tabs = self.lock();
        QueryKind::ALL
            .iter()
            .map(|kind| (*kind, tabs.get(kind).cloned().unwrap_or_default()))
            .collect()
    }
}

/// Outstanding request for one tab. Dropping it unresolved restores the
/// status and retry query the tab had before `begin`.
pub struct TabTicket<'a> {
    states: &'a TabStates,
    kind: QueryKind,
    previous: TabStatus,
    previous_query: Option<Query>,
    resolved: bool,
}

impl TabTicket<'_> {
    pub fn complete(mut self, answer: Answer) {
        let mut tabs = self.states.lock();
        let tab = tabs.entry(self.kind).or_default();
        tab.status = TabStatus::Success;
        tab.last_answer = Some(answer);
        tab.last_error = None;
        tab.updated_at = Some(Utc::now());
        self.resolved = true;
    }

    pub fn fail(mut self, message: impl Into<String>) {
        let mut tabs = self.states.lock();
        let tab = tabs.entry(self.kind).or_default();
        tab.status = TabStatus::Error;
        tab.last_error = Some(message.into());
        tab.updated_at = Some(Utc::now());
        self.resolved = true;
    }
}

impl Drop for TabTicket<'_> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let mut tabs = self.states.lock();
        if let Some(tab) = tabs.get_mut(&self.kind) {
            tab.status = self.previous;
            tab.last_query = self.previous_query.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn query(kind: QueryKind) -> Query {
        match kind {
            QueryKind::FreeTextAnalysis => Query::analysis("szöveg"),
            QueryKind::LatestChanges => Query::latest_changes(),
            QueryKind::KnowledgeLookup => Query::knowledge("kérdés"),
            QueryKind::RegulationDetail => Query::regulation_detail("2011. évi CXC. törvény", "Nkt."),
        }
    }

    fn answer(kind: QueryKind, text: &str) -> Answer {
        Answer {
            request_id: Uuid::new_v4(),
            kind,
            text: text.to_string(),
            institutional_analysis: None,
            sources: vec![],
            model: "m".to_string(),
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn tabs_start_idle() {
        let states = TabStates::new();
        let snapshot = states.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert!(snapshot.iter().all(|(_, s)| s.status == TabStatus::Idle));
    }

    #[test]
    fn second_submission_is_busy() {
        let states = TabStates::new();
        let _ticket = states.begin(&query(QueryKind::KnowledgeLookup)).unwrap();
        assert_eq!(states.get(QueryKind::KnowledgeLookup).status, TabStatus::Loading);
        assert!(matches!(
            states.begin(&query(QueryKind::KnowledgeLookup)),
            Err(CompassError::Busy(tab)) if tab == "knowledge"
        ));
        // Other tabs are independent.
        assert!(states.begin(&query(QueryKind::LatestChanges)).is_ok());
    }

    #[test]
    fn late_completion_updates_its_own_tab() {
        let states = TabStates::new();
        let analysis = states.begin(&query(QueryKind::FreeTextAnalysis)).unwrap();
        let tracker = states.begin(&query(QueryKind::LatestChanges)).unwrap();

        tracker.complete(answer(QueryKind::LatestChanges, "friss"));
        analysis.complete(answer(QueryKind::FreeTextAnalysis, "késői"));

        let a = states.get(QueryKind::FreeTextAnalysis);
        assert_eq!(a.status, TabStatus::Success);
        assert_eq!(a.last_answer.unwrap().text, "késői");
        assert_eq!(
            states.get(QueryKind::LatestChanges).last_answer.unwrap().text,
            "friss"
        );
    }

    #[test]
    fn failure_records_message_and_allows_retry() {
        let states = TabStates::new();
        states
            .begin(&query(QueryKind::RegulationDetail))
            .unwrap()
            .fail("Hiba a jogszabály betöltésekor.");
        let tab = states.get(QueryKind::RegulationDetail);
        assert_eq!(tab.status, TabStatus::Error);
        assert_eq!(tab.last_error.as_deref(), Some("Hiba a jogszabály betöltésekor."));

        states
            .begin(&query(QueryKind::RegulationDetail))
            .unwrap()
            .complete(answer(QueryKind::RegulationDetail, "ok"));
        let tab = states.get(QueryKind::RegulationDetail);
        assert_eq!(tab.status, TabStatus::Success);
        assert!(tab.last_error.is_none());
    }

    #[test]
    fn retry_query_returns_last_submission() {
        let states = TabStates::new();
        assert!(states.retry_query(QueryKind::KnowledgeLookup).is_none());
        states
            .begin(&Query::knowledge("Mi a TÉR?"))
            .unwrap()
            .fail("Hiba a Tudástár elérésekor.");
        assert_eq!(
            states.retry_query(QueryKind::KnowledgeLookup),
            Some(Query::knowledge("Mi a TÉR?"))
        );
    }

    #[test]
    fn dropped_ticket_restores_previous_status() {
        let states = TabStates::new();
        states
            .begin(&query(QueryKind::KnowledgeLookup))
            .unwrap()
            .complete(answer(QueryKind::KnowledgeLookup, "első"));
        {
            let _ticket = states.begin(&Query::knowledge("  ")).unwrap();
        }
        let tab = states.get(QueryKind::KnowledgeLookup);
        assert_eq!(tab.status, TabStatus::Success);
        assert_eq!(tab.last_answer.unwrap().text, "első");
        assert_eq!(
            states.retry_query(QueryKind::KnowledgeLookup),
            Some(Query::knowledge("kérdés"))
        );
    }
}
