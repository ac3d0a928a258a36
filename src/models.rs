use serde::{Deserialize, Serialize};
use std::fmt;

/// The four things a user can ask for, one per tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    FreeTextAnalysis,
    LatestChanges,
    KnowledgeLookup,
    RegulationDetail,
}

impl QueryKind {
    pub const ALL: [QueryKind; 4] = [
        QueryKind::FreeTextAnalysis,
        QueryKind::LatestChanges,
        QueryKind::KnowledgeLookup,
        QueryKind::RegulationDetail,
    ];

    /// Tab name used by the shells.
    pub fn tab(&self) -> &'static str {
        match self {
            QueryKind::FreeTextAnalysis => "analyzer",
            QueryKind::LatestChanges => "tracker",
            QueryKind::KnowledgeLookup => "knowledge",
            QueryKind::RegulationDetail => "laws",
        }
    }

    /// Generic message shown to the user when the external call fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            QueryKind::FreeTextAnalysis => "Hiba az elemzésben.",
            QueryKind::LatestChanges => "Hiba a frissítések lekérésekor.",
            QueryKind::KnowledgeLookup => "Hiba a Tudástár elérésekor.",
            QueryKind::RegulationDetail => "Hiba a jogszabály betöltésekor.",
        }
    }

    /// Only free-text analysis responses carry an institutional-analysis block.
    pub fn splits_institutional_analysis(&self) -> bool {
        matches!(self, QueryKind::FreeTextAnalysis)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Fast,
    Deep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RegulationRef {
    pub id: String,
    pub title: String,
}

/// One user intent, consumed once by the query builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: QueryKind,
    pub content: String,
    pub regulation: Option<RegulationRef>,
}

impl Query {
    pub fn analysis(text: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::FreeTextAnalysis,
            content: text.into(),
            regulation: None,
        }
    }

    pub fn latest_changes() -> Self {
        Self {
            kind: QueryKind::LatestChanges,
            content: String::new(),
            regulation: None,
        }
    }

    pub fn knowledge(question: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::KnowledgeLookup,
            content: question.into(),
            regulation: None,
        }
    }

    pub fn regulation_detail(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::RegulationDetail,
            content: String::new(),
            regulation: Some(RegulationRef {
                id: id.into(),
                title: title.into(),
            }),
        }
    }
}

/// Fully specified payload for one external call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRequest {
    pub kind: QueryKind,
    pub model_id: String,
    pub content: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub tools_enabled: bool,
    pub reasoning_budget: Option<i32>,
}

/// Grounding reference as returned by the service; either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceResponse {
    pub raw_text: String,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedResult {
    pub institutional_analysis: String,
    pub remainder_text: String,
}

/// A citation with both title and link present, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub uri: String,
}

/// What a shell renders for one completed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub request_id: uuid::Uuid,
    pub kind: QueryKind,
    /// Remainder text for analyses, the unmodified response otherwise.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institutional_analysis: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceLink>,
    pub model: String,
    pub answered_at: chrono::DateTime<chrono::Utc>,
}

// Gemini generateContent request format
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct GoogleSearch {}

// Gemini generateContent response format
#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WebSource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Parameters for the egymi_analyze tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeParams {
    #[schemars(description = "Regulation text, excerpt or question to analyse for EGYMI institutions")]
    pub text: String,
}

/// Parameters for the egymi_knowledge tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct KnowledgeParams {
    #[schemars(description = "Question about EGYMI operation, special-education procedure or SNI provision")]
    #[serde(default)]
    pub question: String,

    #[schemars(description = "Optional quick topic number (1-5, see egymi_topics); replaces the question")]
    pub topic: Option<usize>,
}

/// One entry of the egymi_topics list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickTopic {
    pub number: usize,
    pub question: &'static str,
}

/// Parameters for the egymi_regulation tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RegulationParams {
    #[schemars(description = "Regulation identifier, e.g. '2011. évi CXC. törvény'")]
    pub law_id: String,

    #[schemars(description = "Optional title; looked up in the core catalog when omitted")]
    pub law_title: Option<String>,
}

/// Parameters for the egymi_retry tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RetryParams {
    #[schemars(description = "Tab to retry: 'analyzer', 'tracker', 'knowledge' or 'laws'")]
    pub tab: String,
}
