use serde::{Deserialize, Serialize};
use serde_json::json;

/// Parameters for the egymi_help tool
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct HelpParams {
    #[schemars(
        description = "Optional specific tool ('egymi_analyze', 'egymi_latest_changes', 'egymi_knowledge', 'egymi_regulation', 'egymi_retry'), or leave empty for general help"
    )]
    pub tool: Option<String>,
}

/// Response structure for help requests
#[derive(Debug, Serialize)]
pub struct HelpResponse {
    pub overview: String,
    pub tools: serde_json::Value,
    pub examples: serde_json::Value,
    pub tips: Vec<String>,
}

/// Handler for help operations
#[derive(Debug, Default)]
pub struct HelpHandler;

impl HelpHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn help(&self, params: &HelpParams) -> HelpResponse {
        tracing::info!(tool = ?params.tool, "Processing help request");

        match params.tool.as_deref().map(str::trim) {
            Some("egymi_analyze") => self.analyze_help(),
            Some("egymi_latest_changes") => self.latest_changes_help(),
            Some("egymi_knowledge") => self.knowledge_help(),
            Some("egymi_regulation") => self.regulation_help(),
            Some("egymi_retry") => self.retry_help(),
            _ => self.general_help(),
        }
    }

    fn general_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "EGYMI Compass - regulatory assistant for Hungarian special-education institutions (EGYMI).\n\nAvailable tools:\n• egymi_analyze - Analyse a regulation or question, with a separate institutional impact section\n• egymi_latest_changes - Search-grounded digest of recent education-law changes\n• egymi_knowledge - Answer a question from the authoritative source list\n• egymi_regulation - Current consolidated text of one regulation\n• egymi_regulations - The core regulation catalog\n• egymi_topics - Quick topics for the knowledge tab\n• egymi_status - State of the four tabs\n• egymi_retry - Re-submit the last query of a tab\n• egymi_help - This help".to_string(),

            tools: json!({
                "egymi_analyze": {
                    "tab": "analyzer",
                    "description": "Free-text analysis with an 'Intézményi elemzés' section split out",
                    "search_grounding": false
                },
                "egymi_latest_changes": {
                    "tab": "tracker",
                    "description": "Most recent changes in force or just introduced as of today, with deadlines, teacher tasks and source links",
                    "search_grounding": true
                },
                "egymi_knowledge": {
                    "tab": "knowledge",
                    "description": "Knowledge lookup restricted to the seven authoritative sources",
                    "search_grounding": false
                },
                "egymi_regulation": {
                    "tab": "laws",
                    "description": "Consolidated regulation text from njt.hu, using the deep model",
                    "search_grounding": true
                }
            }),

            examples: json!({
                "analyze": { "text": "Mit jelent a 2024. szeptember 1-jétől hatályos Nkt.-módosítás az EGYMI-kre?" },
                "knowledge": { "question": "Milyen pótlék jár az utazó gyógypedagógusnak?" },
                "quick_topic": { "topic": 2 },
                "regulation": { "law_id": "2011. évi CXC. törvény" },
                "retry": { "tab": "knowledge" }
            }),

            tips: vec![
                "Each tab allows one request at a time; a second submission is rejected until the first answers".to_string(),
                "Answers are informational and are not legal advice".to_string(),
                "Use egymi_regulations to pick a law_id from the core catalog".to_string(),
            ],
        }
    }

    fn analyze_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "egymi_analyze - Structured analysis: summary, institutional impact, quick reference table and FAQ".to_string(),
            tools: json!({
                "required_params": { "text": "Regulation text or question (string, not blank)" },
                "returns": {
                    "text": "Analysis without the institutional block",
                    "institutional_analysis": "Contents of the institutional block, or 'Nincs elérhető intézményi elemzés.'"
                }
            }),
            examples: json!({ "params": { "text": "32/2012. (X. 8.) EMMI rendelet módosítása" } }),
            tips: vec!["Paste the regulation excerpt itself for the most specific analysis".to_string()],
        }
    }

    fn latest_changes_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "egymi_latest_changes - Recent changes affecting special-education institutions".to_string(),
            tools: json!({
                "required_params": {},
                "returns": { "text": "Markdown digest", "sources": "Ordered search references (title, uri)" }
            }),
            examples: json!({ "params": {} }),
            tips: vec!["The digest is dated with today's date; rerun it to refresh".to_string()],
        }
    }

    fn knowledge_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "egymi_knowledge - Knowledge-base answer citing the authoritative sources".to_string(),
            tools: json!({
                "required_params": { "question": "Question (string, not blank) unless topic is given" },
                "optional_params": { "topic": "Quick topic number from egymi_topics; replaces the question" },
                "quick_topics": crate::handlers::quick_topics(),
                "returns": { "text": "Answer text, unmodified" }
            }),
            examples: json!({
                "question": { "question": "Ki jogosult gyógypedagógiai pótlékra?" },
                "topic": { "topic": 5 }
            }),
            tips: vec![
                "Ask about a specific rule; the answer cites paragraph numbers".to_string(),
                "Quick topics send their text as the question, exactly as listed".to_string(),
            ],
        }
    }

    fn regulation_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "egymi_regulation - Full current text of a regulation".to_string(),
            tools: json!({
                "required_params": { "law_id": "Regulation identifier (string, not blank)" },
                "optional_params": { "law_title": "Display title; defaults to the catalog title" },
                "returns": { "text": "Consolidated text", "sources": "Search references" }
            }),
            examples: json!({ "params": { "law_id": "20/2012. (VIII. 31.) EMMI rendelet" } }),
            tips: vec!["Uses the deep model, so answers take longer than the other tabs".to_string()],
        }
    }

    fn retry_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "egymi_retry - Re-submit the last query of a tab".to_string(),
            tools: json!({
                "required_params": { "tab": "'analyzer', 'tracker', 'knowledge' or 'laws'" }
            }),
            examples: json!({ "params": { "tab": "laws" } }),
            tips: vec!["Failed requests are never retried automatically".to_string()],
        }
    }
}
