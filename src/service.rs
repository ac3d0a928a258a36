use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{CallToolResult, Content, ErrorData, ServerCapabilities, ServerInfo},
};
use rmcp_macros::{tool, tool_handler, tool_router};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

use crate::advisor::RegulationAdvisor;
use crate::config::Config;
use crate::error::CompassError;
use crate::handlers::help::HelpParams;
use crate::handlers::{self, ToolHandlers};
use crate::models::{AnalyzeParams, KnowledgeParams, Query, QueryKind, RegulationParams, RetryParams};
use crate::regulations;
use crate::state::TabStates;

/// MCP server exposing the four query tabs as tools
#[derive(Clone)]
pub struct CompassServer {
    tool_router: ToolRouter<Self>,
    handlers: Arc<ToolHandlers>,
    config: Arc<Config>,
}

impl CompassServer {
    pub fn new(config: Arc<Config>) -> Self {
        let advisor = Arc::new(RegulationAdvisor::new(&config));
        Self::with_advisor(config, advisor)
    }

    pub fn with_advisor(config: Arc<Config>, advisor: Arc<RegulationAdvisor>) -> Self {
        tracing::info!(
            model_fast = %config.gemini.model_fast,
            model_deep = %config.gemini.model_deep,
            "Initializing EGYMI Compass service"
        );
        let handlers = Arc::new(ToolHandlers::new(advisor, Arc::new(TabStates::new())));
        Self {
            tool_router: Self::tool_router(),
            handlers,
            config,
        }
    }

    async fn run(&self, query: Query) -> std::result::Result<CallToolResult, ErrorData> {
        let kind = query.kind;
        match self.handlers.submit(query).await {
            Ok(answer) => json_result(answer),
            Err(e) => Err(to_error_data(kind, &e)),
        }
    }
}

fn json_result(value: impl Serialize) -> std::result::Result<CallToolResult, ErrorData> {
    let content = Content::json(value).map_err(|e| {
        ErrorData::internal_error(format!("Failed to create JSON content: {e}"), None)
    })?;
    Ok(CallToolResult::success(vec![content]))
}

fn to_error_data(kind: QueryKind, err: &CompassError) -> ErrorData {
    let message = handlers::user_message(kind, err);
    match err {
        e if e.is_service_failure() => {
            tracing::error!(tab = %kind, "Gemini call failed: {}", e);
            ErrorData::internal_error(message, None)
        }
        CompassError::Config(_) => {
            tracing::error!(tab = %kind, "Not configured: {}", err);
            ErrorData::internal_error(message, None)
        }
        _ => {
            tracing::warn!(tab = %kind, "Rejected request: {}", err);
            ErrorData::invalid_params(message, None)
        }
    }
}

#[tool_router]
impl CompassServer {
    #[tool(description = "Analyse a regulation text or question for EGYMI institutions; the institutional impact is returned separately")]
    pub async fn egymi_analyze(
        &self,
        params: Parameters<AnalyzeParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        self.run(Query::analysis(params.0.text)).await
    }

    #[tool(description = "Search-grounded digest of recent Hungarian education-law changes affecting EGYMI institutions")]
    pub async fn egymi_latest_changes(&self) -> std::result::Result<CallToolResult, ErrorData> {
        self.run(Query::latest_changes()).await
    }

    #[tool(description = "Answer a question from the authoritative regulation sources")]
    pub async fn egymi_knowledge(
        &self,
        params: Parameters<KnowledgeParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let params = params.0;
        match handlers::knowledge_query(&params.question, params.topic) {
            Ok(query) => self.run(query).await,
            Err(e) => Err(to_error_data(QueryKind::KnowledgeLookup, &e)),
        }
    }

    #[tool(description = "List the quick topics of the knowledge tab; pass a number as egymi_knowledge's topic")]
    pub async fn egymi_topics(&self) -> std::result::Result<CallToolResult, ErrorData> {
        json_result(handlers::quick_topics())
    }

    #[tool(description = "Current consolidated text of one regulation")]
    pub async fn egymi_regulation(
        &self,
        params: Parameters<RegulationParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let params = params.0;
        let query = handlers::regulation_query(&params.law_id, params.law_title.as_deref());
        self.run(query).await
    }

    #[tool(description = "List the core regulations governing EGYMI institutions")]
    pub async fn egymi_regulations(&self) -> std::result::Result<CallToolResult, ErrorData> {
        json_result(regulations::catalog())
    }

    #[tool(description = "Status and last answer of each tab")]
    pub async fn egymi_status(&self) -> std::result::Result<CallToolResult, ErrorData> {
        json_result(self.handlers.status())
    }

    #[tool(description = "Re-submit the last query of a tab")]
    pub async fn egymi_retry(
        &self,
        params: Parameters<RetryParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let Some(kind) = handlers::parse_tab(&params.0.tab) else {
            return Err(ErrorData::invalid_params(
                format!("Unknown tab '{}'", params.0.tab),
                None,
            ));
        };
        match self.handlers.retry(kind).await {
            Ok(answer) => json_result(answer),
            Err(e) => Err(to_error_data(kind, &e)),
        }
    }

    #[tool(description = "Get help information about available tools and their usage")]
    pub async fn egymi_help(
        &self,
        params: Parameters<HelpParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        json_result(self.handlers.help.help(&params.0))
    }
}

#[tool_handler]
impl ServerHandler for CompassServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2024_11_05,
            server_info: rmcp::model::Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
            },
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            instructions: Some(
                "EGYMI Compass: Hungarian special-education regulatory assistant. Answers are informational, not legal advice.".into(),
            ),
        }
    }
}
