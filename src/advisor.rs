use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, GeminiConfig};
use crate::error::Result;
use crate::extract::{citation_list, extract};
use crate::models::{Answer, Query, ServiceRequest, ServiceResponse};
use crate::query::QueryBuilder;
use crate::transport::{GeminiTransport, Transport};

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Runs the four query operations end to end: credential gate, request
/// building, one transport call, response adaptation.
pub struct RegulationAdvisor {
    builder: QueryBuilder,
    gemini: GeminiConfig,
    tx: Arc<dyn Transport>,
    today: fn() -> NaiveDate,
}

impl RegulationAdvisor {
    pub fn new(cfg: &Config) -> Self {
        let transport = Arc::new(GeminiTransport::new(cfg.gemini.clone()));
        Self::with_transport(cfg, transport)
    }

    pub fn with_transport(cfg: &Config, tx: Arc<dyn Transport>) -> Self {
        Self {
            builder: QueryBuilder::new(&cfg.gemini),
            gemini: cfg.gemini.clone(),
            tx,
            today: local_today,
        }
    }

    /// Replace the clock used for date-stamped prompts.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn analyze(&self, text: &str) -> Result<Answer> {
        self.ask(&Query::analysis(text)).await
    }

    pub async fn latest_changes(&self) -> Result<Answer> {
        self.ask(&Query::latest_changes()).await
    }

    pub async fn knowledge(&self, question: &str) -> Result<Answer> {
        self.ask(&Query::knowledge(question)).await
    }

    pub async fn regulation_detail(&self, law_id: &str, law_title: &str) -> Result<Answer> {
        self.ask(&Query::regulation_detail(law_id, law_title)).await
    }

    pub async fn ask(&self, query: &Query) -> Result<Answer> {
        self.gemini.require_credential()?;
        let request = self.builder.build(query, (self.today)())?;
        let request_id = Uuid::new_v4();

        tracing::info!(
            %request_id,
            kind = %request.kind,
            model = %request.model_id,
            "Submitting query"
        );

        let response = self.tx.generate(&request).await.inspect_err(|e| {
            tracing::error!(%request_id, kind = %request.kind, "Query failed: {}", e);
        })?;

        Ok(adapt(request_id, &request, response))
    }
}

fn adapt(request_id: Uuid, request: &ServiceRequest, response: ServiceResponse) -> Answer {
    let sources = citation_list(&response.citations);
    let (text, institutional_analysis) = if request.kind.splits_institutional_analysis() {
        let extracted = extract(&response.raw_text);
        (
            extracted.remainder_text,
            Some(extracted.institutional_analysis),
        )
    } else {
        (response.raw_text, None)
    };

    Answer {
        request_id,
        kind: request.kind,
        text,
        institutional_analysis,
        sources,
        model: request.model_id.clone(),
        answered_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompassError;
    use crate::extract::NO_INSTITUTIONAL_ANALYSIS;
    use crate::models::{Citation, QueryKind};
    use crate::prompts::{self, INSTITUTIONAL_CLOSE, INSTITUTIONAL_OPEN};
    use crate::transport::MockTransport;

    fn configured() -> Config {
        let mut cfg = Config::default();
        cfg.gemini.api_key = "test-key".to_string();
        cfg
    }

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn advisor(cfg: &Config, mock: MockTransport) -> RegulationAdvisor {
        RegulationAdvisor::with_transport(cfg, Arc::new(mock)).with_clock(fixed_day)
    }

    fn reply(text: &str, citations: Vec<Citation>) -> ServiceResponse {
        ServiceResponse {
            raw_text: text.to_string(),
            citations,
        }
    }

    #[tokio::test]
    async fn missing_credential_blocks_all_operations() {
        let mut mock = MockTransport::new();
        mock.expect_generate().times(0);
        let advisor = advisor(&Config::default(), mock);

        let results = [
            advisor.analyze("Nkt. módosítás").await,
            advisor.latest_changes().await,
            advisor.knowledge("Mi az EGYMI?").await,
            advisor
                .regulation_detail("2011. évi CXC. törvény", "Nkt.")
                .await,
        ];
        for result in results {
            assert!(matches!(result, Err(CompassError::Config(_))));
        }
    }

    #[tokio::test]
    async fn whitespace_input_never_reaches_transport() {
        let mut mock = MockTransport::new();
        mock.expect_generate().times(0);
        let advisor = advisor(&configured(), mock);

        assert!(matches!(
            advisor.analyze("  \n\t").await,
            Err(CompassError::InvalidInput(_))
        ));
        assert!(matches!(
            advisor.knowledge("").await,
            Err(CompassError::InvalidInput(_))
        ));
        assert!(matches!(
            advisor.regulation_detail(" ", "cím").await,
            Err(CompassError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn analysis_is_split_into_institutional_block() {
        let mut mock = MockTransport::new();
        mock.expect_generate()
            .withf(|req| {
                req.kind == QueryKind::FreeTextAnalysis
                    && req.system_instruction == prompts::ANALYSIS_INSTRUCTION
                    && req.content == "Új rendelet"
            })
            .times(1)
            .returning(|_| {
                Ok(reply(
                    &format!(
                        "Bevezető {INSTITUTIONAL_OPEN} Tanterv módosul {INSTITUTIONAL_CLOSE} GYIK"
                    ),
                    vec![],
                ))
            });
        let answer = advisor(&configured(), mock)
            .analyze("  Új rendelet  ")
            .await
            .unwrap();

        assert_eq!(answer.institutional_analysis.as_deref(), Some("Tanterv módosul"));
        assert_eq!(answer.text, "Bevezető  GYIK");
        assert_eq!(answer.kind, QueryKind::FreeTextAnalysis);
    }

    #[tokio::test]
    async fn analysis_without_block_gets_placeholder() {
        let mut mock = MockTransport::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| Ok(reply("Általános válasz", vec![])));
        let answer = advisor(&configured(), mock).analyze("szöveg").await.unwrap();
        assert_eq!(
            answer.institutional_analysis.as_deref(),
            Some(NO_INSTITUTIONAL_ANALYSIS)
        );
        assert_eq!(answer.text, "Általános válasz");
    }

    #[tokio::test]
    async fn knowledge_lookup_is_displayed_unmodified() {
        let question = "Milyen pótlék jár az SNI koordinátornak?";
        let raw = format!("... Nkt. 62.§ ... {INSTITUTIONAL_OPEN}x{INSTITUTIONAL_CLOSE}\n");
        let expected = raw.clone();

        let mut mock = MockTransport::new();
        mock.expect_generate()
            .withf(move |req| {
                req.kind == QueryKind::KnowledgeLookup
                    && !req.tools_enabled
                    && (req.temperature - 0.1).abs() < f32::EPSILON
                    && req.content == question
                    && prompts::AUTHORITATIVE_SOURCES
                        .iter()
                        .all(|s| req.system_instruction.contains(s))
            })
            .times(1)
            .returning(move |_| Ok(reply(&raw, vec![])));

        let answer = advisor(&configured(), mock)
            .knowledge(question)
            .await
            .unwrap();
        assert_eq!(answer.text, expected);
        assert!(answer.institutional_analysis.is_none());
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn grounded_answers_list_complete_citations_only() {
        let mut mock = MockTransport::new();
        mock.expect_generate()
            .withf(|req| req.kind == QueryKind::LatestChanges && req.tools_enabled)
            .times(1)
            .returning(|_| {
                Ok(reply(
                    "Friss változások",
                    vec![
                        Citation {
                            title: Some("A".into()),
                            uri: Some("http://x".into()),
                        },
                        Citation::default(),
                    ],
                ))
            });
        let answer = advisor(&configured(), mock).latest_changes().await.unwrap();
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].title, "A");
        assert_eq!(answer.text, "Friss változások");
    }

    #[tokio::test]
    async fn regulation_detail_uses_deep_model() {
        let mut mock = MockTransport::new();
        mock.expect_generate()
            .withf(|req| {
                req.kind == QueryKind::RegulationDetail
                    && req.model_id == "gemini-3-pro-preview"
                    && req.reasoning_budget == Some(8192)
                    && req.system_instruction.contains("2026. október 17.")
            })
            .times(1)
            .returning(|_| Ok(reply("27. § (1) ...", vec![])));
        let answer = advisor(&configured(), mock)
            .regulation_detail("2011. évi CXC. törvény", "Nkt.")
            .await
            .unwrap();
        assert_eq!(answer.model, "gemini-3-pro-preview");
        assert_eq!(answer.text, "27. § (1) ...");
    }

    #[tokio::test]
    async fn service_failure_propagates_without_retry() {
        let mut mock = MockTransport::new();
        mock.expect_generate().times(1).returning(|_| {
            Err(CompassError::Status {
                status: 500,
                body: "boom".into(),
            })
        });
        let err = advisor(&configured(), mock)
            .knowledge("kérdés")
            .await
            .unwrap_err();
        assert!(err.is_service_failure());
    }
}
