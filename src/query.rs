use chrono::NaiveDate;

use crate::config::GeminiConfig;
use crate::error::{CompassError, Result};
use crate::models::{ModelTier, Query, QueryKind, ServiceRequest};
use crate::prompts;

/// Per-kind request settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    pub temperature: f32,
    pub tools_enabled: bool,
    pub tier: ModelTier,
    /// Grant the configured detail reasoning budget
    pub elevated_reasoning: bool,
}

pub fn profile(kind: QueryKind) -> KindProfile {
    match kind {
        QueryKind::FreeTextAnalysis => KindProfile {
            temperature: 0.2,
            tools_enabled: false,
            tier: ModelTier::Fast,
            elevated_reasoning: false,
        },
        QueryKind::LatestChanges => KindProfile {
            temperature: 0.2,
            tools_enabled: true,
            tier: ModelTier::Fast,
            elevated_reasoning: false,
        },
        QueryKind::KnowledgeLookup => KindProfile {
            temperature: 0.1,
            tools_enabled: false,
            tier: ModelTier::Fast,
            elevated_reasoning: false,
        },
        QueryKind::RegulationDetail => KindProfile {
            temperature: 0.1,
            tools_enabled: true,
            tier: ModelTier::Deep,
            elevated_reasoning: true,
        },
    }
}

/// Turns user intents into fully specified service requests.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    gemini: GeminiConfig,
}

impl QueryBuilder {
    pub fn new(gemini: &GeminiConfig) -> Self {
        Self {
            gemini: gemini.clone(),
        }
    }

    pub fn build(&self, query: &Query, current_date: NaiveDate) -> Result<ServiceRequest> {
        match query.kind {
            QueryKind::FreeTextAnalysis => self.build_analysis_request(&query.content),
            QueryKind::LatestChanges => Ok(self.build_latest_changes_request(current_date)),
            QueryKind::KnowledgeLookup => {
                self.build_knowledge_lookup_request(&query.content, current_date)
            }
            QueryKind::RegulationDetail => {
                let regulation = query.regulation.as_ref().ok_or_else(|| {
                    CompassError::InvalidInput("regulation detail needs a regulation id".into())
                })?;
                self.build_regulation_detail_request(
                    &regulation.id,
                    &regulation.title,
                    current_date,
                )
            }
        }
    }

    pub fn build_analysis_request(&self, free_text: &str) -> Result<ServiceRequest> {
        let content = non_empty(free_text, "analysis text")?;
        Ok(self.assemble(
            QueryKind::FreeTextAnalysis,
            content.to_string(),
            prompts::ANALYSIS_INSTRUCTION.to_string(),
        ))
    }

    pub fn build_latest_changes_request(&self, current_date: NaiveDate) -> ServiceRequest {
        let date = prompts::hungarian_long_date(current_date);
        self.assemble(
            QueryKind::LatestChanges,
            prompts::latest_changes_content(&date),
            prompts::latest_changes_instruction(&date),
        )
    }

    pub fn build_knowledge_lookup_request(
        &self,
        question: &str,
        current_date: NaiveDate,
    ) -> Result<ServiceRequest> {
        let content = non_empty(question, "question")?;
        let date = prompts::hungarian_long_date(current_date);
        Ok(self.assemble(
            QueryKind::KnowledgeLookup,
            content.to_string(),
            prompts::knowledge_instruction(&date),
        ))
    }

    pub fn build_regulation_detail_request(
        &self,
        law_id: &str,
        law_title: &str,
        current_date: NaiveDate,
    ) -> Result<ServiceRequest> {
        let law_id = non_empty(law_id, "regulation id")?;
        let law_title = law_title.trim();
        let date = prompts::hungarian_long_date(current_date);
        Ok(self.assemble(
            QueryKind::RegulationDetail,
            prompts::regulation_detail_content(law_id, law_title),
            prompts::regulation_detail_instruction(law_id, &date),
        ))
    }

    fn assemble(
        &self,
        kind: QueryKind,
        content: String,
        system_instruction: String,
    ) -> ServiceRequest {
        let profile = profile(kind);
        ServiceRequest {
            kind,
            model_id: self.gemini.model_for(profile.tier).to_string(),
            content,
            system_instruction,
            temperature: profile.temperature,
            tools_enabled: profile.tools_enabled,
            reasoning_budget: profile
                .elevated_reasoning
                .then_some(self.gemini.detail_reasoning_budget),
        }
    }
}

fn non_empty<'a>(input: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CompassError::InvalidInput(format!("{what} cannot be empty")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new(&GeminiConfig {
            model_fast: "fast-model".into(),
            model_deep: "deep-model".into(),
            detail_reasoning_budget: 2048,
            ..GeminiConfig::default()
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn every_kind_runs_cold() {
        for kind in QueryKind::ALL {
            assert!(profile(kind).temperature <= 0.2, "{kind} too warm");
        }
    }

    #[test]
    fn analysis_keeps_template_and_trims_content() {
        let b = builder();
        for input in ["Nkt. 27. §", "  Nkt. 27. §\n", "\tÚj rendelet szövege:\n  1. §  "] {
            let req = b.build_analysis_request(input).unwrap();
            assert_eq!(req.system_instruction, prompts::ANALYSIS_INSTRUCTION);
            assert_eq!(req.content, input.trim());
            assert_eq!(req.model_id, "fast-model");
            assert!(!req.tools_enabled);
            assert_eq!(req.reasoning_budget, None);
            assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        let b = builder();
        for input in ["", "   ", "\n\t "] {
            assert!(matches!(
                b.build_analysis_request(input),
                Err(CompassError::InvalidInput(_))
            ));
            assert!(matches!(
                b.build_knowledge_lookup_request(input, today()),
                Err(CompassError::InvalidInput(_))
            ));
            assert!(matches!(
                b.build_regulation_detail_request(input, "cím", today()),
                Err(CompassError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn latest_changes_enables_search_and_dates_prompt() {
        let req = builder().build_latest_changes_request(today());
        assert!(req.tools_enabled);
        assert_eq!(req.model_id, "fast-model");
        assert!(req.content.starts_with("A mai dátum 2026. október 17."));
        assert!(req.system_instruction.contains("A mai dátum: 2026. október 17."));
    }

    #[test]
    fn knowledge_lookup_stays_within_corpus() {
        let question = "Milyen pótlék jár az SNI koordinátornak?";
        let req = builder()
            .build_knowledge_lookup_request(question, today())
            .unwrap();
        assert!(!req.tools_enabled);
        assert!((req.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(req.content, question);
        for source in prompts::AUTHORITATIVE_SOURCES {
            assert!(req.system_instruction.contains(source));
        }
    }

    #[test]
    fn regulation_detail_uses_deep_model_and_budget() {
        let req = builder()
            .build_regulation_detail_request(
                " 32/2012. (X. 8.) EMMI rendelet ",
                "SNI Irányelvek",
                today(),
            )
            .unwrap();
        assert_eq!(req.model_id, "deep-model");
        assert!(req.tools_enabled);
        assert_eq!(req.reasoning_budget, Some(2048));
        assert!(req.content.contains("32/2012. (X. 8.) EMMI rendelet (SNI Irányelvek)"));
        assert!(req.content.contains("szó szerint"));
    }

    #[test]
    fn build_dispatches_on_kind() {
        let b = builder();
        for query in [
            Query::analysis("szöveg"),
            Query::latest_changes(),
            Query::knowledge("kérdés"),
            Query::regulation_detail("2011. évi CXC. törvény", "Nkt."),
        ] {
            let req = b.build(&query, today()).unwrap();
            assert_eq!(req.kind, query.kind);
        }
    }

    #[test]
    fn model_follows_configured_tier() {
        let gemini = GeminiConfig {
            model_fast: "flash-override".into(),
            model_deep: "pro-override".into(),
            ..GeminiConfig::default()
        };
        let b = QueryBuilder::new(&gemini);
        for query in [
            Query::analysis("szöveg"),
            Query::latest_changes(),
            Query::knowledge("kérdés"),
            Query::regulation_detail("2011. évi CXC. törvény", "Nkt."),
        ] {
            let req = b.build(&query, today()).unwrap();
            assert_eq!(req.model_id, gemini.model_for(profile(query.kind).tier));
        }
    }

    #[test]
    fn build_detail_without_regulation_is_invalid() {
        let query = Query {
            kind: QueryKind::RegulationDetail,
            content: String::new(),
            regulation: None,
        };
        assert!(matches!(
            builder().build(&query, today()),
            Err(CompassError::InvalidInput(_))
        ));
    }
}
