//! Digital twin response composer.
//!
//! Ranks profile chunks for a question, renders the answer prompt around
//! them and asks the language model for a first-person reply.

use crate::profile::load_profile;
use crate::ranker::{normalize_scores, rank, ScoredChunk, DEFAULT_TOP_K};
use crate::reply::{ChatReply, SourceRef, TwinAnswer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use twin_core::{AppConfig, AppResult, ErrorKind};
use twin_llm::{LlmClient, LlmRequest};
use twin_prompt::{build_prompt, load_prompt, ASK_PROMPT_ID, SUMMARY_PROMPT_ID};

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Message returned when a question is missing or blank.
pub const INVALID_QUESTION_MESSAGE: &str = "Error: Please provide a valid question";

/// Question answering over a profile document.
///
/// Holds no mutable state; the profile is read again on every call.
pub struct DigitalTwin {
    client: Arc<dyn LlmClient>,
    profile_path: PathBuf,
    workspace: PathBuf,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
    top_k: usize,
}

impl DigitalTwin {
    pub fn new(
        client: Arc<dyn LlmClient>,
        profile_path: impl Into<PathBuf>,
        model: impl Into<String>,
    ) -> Self {
        let profile_path = profile_path.into();
        let workspace = profile_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            client,
            profile_path,
            workspace,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Build a twin from loaded configuration.
    pub fn from_config(config: &AppConfig, client: Arc<dyn LlmClient>) -> Self {
        Self::new(client, config.profile_path(), config.model.clone())
            .with_workspace(config.workspace.clone())
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature)
            .with_top_k(config.top_k)
    }

    /// Directory searched for `.twin/prompts` overrides.
    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = workspace.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sampling temperature; `None` leaves the provider default.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn profile_path(&self) -> &Path {
        &self.profile_path
    }

    /// Rank the profile's chunks for `question`.
    pub fn search(&self, question: &str) -> AppResult<Vec<ScoredChunk>> {
        let profile = load_profile(&self.profile_path)?;
        Ok(rank(question, &profile.content_chunks, self.top_k))
    }

    /// Answer `question` from the profile.
    pub async fn ask(&self, question: &str) -> AppResult<TwinAnswer> {
        tracing::info!("Answering question with {} (top_k: {})", self.model, self.top_k);

        let profile = load_profile(&self.profile_path)?;
        let results = rank(question, &profile.content_chunks, self.top_k);

        tracing::debug!(
            "Selected chunks: {:?}",
            results
                .iter()
                .map(|r| (&r.title, r.score))
                .collect::<Vec<_>>()
        );

        let context = build_context(&results);

        let mut variables = HashMap::new();
        variables.insert("context".to_string(), context);
        variables.insert("question".to_string(), question.to_string());
        if let Some(name) = profile.name() {
            variables.insert("name".to_string(), name.to_string());
        }

        let definition = load_prompt(&self.workspace, ASK_PROMPT_ID)?;
        let built = build_prompt(&definition, variables)?;

        let mut request =
            LlmRequest::new(built.user, self.model.clone()).with_max_tokens(self.max_tokens);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.client.complete(&request).await?;

        tracing::info!(
            "Answer generated by {} ({} completion tokens)",
            self.client.provider_name(),
            response.usage.completion_tokens
        );

        Ok(TwinAnswer {
            message: response.content,
            sources: source_refs(&results),
        })
    }

    /// Answer `question` as a chat reply. Never fails; errors become
    /// `ChatReply::Failed`.
    pub async fn reply(&self, question: &str) -> ChatReply {
        if question.trim().is_empty() {
            tracing::warn!("Rejected blank question");
            return ChatReply::Failed {
                kind: ErrorKind::InvalidInput,
                message: INVALID_QUESTION_MESSAGE.to_string(),
            };
        }

        match self.ask(question).await {
            Ok(answer) => answer.into(),
            Err(e) => {
                tracing::error!("Digital twin query failed: {}", e);
                ChatReply::from_error(&e)
            }
        }
    }

    /// Render the profile summary.
    pub fn profile_summary(&self) -> AppResult<String> {
        let profile = load_profile(&self.profile_path)?;
        let definition = load_prompt(&self.workspace, SUMMARY_PROMPT_ID)?;
        profile.summary_with(&definition)
    }
}

/// Join chunks into the model context, one `title: content` block each.
fn build_context(results: &[ScoredChunk]) -> String {
    results
        .iter()
        .map(|r| format!("{}: {}", r.title, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn source_refs(results: &[ScoredChunk]) -> Vec<SourceRef> {
    results
        .iter()
        .zip(normalize_scores(results))
        .map(|(r, relative_score)| SourceRef {
            title: r.title.clone(),
            relative_score,
        })
        .collect()
}

/// Format an answer with its sources as markdown.
///
/// Each source is listed as `- {title} (relevance: {pct}%)`.
pub fn format_with_sources(answer: &TwinAnswer) -> String {
    let sources = answer
        .sources
        .iter()
        .map(|s| format!("- {} (relevance: {}%)", s.title, s.percent()))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n**Sources:**\n{}", answer.message, sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use twin_llm::MockClient;

    const PROFILE: &str = r#"{
        "personal": { "name": "Ada Lovelace" },
        "content_chunks": [
            { "title": "Education", "content": "Self taught in mathematics" },
            { "title": "Go Skills", "content": "Go Rust Python" },
            { "title": "Projects", "content": "Built a Go service" },
            { "title": "Hobbies", "content": "Poetry" }
        ]
    }"#;

    fn setup(profile: Option<&str>) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("digitaltwin.json");
        if let Some(profile) = profile {
            fs::write(&path, profile).unwrap();
        }
        (dir, path)
    }

    fn twin(mock: &Arc<MockClient>, path: &Path) -> DigitalTwin {
        DigitalTwin::new(mock.clone(), path, "test-model")
    }

    #[tokio::test]
    async fn test_ask_builds_prompt_and_sources() {
        let (_dir, path) = setup(Some(PROFILE));
        let mock = Arc::new(MockClient::fixed("I write Go."));

        let answer = twin(&mock, &path).ask("go").await.unwrap();
        assert_eq!(answer.message, "I write Go.");

        let titles: Vec<_> = answer.sources.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Go Skills", "Projects", "Education"]);
        assert_eq!(answer.sources[0].relative_score, 1.0);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.max_tokens, Some(DEFAULT_MAX_TOKENS));
        assert_eq!(request.temperature, None);
        assert_eq!(
            request.prompt,
            "Based on the following information, answer the question:\n\n\
             Go Skills: Go Rust Python\n\n\
             Projects: Built a Go service\n\n\
             Education: Self taught in mathematics\n\n\
             Question: go"
        );

        let system = request.system.as_deref().unwrap();
        assert!(system.starts_with("You are an AI digital twin assistant representing Ada Lovelace."));
    }

    #[tokio::test]
    async fn test_ask_empty_profile_chunks() {
        let (_dir, path) = setup(Some(r#"{"personal": {}}"#));
        let mock = Arc::new(MockClient::fixed("Hello"));

        let answer = twin(&mock, &path).ask("anything").await.unwrap();
        assert!(answer.sources.is_empty());

        let system = mock.requests()[0].system.clone().unwrap();
        assert!(system.starts_with("You are an AI digital twin assistant. Answer"));
    }

    #[tokio::test]
    async fn test_ask_missing_profile() {
        let (_dir, path) = setup(None);
        let mock = Arc::new(MockClient::fixed("unused"));

        let err = twin(&mock, &path).ask("go").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_respects_top_k() {
        let (_dir, path) = setup(Some(PROFILE));
        let mock = Arc::new(MockClient::fixed("ok"));

        let answer = twin(&mock, &path).with_top_k(1).ask("go").await.unwrap();
        assert_eq!(answer.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_ask_passes_temperature() {
        let (_dir, path) = setup(Some(PROFILE));
        let mock = Arc::new(MockClient::fixed("ok"));

        twin(&mock, &path)
            .with_temperature(Some(0.3))
            .ask("go")
            .await
            .unwrap();
        assert_eq!(mock.requests()[0].temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_ask_uses_workspace_prompt_override() {
        let (dir, path) = setup(Some(PROFILE));
        let prompts = dir.path().join(".twin/prompts");
        fs::create_dir_all(&prompts).unwrap();
        fs::write(
            prompts.join("twin.ask.default.yml"),
            "id: twin.ask.default\ntitle: Short\napiVersion: \"1.0\"\ntemplate: \"Q={{question}}\"\n",
        )
        .unwrap();

        let mock = Arc::new(MockClient::fixed("ok"));
        twin(&mock, &path).ask("go").await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.prompt, "Q=go");
        assert!(request.system.is_none());
    }

    #[tokio::test]
    async fn test_reply_blank_question_skips_llm() {
        let (_dir, path) = setup(Some(PROFILE));
        let mock = Arc::new(MockClient::fixed("unused"));

        let reply = twin(&mock, &path).reply("   ").await;
        assert_eq!(
            reply,
            ChatReply::Failed {
                kind: ErrorKind::InvalidInput,
                message: INVALID_QUESTION_MESSAGE.to_string(),
            }
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_reply_upstream_failure() {
        let (_dir, path) = setup(Some(PROFILE));
        let mock = Arc::new(MockClient::failing("rate limited"));

        let reply = twin(&mock, &path).reply("go").await;
        match reply {
            ChatReply::Failed { kind, message } => {
                assert_eq!(kind, ErrorKind::UpstreamFailure);
                assert!(message.starts_with("Error: "));
                assert!(message.contains("rate limited"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reply_success() {
        let (_dir, path) = setup(Some(PROFILE));
        let mock = Arc::new(MockClient::fixed("Hi!"));

        let reply = twin(&mock, &path).reply("poetry").await;
        assert!(reply.is_success());
        assert_eq!(reply.message(), "Hi!");
    }

    #[test]
    fn test_profile_summary() {
        let (_dir, path) = setup(Some(PROFILE));
        let mock = Arc::new(MockClient::fixed("unused"));

        let summary = twin(&mock, &path).profile_summary().unwrap();
        assert!(summary.contains("**Name:** Ada Lovelace"));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_format_with_sources() {
        let answer = TwinAnswer {
            message: "I write Go.".to_string(),
            sources: vec![
                SourceRef {
                    title: "Go Skills".to_string(),
                    relative_score: 1.0,
                },
                SourceRef {
                    title: "Projects".to_string(),
                    relative_score: 2.0 / 9.0,
                },
            ],
        };

        assert_eq!(
            format_with_sources(&answer),
            "I write Go.\n\n**Sources:**\n- Go Skills (relevance: 100%)\n- Projects (relevance: 22%)"
        );
    }
}
