//! Remote workout generation through a chat-completion service.
//!
//! One HTTP request per attempt. The workout prompt asks for a strict JSON
//! object; anything that does not deserialize into the expected shape, or
//! that breaks the workout invariants, is a hard failure. There is no partial
//! recovery here: the orchestrator falls back to local generation instead.

use crate::config::RemoteConfig;
use crate::types::{total_duration_of, Exercise, Feeling, Gender, IntensityTier, Provenance, UserContext, WorkoutDraft};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const WORKOUT_SYSTEM_PROMPT: &str = include_str!("prompts/workout_system.txt");
const ENCOURAGEMENT_SYSTEM_PROMPT: &str = include_str!("prompts/encouragement_system.txt");

const ENCOURAGEMENT_TEMPERATURE: f32 = 0.9;
const ENCOURAGEMENT_MAX_TOKENS: u32 = 150;

// ---------------------------------------------------------------------------
// Error Types
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum RemoteGenerationError {
    #[error("API key not configured (expected in ${0})")]
    MissingApiKey(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Empty completion")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Contract violation: {0}")]
    Contract(String),
}

// ---------------------------------------------------------------------------
// Completion Service
// ---------------------------------------------------------------------------

/// A two-message prompt plus sampling options
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Ask the service to constrain output to a JSON object
    pub json_object: bool,
    pub max_tokens: Option<u32>,
}

/// Text-completion backend
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, RemoteGenerationError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// OpenAI-compatible chat-completions client
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    /// Build a client, reading the API key from the configured env var
    pub fn from_config(settings: &RemoteConfig) -> Result<Self, RemoteGenerationError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RemoteGenerationError::MissingApiKey(settings.api_key_env.clone()))?;
        Self::new(settings, api_key)
    }

    pub fn new(settings: &RemoteConfig, api_key: String) -> Result<Self, RemoteGenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| RemoteGenerationError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key,
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionService for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, RemoteGenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            response_format: request
                .json_object
                .then_some(ResponseFormat { kind: "json_object" }),
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let text = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(RemoteGenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse =
            serde_json::from_str(&text).map_err(|e| RemoteGenerationError::Parse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(RemoteGenerationError::EmptyResponse)
    }
}

fn request_error(e: reqwest::Error) -> RemoteGenerationError {
    if e.is_timeout() {
        RemoteGenerationError::Timeout
    } else {
        RemoteGenerationError::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Workout Contract
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireWorkout {
    exercises: Vec<WireExercise>,
    total_duration: u32,
    emotional_message: String,
    meal_suggestion: String,
}

#[derive(Debug, Deserialize)]
struct WireExercise {
    name: String,
    description: String,
    duration: u32,
    sets: u32,
    reps: u32,
    intensity: IntensityTier,
}

/// Generate a workout with the remote service (single attempt)
pub async fn generate_remote(
    service: &dyn CompletionService,
    ctx: &UserContext,
    temperature: f32,
) -> Result<WorkoutDraft, RemoteGenerationError> {
    let content = service.complete(&workout_request(ctx, temperature)).await?;
    parse_workout(&content)
}

pub fn workout_request(ctx: &UserContext, temperature: f32) -> CompletionRequest {
    CompletionRequest {
        system: WORKOUT_SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(ctx),
        temperature,
        json_object: true,
        max_tokens: None,
    }
}

/// User half of the workout prompt
pub fn build_user_prompt(ctx: &UserContext) -> String {
    let gender = match ctx.gender {
        Gender::Female => "Feminino",
        Gender::Male => "Masculino",
    };
    let equipment = if ctx.equipment.is_empty() {
        "Nenhum".to_string()
    } else {
        ctx.equipment.join(", ")
    };

    let mut prompt = format!(
        "Gênero: {}\nEstado atual: {} ({})\n",
        gender,
        ctx.feeling.label(),
        ctx.feeling.tag()
    );
    if let Some(phase) = ctx.cycle_phase {
        prompt.push_str(&format!("Fase do ciclo: {}\n", phase));
    }
    prompt.push_str(&format!(
        "Objetivo: {}\nLocal: {}\nEquipamentos: {}\nTempo disponível: {} minutos\n\n",
        ctx.goal, ctx.training_location, equipment, ctx.available_minutes
    ));
    prompt.push_str(
        "Crie um treino que respeite o estado atual da pessoa. \
         Em um dia difícil, prefira exercícios leves e acolhedores; \
         com energia, pode intensificar.",
    );
    prompt
}

/// Parse completion text against the workout contract
pub fn parse_workout(content: &str) -> Result<WorkoutDraft, RemoteGenerationError> {
    let wire: WireWorkout = serde_json::from_str(content.trim())
        .map_err(|e| RemoteGenerationError::Parse(e.to_string()))?;

    if wire.exercises.is_empty() {
        return Err(RemoteGenerationError::Contract("no exercises".into()));
    }

    let exercises: Vec<Exercise> = wire
        .exercises
        .into_iter()
        .map(|e| Exercise {
            name: e.name,
            description: e.description,
            duration: e.duration,
            sets: e.sets,
            reps: e.reps,
            intensity: e.intensity,
        })
        .collect();

    if let Some(bad) = exercises.iter().find(|e| e.duration == 0) {
        return Err(RemoteGenerationError::Contract(format!(
            "exercise '{}' has zero duration",
            bad.name
        )));
    }

    let expected = total_duration_of(&exercises).ok_or_else(|| {
        RemoteGenerationError::Contract("Σ duration × sets overflows".into())
    })?;
    if wire.total_duration != expected {
        return Err(RemoteGenerationError::Contract(format!(
            "totalDuration {} != Σ duration × sets ({})",
            wire.total_duration, expected
        )));
    }

    Ok(WorkoutDraft {
        exercises,
        total_duration: wire.total_duration,
        emotional_message: wire.emotional_message,
        meal_suggestion: wire.meal_suggestion,
        generated_by: Provenance::Ai,
    })
}

/// Free-text request for a short post-workout message
pub fn encouragement_request(feeling: Feeling, completed: bool) -> CompletionRequest {
    let outcome = if completed {
        "Ela completou o treino!"
    } else {
        "Ela não completou o treino hoje."
    };
    CompletionRequest {
        system: ENCOURAGEMENT_SYSTEM_PROMPT.to_string(),
        user: format!(
            "A pessoa estava se sentindo: {}. {} Escreva uma mensagem de 2-3 frases.",
            feeling.label(),
            outcome
        ),
        temperature: ENCOURAGEMENT_TEMPERATURE,
        json_object: false,
        max_tokens: Some(ENCOURAGEMENT_MAX_TOKENS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CyclePhase;
    use mockito::Matcher;
    use serde_json::json;

    fn context() -> UserContext {
        UserContext {
            gender: Gender::Female,
            feeling: Feeling::Bloated,
            goal: "Ganhar massa".into(),
            equipment: vec![],
            available_minutes: 15,
            training_location: "Casa".into(),
            cycle_phase: Some(CyclePhase::Luteal),
        }
    }

    fn settings(base_url: &str) -> RemoteConfig {
        RemoteConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..RemoteConfig::default()
        }
    }

    fn workout_json() -> serde_json::Value {
        json!({
            "exercises": [
                {
                    "name": "Ponte de glúteo",
                    "description": "Eleve o quadril devagar",
                    "duration": 60,
                    "sets": 3,
                    "reps": 12,
                    "intensity": "low"
                },
                {
                    "name": "Respiração diafragmática",
                    "description": "Inspire pelo nariz",
                    "duration": 90,
                    "sets": 2,
                    "reps": 5,
                    "intensity": "low"
                }
            ],
            "totalDuration": 360,
            "emotionalMessage": "Vá com calma hoje.",
            "mealSuggestion": "Iogurte com frutas"
        })
    }

    fn chat_body(content: &str) -> String {
        json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn test_parse_valid_workout() {
        let draft = parse_workout(&workout_json().to_string()).unwrap();
        assert_eq!(draft.exercises.len(), 2);
        assert_eq!(draft.total_duration, 360);
        assert_eq!(draft.generated_by, Provenance::Ai);
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let mut value = workout_json();
        value.as_object_mut().unwrap().remove("mealSuggestion");
        assert!(matches!(
            parse_workout(&value.to_string()),
            Err(RemoteGenerationError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_json() {
        let text = workout_json().to_string();
        let truncated = &text[..text.len() / 2];
        assert!(matches!(
            parse_workout(truncated),
            Err(RemoteGenerationError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_inconsistent_total() {
        let mut value = workout_json();
        value["totalDuration"] = json!(900);
        assert!(matches!(
            parse_workout(&value.to_string()),
            Err(RemoteGenerationError::Contract(_))
        ));
    }

    #[test]
    fn test_parse_rejects_overflowing_duration() {
        let mut value = workout_json();
        value["exercises"][0]["duration"] = json!(u32::MAX);
        value["exercises"][0]["sets"] = json!(2);
        value["totalDuration"] = json!(u32::MAX - 1);
        assert!(matches!(
            parse_workout(&value.to_string()),
            Err(RemoteGenerationError::Contract(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_exercises() {
        let mut value = workout_json();
        value["exercises"] = json!([]);
        value["totalDuration"] = json!(0);
        assert!(matches!(
            parse_workout(&value.to_string()),
            Err(RemoteGenerationError::Contract(_))
        ));
    }

    #[test]
    fn test_user_prompt_includes_context() {
        let prompt = build_user_prompt(&context());
        assert!(prompt.contains("Feminino"));
        assert!(prompt.contains("Inchada (bloated)"));
        assert!(prompt.contains("Fase do ciclo: luteal"));
        assert!(prompt.contains("Equipamentos: Nenhum"));
        assert!(prompt.contains("15 minutos"));

        let mut male = context();
        male.gender = Gender::Male;
        male.cycle_phase = None;
        male.equipment = vec!["Halteres".into(), "Elástico".into()];
        let prompt = build_user_prompt(&male);
        assert!(!prompt.contains("Fase do ciclo"));
        assert!(prompt.contains("Halteres, Elástico"));
    }

    #[test]
    fn test_missing_api_key() {
        let mut cfg = RemoteConfig::default();
        cfg.api_key_env = "FLOWFIT_TEST_KEY_THAT_IS_NEVER_SET".into();
        assert!(matches!(
            CompletionClient::from_config(&cfg),
            Err(RemoteGenerationError::MissingApiKey(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_remote_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "response_format": { "type": "json_object" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body(&workout_json().to_string()))
            .create_async()
            .await;

        let client = CompletionClient::new(&settings(&server.url()), "test-key".into()).unwrap();
        let draft = generate_remote(&client, &context(), 0.8).await.unwrap();

        mock.assert_async().await;
        assert_eq!(draft.generated_by, Provenance::Ai);
        assert_eq!(draft.emotional_message, "Vá com calma hoje.");
    }

    #[tokio::test]
    async fn test_generate_remote_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body(r#"{"error": {"message": "overloaded"}}"#)
            .create_async()
            .await;

        let client = CompletionClient::new(&settings(&server.url()), "k".into()).unwrap();
        let err = generate_remote(&client, &context(), 0.8).await.unwrap_err();

        match err {
            RemoteGenerationError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_remote_empty_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": null}}]}"#)
            .create_async()
            .await;

        let client = CompletionClient::new(&settings(&server.url()), "k".into()).unwrap();
        assert!(matches!(
            generate_remote(&client, &context(), 0.8).await,
            Err(RemoteGenerationError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let client = CompletionClient::new(&settings("http://127.0.0.1:1"), "k".into()).unwrap();
        assert!(matches!(
            generate_remote(&client, &context(), 0.8).await,
            Err(RemoteGenerationError::Request(_))
        ));
    }

    /// Accepts connections and never answers
    async fn silent_server() -> (String, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        (url, handle)
    }

    #[tokio::test]
    async fn test_unanswered_request_times_out() {
        let (url, server) = silent_server().await;
        let settings = RemoteConfig {
            timeout_secs: 1,
            ..settings(&url)
        };
        let client = CompletionClient::new(&settings, "k".into()).unwrap();

        assert!(matches!(
            generate_remote(&client, &context(), 0.8).await,
            Err(RemoteGenerationError::Timeout)
        ));
        server.abort();
    }

    #[test]
    fn test_encouragement_request_is_free_text() {
        let req = encouragement_request(Feeling::Stressed, true);
        assert!(!req.json_object);
        assert_eq!(req.max_tokens, Some(150));
        assert!(req.user.contains("Estressado"));
        assert!(req.user.contains("completou"));
    }
}
