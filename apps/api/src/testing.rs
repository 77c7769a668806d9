//! Shared fakes for unit and router tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::auth::{AuthConfig, Claims};
use crate::config::AiConfig;
use crate::llm_client::{ChatModel, ChatRequest, LlmError};
use crate::models::user::Role;
use crate::recommendation::pipeline::{AuditPolicy, RecommendationPipeline};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// A `ChatModel` that plays back canned replies and records every request.
/// Once the script runs out it answers `EmptyContent`.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Ok(text.to_string())])
    }

    pub fn failing(error: LlmError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    pub fn scripted(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub fn test_ai_config() -> AiConfig {
    AiConfig {
        api_key: "sk-test".to_string(),
        model: "gpt-4o-mini".to_string(),
        temperature: 0.2,
        base_url: "http://localhost:9/v1".to_string(),
        timeout_secs: None,
    }
}

/// Signs a one-hour token for `user_id` with the test secret.
pub fn token_for(user_id: Uuid, role: Role) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub model: Arc<ScriptedModel>,
    pub router: Router,
}

/// Full router over an in-memory store and a scripted model.
pub fn test_app(model: ScriptedModel) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let model = Arc::new(model);
    let pipeline = RecommendationPipeline::new(
        store.clone(),
        store.clone(),
        model.clone(),
        &test_ai_config(),
        AuditPolicy::Strict,
    );
    let state = AppState {
        store: store.clone(),
        pipeline: Arc::new(pipeline),
        auth: AuthConfig::hs256(TEST_JWT_SECRET),
    };

    TestApp {
        store,
        model,
        router: build_router(state),
    }
}
