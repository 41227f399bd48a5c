//! Test doubles and fixtures shared by unit and integration tests.

pub mod mock_openai;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kairos_common::{LearnRequestId, NewLearnRequest, User};
use uuid::Uuid;

use crate::baas::{self, AccessToken, BaasError, IdentityProvider, LearnRequestStore};
use crate::config::Config;
use crate::dashboard::{Services, Storage};
use crate::llm::{self, CompletionError, CompletionService};

pub const TEST_USER_ID: &str = "7b1c1a0e-4a8f-4a5e-9a55-2d1f1a6c2b10";
pub const TEST_TOKEN: &str = "test-access-token";

pub fn test_user() -> User {
    User {
        id: Uuid::parse_str(TEST_USER_ID).unwrap_or_default(),
        email: Some("ada@example.com".to_string()),
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.supabase.url = Some("http://localhost:54321".to_string());
    config.supabase.anon_key = Some("anon-key".to_string());
    config.openai.api_key = Some("sk-test".to_string());
    config.logging.level = "debug".to_string();
    config
}

/// Identity provider that returns a fixed user or fails.
pub struct FakeIdentity {
    user: Option<User>,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn signed_in(user: User) -> Arc<Self> {
        Arc::new(Self {
            user: Some(user),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            user: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn current_user(&self, _token: &AccessToken) -> baas::Result<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.user.clone().ok_or(BaasError::Api {
            status: 401,
            message: "invalid JWT".to_string(),
        })
    }
}

/// Store that records every insert and update.
pub struct FakeStore {
    fail_insert: bool,
    fail_update: bool,
    next_id: AtomicUsize,
    inserted: Mutex<Vec<NewLearnRequest>>,
    updated: Mutex<Vec<(LearnRequestId, String)>>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Self::build(false, false)
    }

    pub fn failing_insert() -> Arc<Self> {
        Self::build(true, false)
    }

    pub fn failing_update() -> Arc<Self> {
        Self::build(false, true)
    }

    fn build(fail_insert: bool, fail_update: bool) -> Arc<Self> {
        Arc::new(Self {
            fail_insert,
            fail_update,
            next_id: AtomicUsize::new(1),
            inserted: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
        })
    }

    pub fn inserted(&self) -> Vec<NewLearnRequest> {
        self.inserted.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn updated(&self) -> Vec<(LearnRequestId, String)> {
        self.updated.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.inserted().len() + self.updated().len()
    }
}

#[async_trait]
impl LearnRequestStore for FakeStore {
    async fn insert(&self, _token: &AccessToken, row: &NewLearnRequest) -> baas::Result<LearnRequestId> {
        if let Ok(mut rows) = self.inserted.lock() {
            rows.push(row.clone());
        }
        if self.fail_insert {
            return Err(BaasError::RequestFailed("connection refused".to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(LearnRequestId::new(id.to_string()))
    }

    async fn record_response(
        &self,
        _token: &AccessToken,
        id: &LearnRequestId,
        response: &str,
    ) -> baas::Result<()> {
        if let Ok(mut rows) = self.updated.lock() {
            rows.push((id.clone(), response.to_string()));
        }
        if self.fail_update {
            return Err(BaasError::Api {
                status: 500,
                message: "update failed".to_string(),
            });
        }
        Ok(())
    }
}

/// What a `FakeCompletion` answers with.
#[derive(Debug, Clone)]
pub enum CompletionReply {
    Answer(String),
    NoContent,
    ApiError { status: u16, message: Option<String> },
    Transport,
    Invalid,
}

/// Completion service with a scripted reply; records the questions it saw.
pub struct FakeCompletion {
    reply: CompletionReply,
    questions: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn replying(reply: CompletionReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            questions: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(answer: &str) -> Arc<Self> {
        Self::replying(CompletionReply::Answer(answer.to_string()))
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.questions().len()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, question: &str) -> llm::Result<Option<String>> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }
        match &self.reply {
            CompletionReply::Answer(answer) => Ok(Some(answer.clone())),
            CompletionReply::NoContent => Ok(None),
            CompletionReply::ApiError { status, message } => Err(CompletionError::Api {
                status: *status,
                message: message.clone(),
            }),
            CompletionReply::Transport => {
                Err(CompletionError::RequestFailed("connection reset".to_string()))
            }
            CompletionReply::Invalid => {
                Err(CompletionError::InvalidResponse("expected value".to_string()))
            }
        }
    }
}

/// Services wired to the given doubles.
pub fn test_services(
    identity: Arc<FakeIdentity>,
    store: Arc<FakeStore>,
    completion: Arc<FakeCompletion>,
) -> Services {
    Services {
        storage: Some(Storage {
            identity,
            store,
        }),
        completion: Some(completion),
    }
}
