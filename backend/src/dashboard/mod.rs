//! The dashboard component: user, question and solution state plus the
//! services it talks to.
//!
//! A `Dashboard` is built per browser session over shared `Services`. It is
//! mounted once (user lookup) and then submits questions one at a time.

pub mod messages;
mod submit;

pub use submit::{solve, Solution};

use std::sync::Arc;

use kairos_common::{DashboardView, SolutionStatus, User};

use crate::baas::{AccessToken, IdentityProvider, LearnRequestStore, SupabaseClient};
use crate::config::Config;
use crate::llm::{CompletionService, OpenAiClient};

/// Identity and row storage, present only when Supabase is configured.
#[derive(Clone)]
pub struct Storage {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn LearnRequestStore>,
}

/// Everything the submit handler needs, injected at construction.
#[derive(Clone, Default)]
pub struct Services {
    pub storage: Option<Storage>,
    pub completion: Option<Arc<dyn CompletionService>>,
}

impl Services {
    /// Build the production clients for whatever credentials are configured.
    ///
    /// Missing credentials are logged here once; the user sees them as
    /// configuration errors when submitting.
    pub fn from_config(config: &Config) -> Self {
        let storage = match config.supabase_credentials() {
            Ok(credentials) => {
                tracing::info!("Supabase configured at {}", credentials.url);
                let client = Arc::new(SupabaseClient::new(&credentials));
                Some(Storage {
                    identity: client.clone(),
                    store: client,
                })
            }
            Err(e) => {
                tracing::warn!("Supabase disabled: {}", e);
                None
            }
        };

        let completion: Option<Arc<dyn CompletionService>> = match config.openai_credentials() {
            Ok(credentials) => {
                tracing::info!(model = %credentials.model, "Completion API configured at {}", credentials.base_url);
                Some(Arc::new(OpenAiClient::new(&credentials)))
            }
            Err(e) => {
                tracing::warn!("Completion API disabled: {}", e);
                None
            }
        };

        Self {
            storage,
            completion,
        }
    }
}

/// A user together with the token that authenticated them.
#[derive(Debug, Clone)]
pub struct SignedInUser {
    pub user: User,
    pub token: AccessToken,
}

/// The three bound variables plus the in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub user: Option<SignedInUser>,
    pub question: String,
    pub solution: String,
    pub status: Option<SolutionStatus>,
    pub loading: bool,
}

pub struct Dashboard {
    services: Services,
    token: Option<AccessToken>,
    mounted: bool,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(services: Services, token: Option<AccessToken>) -> Self {
        Self {
            services,
            token,
            mounted: false,
            state: DashboardState::default(),
        }
    }

    /// Fetch the current user. Runs once; failures leave the user unset.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        let Some(storage) = &self.services.storage else {
            tracing::debug!("Skipping user lookup: Supabase is not configured");
            return;
        };
        let Some(token) = &self.token else {
            tracing::debug!("Skipping user lookup: no access token");
            return;
        };

        match storage.identity.current_user(token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "Loaded current user");
                self.state.user = Some(SignedInUser {
                    user,
                    token: token.clone(),
                });
            }
            Err(e) => {
                tracing::warn!("Failed to load current user: {}", e);
            }
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.state.question = question.into();
    }

    /// Submit the current question and render the outcome into `solution`.
    ///
    /// Ignored while a previous submit is in flight.
    pub async fn submit(&mut self) -> &str {
        if self.state.loading {
            return &self.state.solution;
        }

        if self.state.question.trim().is_empty() {
            self.render(Solution {
                text: messages::EMPTY_QUESTION.to_string(),
                status: SolutionStatus::Prompt,
            });
            return &self.state.solution;
        }

        self.state.loading = true;
        self.mount().await;

        let solution = solve(
            &self.services,
            self.state.user.as_ref(),
            &self.state.question,
        )
        .await;

        self.render(solution);
        self.state.loading = false;
        &self.state.solution
    }

    fn render(&mut self, solution: Solution) {
        self.state.solution = solution.text;
        self.state.status = Some(solution.status);
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref().map(|signed_in| &signed_in.user)
    }

    pub fn button_label(&self) -> &'static str {
        if self.state.loading {
            messages::BUTTON_BUSY
        } else {
            messages::BUTTON_IDLE
        }
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            user: self.user().cloned(),
            question: self.state.question.clone(),
            solution: self.state.solution.clone(),
            status: self.state.status,
            loading: self.state.loading,
            button_label: self.button_label().to_string(),
        }
    }
}
