//! Kairos Common Types
//!
//! Shared types used by the dashboard backend and its tests.

pub mod chat;
pub mod learn;
pub mod protocol;

pub use chat::{
    ApiErrorDetail, ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    Choice, Usage,
};
pub use learn::{LearnRequest, LearnRequestId, LearnResponseUpdate, NewLearnRequest, User};
pub use protocol::{DashboardView, SolutionStatus, SolveRequest};
