//! # AFB Core
//!
//! Core business logic for the AFB appraisal form builder.
//!
//! This crate contains pure data operations on in-memory form state:
//! - The form/section/field model and its clone-and-replace builder
//!   transitions ([`form`])
//! - The form store holding all forms and the current selection ([`store`])
//! - The preview engine mapping field types to widgets and collecting
//!   transient session values ([`preview`])
//! - Workflow stage assignment ([`workflow`])
//! - The injectable sentiment analyzer seam and its mock ([`sentiment`])
//! - Strict JSON wire translation ([`wire`])
//!
//! **No API concerns**: HTTP servers and OpenAPI documentation belong in
//! `api-rest` and `api-shared`.

pub mod form;
pub mod preview;
pub mod sentiment;
pub mod store;
pub mod wire;
pub mod workflow;

pub use form::{
    AppraisalForm, FieldConfig, FieldType, FormField, FormSection, FormStatus, ScoreSettings,
    SectionStatus, TextboxSettings, WorkflowStage,
};
pub use preview::{FieldValue, PreviewSession, SentimentRequest, Widget};
pub use sentiment::{
    MockSentimentAnalyzer, SentimentAnalysis, SentimentAnalyzer, SentimentLabel,
    SENTIMENT_TRIGGER_LEN,
};
pub use store::FormStore;
pub use wire::FormDocument;
pub use workflow::WorkflowProcess;

/// Errors returned by the core crate.
///
/// Builder transitions are total (a missing id is a benign no-op, never an
/// error); errors only arise at real boundaries such as wire translation.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("invalid entity id: {0}")]
    InvalidId(#[from] afb_types::IdError),
    #[error("translation error: {0}")]
    Translation(String),
    #[error("failed to serialize form document: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
