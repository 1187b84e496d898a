//! The preview engine.
//!
//! Maps each field's declared type to the widget it renders as, and collects
//! the transient values a user enters while trying the form out. Preview
//! state lives in a [`PreviewSession`] keyed by field id; it is independent
//! of the builder's own state, never written back into the form model, and
//! discarded whenever the preview is remounted.

use std::collections::HashMap;

use afb_types::EntityId;

use crate::form::{FieldConfig, FormField};
use crate::sentiment::{SentimentAnalysis, SentimentLabel, SENTIMENT_TRIGGER_LEN};

/// The interactive input a field renders as in the preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Widget {
    /// Non-interactive text, for label fields.
    Static { text: String },
    /// Single-line text input (textbox with `expandable` off).
    SingleLineInput { placeholder: Option<String> },
    /// Multi-line text area (textbox with `expandable` on).
    MultiLineInput { placeholder: Option<String> },
    /// One radio button per option, single selection.
    RadioGroup { options: Vec<String> },
    /// Drop-down list, single selection.
    Dropdown { options: Vec<String> },
    /// One checkbox per option, any number selected.
    Checklist { options: Vec<String> },
    /// One button per integer in the inclusive range.
    ScoreButtons { min: i32, max: i32 },
    /// Three exclusive buttons: positive, neutral, negative.
    SentimentButtons,
    /// Decorative upload area; never captures a value.
    UploadPlaceholder,
}

impl Widget {
    /// Builds the widget descriptor for a field from its declared type.
    pub fn for_field(field: &FormField) -> Self {
        match &field.config {
            FieldConfig::Label => Self::Static {
                text: field.label.clone(),
            },
            FieldConfig::Textbox(settings) => {
                if settings.expandable {
                    Self::MultiLineInput {
                        placeholder: field.placeholder.clone(),
                    }
                } else {
                    Self::SingleLineInput {
                        placeholder: field.placeholder.clone(),
                    }
                }
            }
            FieldConfig::Radio { options } => Self::RadioGroup {
                options: options.clone(),
            },
            FieldConfig::Dropdown { options } => Self::Dropdown {
                options: options.clone(),
            },
            FieldConfig::Multiselect { options } => Self::Checklist {
                options: options.clone(),
            },
            FieldConfig::Attachment => Self::UploadPlaceholder,
            FieldConfig::Score(settings) => Self::ScoreButtons {
                min: settings.min_score,
                max: settings.max_score,
            },
            FieldConfig::Sentiment => Self::SentimentButtons,
        }
    }

    /// Stable name of this widget kind, as used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Static { .. } => "static",
            Self::SingleLineInput { .. } => "single-line",
            Self::MultiLineInput { .. } => "multi-line",
            Self::RadioGroup { .. } => "radio-group",
            Self::Dropdown { .. } => "dropdown",
            Self::Checklist { .. } => "checklist",
            Self::ScoreButtons { .. } => "score-buttons",
            Self::SentimentButtons => "sentiment-buttons",
            Self::UploadPlaceholder => "upload-placeholder",
        }
    }
}

/// A transient value entered in the preview, typed by the field it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Choice(String),
    Selections(Vec<String>),
    Score(i32),
    Sentiment(SentimentLabel),
}

/// A pending sentiment analysis, produced when editing a sentiment-enabled
/// textbox past the trigger length.
///
/// The caller decides when and where to run the analyzer; the result is
/// handed back through [`PreviewSession::apply_sentiment`]. There is no
/// debounce and no cancellation: every qualifying edit produces a fresh
/// request, and the last applied result wins regardless of request order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentimentRequest {
    pub field_id: EntityId,
    pub text: String,
}

/// Transient per-session preview state: entered values and sentiment results
/// keyed by field id. Constructing a new session is the remount reset.
#[derive(Clone, Debug, Default)]
pub struct PreviewSession {
    form_data: HashMap<EntityId, FieldValue>,
    sentiment_data: HashMap<EntityId, SentimentAnalysis>,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value currently held for a field, if any.
    pub fn value(&self, field_id: EntityId) -> Option<&FieldValue> {
        self.form_data.get(&field_id)
    }

    /// The latest sentiment result for a field, if any.
    pub fn sentiment(&self, field_id: EntityId) -> Option<&SentimentAnalysis> {
        self.sentiment_data.get(&field_id)
    }

    /// Writes a text value for a textbox field.
    ///
    /// Returns a [`SentimentRequest`] when the field has the sentiment switch
    /// on and the new text exceeds [`SENTIMENT_TRIGGER_LEN`] characters.
    /// Fields of any other type ignore the write.
    pub fn set_text(
        &mut self,
        field: &FormField,
        text: impl Into<String>,
    ) -> Option<SentimentRequest> {
        let FieldConfig::Textbox(settings) = &field.config else {
            return None;
        };

        let text = text.into();
        self.form_data.insert(field.id, FieldValue::Text(text.clone()));

        if settings.sentiment && text.chars().count() > SENTIMENT_TRIGGER_LEN {
            Some(SentimentRequest {
                field_id: field.id,
                text,
            })
        } else {
            None
        }
    }

    /// Selects a single option for a radio or dropdown field. Options not in
    /// the field's list are ignored, as are fields of any other type.
    pub fn select_choice(&mut self, field: &FormField, option: &str) {
        let listed = match &field.config {
            FieldConfig::Radio { options } | FieldConfig::Dropdown { options } => {
                options.iter().any(|o| o == option)
            }
            _ => false,
        };
        if listed {
            self.form_data
                .insert(field.id, FieldValue::Choice(option.to_string()));
        }
    }

    /// Toggles an option in a multiselect field: adds it when absent,
    /// removes it when present. Unlisted options are ignored.
    pub fn toggle_selection(&mut self, field: &FormField, option: &str) {
        let FieldConfig::Multiselect { options } = &field.config else {
            return;
        };
        if !options.iter().any(|o| o == option) {
            return;
        }

        let mut selections = match self.form_data.get(&field.id) {
            Some(FieldValue::Selections(current)) => current.clone(),
            _ => Vec::new(),
        };
        if let Some(pos) = selections.iter().position(|o| o == option) {
            selections.remove(pos);
        } else {
            selections.push(option.to_string());
        }
        self.form_data
            .insert(field.id, FieldValue::Selections(selections));
    }

    /// Sets the score for a score field. Values outside the field's
    /// inclusive range are ignored.
    pub fn set_score(&mut self, field: &FormField, score: i32) {
        let FieldConfig::Score(settings) = &field.config else {
            return;
        };
        if score >= settings.min_score && score <= settings.max_score {
            self.form_data.insert(field.id, FieldValue::Score(score));
        }
    }

    /// Chooses one of the three sentiment labels for a sentiment field.
    pub fn choose_sentiment(&mut self, field: &FormField, label: SentimentLabel) {
        if matches!(field.config, FieldConfig::Sentiment) {
            self.form_data.insert(field.id, FieldValue::Sentiment(label));
        }
    }

    /// Records the result of a sentiment analysis for a field.
    ///
    /// This is the completion side of [`SentimentRequest`]: results may
    /// arrive in any order, and each write simply overwrites the previous
    /// one for that field.
    pub fn apply_sentiment(&mut self, field_id: EntityId, analysis: SentimentAnalysis) {
        self.sentiment_data.insert(field_id, analysis);
    }
}
