//! Wire models for appraisal form documents and the REST surface.
//!
//! The document types (`FormWire`, `SectionWire`, `FieldWire`,
//! `FieldSettingsWire`) are the exact JSON shape a form is exchanged in:
//! camelCase keys, entity ids as decimal strings, `createdAt` as an RFC 3339
//! timestamp. They carry `#[serde(deny_unknown_fields)]` so malformed
//! documents are rejected rather than silently accepted.
//!
//! Translation to and from the domain model lives in `afb_core::wire`; this
//! crate only defines shapes, so both the REST crate and the core crate can
//! share them without a dependency cycle.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Document wire types
// ============================================================================

/// Wire representation of a whole appraisal form.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct FormWire {
    pub id: String,
    pub title: String,
    pub sections: Vec<SectionWire>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
}

/// Wire representation of a form section.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SectionWire {
    pub id: String,
    pub title: String,
    pub status: String,
    pub fields: Vec<FieldWire>,
}

/// Wire representation of a single field.
///
/// `options` is only meaningful for radio/dropdown/multiselect fields and
/// `settings` only for textbox and score fields; the core translation layer
/// enforces that the payload matches the declared `type`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldWire {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<FieldSettingsWire>,
}

/// Wire representation of type-specific field settings.
///
/// A flat optional-properties record on the wire; which keys are allowed
/// depends on the field's `type`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldSettingsWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expandable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<bool>,
    #[serde(rename = "minScore", skip_serializing_if = "Option::is_none")]
    pub min_score: Option<i32>,
    #[serde(rename = "maxScore", skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i32>,
}

// ============================================================================
// REST request/response types
// ============================================================================

/// Health check response.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Response listing all stored forms.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ListFormsRes {
    pub forms: Vec<FormWire>,
}

/// Response carrying the currently selected form, if any.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct SelectFormRes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<FormWire>,
}

/// Request to append a new field of the given type to a section.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFieldReq {
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Request assigning a form to workflow stages.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct AssignWorkflowReq {
    #[serde(rename = "formId")]
    pub form_id: String,
    #[serde(rename = "preAppraisal")]
    pub pre_appraisal: bool,
    #[serde(rename = "appraisalMeeting")]
    pub appraisal_meeting: bool,
    #[serde(rename = "postAppraisal")]
    pub post_appraisal: bool,
}

/// Workflow assignment outcome: the single stage derived from the flags.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct AssignWorkflowRes {
    #[serde(rename = "formId")]
    pub form_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
}

/// Request to analyze a piece of text.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct AnalyzeSentimentReq {
    pub text: String,
}

/// Sentiment analysis result.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, ToSchema)]
pub struct SentimentWire {
    pub score: f64,
    pub label: String,
    pub confidence: f64,
}

/// A transient value captured by the preview session, one variant populated.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, ToSchema)]
pub struct PreviewValueWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selections: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

/// A rendered preview widget: the input a field's declared type maps to,
/// plus whatever transient value the session currently holds for it.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct WidgetWire {
    #[serde(rename = "fieldId")]
    pub field_id: String,
    pub label: String,
    pub required: bool,
    pub widget: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(rename = "minScore", skip_serializing_if = "Option::is_none")]
    pub min_score: Option<i32>,
    #[serde(rename = "maxScore", skip_serializing_if = "Option::is_none")]
    pub max_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<PreviewValueWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentWire>,
}

/// A rendered preview of a form: one widget per field, in section order.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct PreviewRes {
    #[serde(rename = "formId")]
    pub form_id: String,
    pub title: String,
    pub widgets: Vec<WidgetWire>,
}

/// Request writing a transient value into a preview session.
///
/// Exactly one of the value members is expected; which one applies depends
/// on the target field's type.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct SetPreviewValueReq {
    #[serde(rename = "fieldId")]
    pub field_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
    #[serde(rename = "toggleOption", skip_serializing_if = "Option::is_none")]
    pub toggle_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_wire_omits_absent_payloads() {
        let field = FieldWire {
            id: "1700000000000".into(),
            field_type: "label".into(),
            label: "Overview".into(),
            required: None,
            options: None,
            placeholder: None,
            settings: None,
        };

        let json = serde_json::to_value(&field).expect("serialize field");
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 3);
        assert_eq!(object["type"], "label");
    }

    #[test]
    fn settings_wire_uses_camel_case_score_keys() {
        let settings = FieldSettingsWire {
            min_score: Some(1),
            max_score: Some(10),
            ..Default::default()
        };

        let json = serde_json::to_string(&settings).expect("serialize settings");
        assert_eq!(json, r#"{"minScore":1,"maxScore":10}"#);
    }

    #[test]
    fn form_wire_rejects_unknown_keys() {
        let raw = r#"{
            "id": "1700000000000",
            "title": "Annual Review",
            "sections": [],
            "createdAt": "2026-01-01T00:00:00Z",
            "status": "draft",
            "surprise": true
        }"#;

        let err = serde_json::from_str::<FormWire>(raw).expect_err("should reject");
        assert!(err.to_string().contains("surprise"));
    }
}
