//! Wire/domain translation for form documents.
//!
//! The wire structs themselves live in `api-shared` so the REST surface can
//! share them; this module owns the translation in both directions and the
//! structural validation the flat wire shape cannot express. In particular,
//! a field's `settings`/`options` payload must match its declared `type`:
//! a score field cannot carry textbox switches, a label cannot carry
//! options, and the three choice types must carry a non-empty option list.
//!
//! Parsing uses `serde_path_to_error` to surface a best-effort path (e.g.
//! `sections[0].fields[2].settings`) to the failing key when a document does
//! not match the wire schema.

use afb_types::EntityId;
use api_shared::wire::{FieldSettingsWire, FieldWire, FormWire, SectionWire};
use chrono::{DateTime, Utc};

use crate::form::{
    AppraisalForm, FieldConfig, FieldType, FormField, FormSection, ScoreSettings, TextboxSettings,
};
use crate::{FormError, FormResult};

/// Form document operations.
///
/// This is a zero-sized type used for namespacing document-level parse and
/// render; all methods are associated functions.
pub struct FormDocument;

impl FormDocument {
    /// Parse an appraisal form from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if:
    /// - the JSON does not match the wire schema (unknown keys are rejected),
    /// - any id is not a decimal string,
    /// - `createdAt` is not an RFC 3339 timestamp,
    /// - a status, workflow stage, or field type string is unknown,
    /// - a field's payload does not match its declared type.
    pub fn parse(json_text: &str) -> FormResult<AppraisalForm> {
        let deserializer = &mut serde_json::Deserializer::from_str(json_text);

        let wire = match serde_path_to_error::deserialize::<_, FormWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(FormError::Translation(format!(
                    "Form document schema mismatch at {path}: {source}"
                )));
            }
        };

        form_from_wire(wire)
    }

    /// Render an appraisal form as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Serialization`] if serialization fails.
    pub fn render(form: &AppraisalForm) -> FormResult<String> {
        Ok(serde_json::to_string_pretty(&form_to_wire(form))?)
    }
}

// ============================================================================
// Domain -> wire
// ============================================================================

/// Convert a domain form to its wire representation.
pub fn form_to_wire(form: &AppraisalForm) -> FormWire {
    FormWire {
        id: form.id.to_string(),
        title: form.title.clone(),
        sections: form.sections.iter().map(section_to_wire).collect(),
        created_at: form.created_at.to_rfc3339(),
        status: form.status.as_str().to_string(),
        workflow: form.workflow.map(|w| w.as_str().to_string()),
    }
}

/// Convert a domain section to its wire representation.
pub fn section_to_wire(section: &FormSection) -> SectionWire {
    SectionWire {
        id: section.id.to_string(),
        title: section.title.clone(),
        status: section.status.as_str().to_string(),
        fields: section.fields.iter().map(field_to_wire).collect(),
    }
}

/// Convert a domain field to its wire representation.
///
/// Textbox and score fields always carry a `settings` object on the wire;
/// choice fields always carry `options`; the remaining types carry neither.
pub fn field_to_wire(field: &FormField) -> FieldWire {
    let (options, settings) = match &field.config {
        FieldConfig::Label | FieldConfig::Attachment | FieldConfig::Sentiment => (None, None),
        FieldConfig::Textbox(s) => (
            None,
            Some(FieldSettingsWire {
                expandable: Some(s.expandable),
                dictate: Some(s.dictate),
                summarize: Some(s.summarize),
                sentiment: Some(s.sentiment),
                min_score: None,
                max_score: None,
            }),
        ),
        FieldConfig::Score(s) => (
            None,
            Some(FieldSettingsWire {
                expandable: None,
                dictate: None,
                summarize: None,
                sentiment: None,
                min_score: Some(s.min_score),
                max_score: Some(s.max_score),
            }),
        ),
        FieldConfig::Radio { options }
        | FieldConfig::Dropdown { options }
        | FieldConfig::Multiselect { options } => (Some(options.clone()), None),
    };

    FieldWire {
        id: field.id.to_string(),
        field_type: field.field_type().as_str().to_string(),
        label: field.label.clone(),
        required: Some(field.required),
        options,
        placeholder: field.placeholder.clone(),
        settings,
    }
}

// ============================================================================
// Wire -> domain
// ============================================================================

/// Convert a wire form to the domain model, validating ids, statuses,
/// timestamps, and per-field payloads.
pub fn form_from_wire(wire: FormWire) -> FormResult<AppraisalForm> {
    let id = EntityId::parse(&wire.id)?;
    let status = wire.status.parse()?;
    let workflow = wire
        .workflow
        .as_deref()
        .map(str::parse::<crate::form::WorkflowStage>)
        .transpose()?;
    let created_at = parse_timestamp(&wire.created_at)?;

    let sections = wire
        .sections
        .into_iter()
        .map(section_from_wire)
        .collect::<FormResult<Vec<_>>>()?;

    Ok(AppraisalForm {
        id,
        title: wire.title,
        created_at,
        status,
        workflow,
        sections,
    })
}

/// Convert a wire section to the domain model.
pub fn section_from_wire(wire: SectionWire) -> FormResult<FormSection> {
    let id = EntityId::parse(&wire.id)?;
    let status = wire.status.parse()?;
    let fields = wire
        .fields
        .into_iter()
        .map(field_from_wire)
        .collect::<FormResult<Vec<_>>>()?;

    Ok(FormSection {
        id,
        title: wire.title,
        status,
        fields,
    })
}

/// Convert a wire field to the domain model.
///
/// # Errors
///
/// Returns [`FormError::Translation`] if the `settings`/`options` payload
/// does not fit the declared `type`.
pub fn field_from_wire(wire: FieldWire) -> FormResult<FormField> {
    let id = EntityId::parse(&wire.id)?;
    let field_type: FieldType = wire.field_type.parse()?;

    if wire.options.is_some() && !field_type.has_options() {
        return Err(FormError::Translation(format!(
            "field '{}' of type {field_type} cannot carry options",
            wire.label
        )));
    }

    let config = match field_type {
        FieldType::Label | FieldType::Attachment | FieldType::Sentiment => {
            reject_settings(&wire, field_type)?;
            FieldConfig::default_for(field_type)
        }
        FieldType::Textbox => FieldConfig::Textbox(textbox_settings(&wire)?),
        FieldType::Score => FieldConfig::Score(score_settings(&wire)?),
        FieldType::Radio | FieldType::Dropdown | FieldType::Multiselect => {
            reject_settings(&wire, field_type)?;
            let options = wire.options.clone().unwrap_or_default();
            if options.is_empty() {
                return Err(FormError::Translation(format!(
                    "field '{}' of type {field_type} must carry at least one option",
                    wire.label
                )));
            }
            match field_type {
                FieldType::Radio => FieldConfig::Radio { options },
                FieldType::Dropdown => FieldConfig::Dropdown { options },
                _ => FieldConfig::Multiselect { options },
            }
        }
    };

    Ok(FormField {
        id,
        label: wire.label,
        required: wire.required.unwrap_or(false),
        placeholder: wire.placeholder,
        config,
    })
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn parse_timestamp(raw: &str) -> FormResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FormError::Translation(format!("invalid createdAt '{raw}': {e}")))
}

fn reject_settings(wire: &FieldWire, field_type: FieldType) -> FormResult<()> {
    if wire.settings.is_some() {
        return Err(FormError::Translation(format!(
            "field '{}' of type {field_type} cannot carry settings",
            wire.label
        )));
    }
    Ok(())
}

fn textbox_settings(wire: &FieldWire) -> FormResult<TextboxSettings> {
    let Some(settings) = &wire.settings else {
        return Ok(TextboxSettings::default());
    };
    if settings.min_score.is_some() || settings.max_score.is_some() {
        return Err(FormError::Translation(format!(
            "field '{}' of type textbox cannot carry score settings",
            wire.label
        )));
    }
    Ok(TextboxSettings {
        expandable: settings.expandable.unwrap_or(false),
        dictate: settings.dictate.unwrap_or(false),
        summarize: settings.summarize.unwrap_or(false),
        sentiment: settings.sentiment.unwrap_or(false),
    })
}

fn score_settings(wire: &FieldWire) -> FormResult<ScoreSettings> {
    let Some(settings) = &wire.settings else {
        return Ok(ScoreSettings::default());
    };
    if settings.expandable.is_some()
        || settings.dictate.is_some()
        || settings.summarize.is_some()
        || settings.sentiment.is_some()
    {
        return Err(FormError::Translation(format!(
            "field '{}' of type score cannot carry textbox settings",
            wire.label
        )));
    }
    let defaults = ScoreSettings::default();
    Ok(ScoreSettings {
        min_score: settings.min_score.unwrap_or(defaults.min_score),
        max_score: settings.max_score.unwrap_or(defaults.max_score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldType;

    const SAMPLE: &str = r#"{
        "id": "1700000000001",
        "title": "Annual Review",
        "createdAt": "2026-01-05T09:30:00+00:00",
        "status": "draft",
        "workflow": "pre-appraisal",
        "sections": [
            {
                "id": "1700000000002",
                "title": "Self Assessment",
                "status": "in-progress",
                "fields": [
                    {
                        "id": "1700000000003",
                        "type": "textbox",
                        "label": "Highlights",
                        "required": true,
                        "settings": { "expandable": true, "sentiment": true }
                    },
                    {
                        "id": "1700000000004",
                        "type": "dropdown",
                        "label": "Team",
                        "options": ["Cardiology", "Oncology"]
                    },
                    {
                        "id": "1700000000005",
                        "type": "score",
                        "label": "Overall",
                        "settings": { "minScore": 1, "maxScore": 5 }
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_a_complete_document() {
        let form = FormDocument::parse(SAMPLE).expect("parse document");

        assert_eq!(form.title, "Annual Review");
        assert_eq!(form.workflow, Some(crate::form::WorkflowStage::PreAppraisal));
        assert_eq!(form.sections.len(), 1);

        let section = &form.sections[0];
        assert_eq!(section.status, crate::form::SectionStatus::InProgress);
        assert_eq!(section.fields.len(), 3);

        match &section.fields[0].config {
            FieldConfig::Textbox(s) => {
                assert!(s.expandable);
                assert!(s.sentiment);
                assert!(!s.dictate);
            }
            other => panic!("expected textbox, got {other:?}"),
        }
        match &section.fields[2].config {
            FieldConfig::Score(s) => {
                assert_eq!(s.min_score, 1);
                assert_eq!(s.max_score, 5);
            }
            other => panic!("expected score, got {other:?}"),
        }
    }

    #[test]
    fn render_then_parse_round_trips() {
        let form = FormDocument::parse(SAMPLE).expect("parse document");
        let rendered = FormDocument::render(&form).expect("render document");
        let reparsed = FormDocument::parse(&rendered).expect("reparse document");
        assert_eq!(form, reparsed);
    }

    #[test]
    fn unknown_keys_are_rejected_with_a_path() {
        let raw = SAMPLE.replace("\"label\": \"Team\"", "\"label\": \"Team\", \"colour\": \"red\"");
        let err = FormDocument::parse(&raw).expect_err("should reject unknown key");
        match err {
            FormError::Translation(msg) => {
                assert!(msg.contains("sections[0].fields[1]"), "{msg}");
                assert!(msg.contains("colour"), "{msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn score_fields_cannot_carry_textbox_switches() {
        let raw = SAMPLE.replace(
            r#""settings": { "minScore": 1, "maxScore": 5 }"#,
            r#""settings": { "minScore": 1, "dictate": true }"#,
        );
        let err = FormDocument::parse(&raw).expect_err("should reject mixed settings");
        match err {
            FormError::Translation(msg) => assert!(msg.contains("textbox settings"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn labels_cannot_carry_options() {
        let wire = FieldWire {
            id: "1700000000010".into(),
            field_type: "label".into(),
            label: "Heading".into(),
            required: None,
            options: Some(vec!["stray".into()]),
            placeholder: None,
            settings: None,
        };
        let err = field_from_wire(wire).expect_err("should reject options on label");
        assert!(matches!(err, FormError::Translation(_)));
    }

    #[test]
    fn choice_fields_need_a_non_empty_option_list() {
        let wire = FieldWire {
            id: "1700000000011".into(),
            field_type: "radio".into(),
            label: "Pick one".into(),
            required: None,
            options: Some(Vec::new()),
            placeholder: None,
            settings: None,
        };
        let err = field_from_wire(wire).expect_err("should reject empty options");
        assert!(matches!(err, FormError::Translation(_)));

        let missing = FieldWire {
            id: "1700000000012".into(),
            field_type: "multiselect".into(),
            label: "Pick many".into(),
            required: None,
            options: None,
            placeholder: None,
            settings: None,
        };
        assert!(field_from_wire(missing).is_err());
    }

    #[test]
    fn absent_settings_fall_back_to_type_defaults() {
        let wire = FieldWire {
            id: "1700000000013".into(),
            field_type: "score".into(),
            label: "Overall".into(),
            required: None,
            options: None,
            placeholder: None,
            settings: None,
        };
        let field = field_from_wire(wire).expect("parse score field");
        assert_eq!(field.config, FieldConfig::default_for(FieldType::Score));
        assert!(!field.required);
    }

    #[test]
    fn bad_timestamps_and_statuses_are_translation_errors() {
        let bad_time = SAMPLE.replace("2026-01-05T09:30:00+00:00", "yesterday");
        assert!(matches!(
            FormDocument::parse(&bad_time),
            Err(FormError::Translation(_))
        ));

        let bad_status = SAMPLE.replace("\"status\": \"draft\"", "\"status\": \"done\"");
        assert!(matches!(
            FormDocument::parse(&bad_status),
            Err(FormError::Translation(_))
        ));
    }

    #[test]
    fn rendered_fields_always_state_required() {
        let form = FormDocument::parse(SAMPLE).expect("parse document");
        let wire = form_to_wire(&form);
        let dropdown = &wire.sections[0].fields[1];
        assert_eq!(dropdown.required, Some(false));
        assert_eq!(
            dropdown.options.as_deref(),
            Some(&["Cardiology".to_string(), "Oncology".to_string()][..])
        );
    }
}
