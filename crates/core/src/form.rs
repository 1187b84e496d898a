//! The appraisal form model and its builder transitions.
//!
//! An [`AppraisalForm`] owns an ordered list of [`FormSection`]s, each owning
//! an ordered list of [`FormField`]s. All builder operations are
//! clone-and-replace: they take the current value and return a new one, so a
//! caller always hands a complete replacement back to the store. Operations
//! addressing a child by id are total; when the id matches nothing, the
//! returned value equals the input.
//!
//! Type-specific field configuration is a sum type ([`FieldConfig`]) rather
//! than an open optional-properties record, so a score field cannot carry
//! textbox switches and a label cannot carry options.

use std::fmt;
use std::str::FromStr;

use afb_types::EntityId;
use chrono::{DateTime, Utc};

use crate::FormError;

/// Lifecycle status of a whole form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormStatus {
    Draft,
    Active,
    Archived,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(FormError::Translation(format!(
                "status must be draft, active, or archived, got '{other}'"
            ))),
        }
    }
}

/// Traffic-light completion status of a section.
///
/// Purely a manual annotation: nothing derives it from field completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl SectionStatus {
    /// The next state in the cyclic toggle:
    /// not-started -> in-progress -> complete -> not-started.
    pub fn next(&self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Complete,
            Self::Complete => Self::NotStarted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Complete => "complete",
        }
    }

    /// Human-readable label, as shown next to the traffic light.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionStatus {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-started" => Ok(Self::NotStarted),
            "in-progress" => Ok(Self::InProgress),
            "complete" => Ok(Self::Complete),
            other => Err(FormError::Translation(format!(
                "section status must be not-started, in-progress, or complete, got '{other}'"
            ))),
        }
    }
}

/// Workflow stage a form can be assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowStage {
    PreAppraisal,
    AppraisalMeeting,
    PostAppraisal,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreAppraisal => "pre-appraisal",
            Self::AppraisalMeeting => "appraisal-meeting",
            Self::PostAppraisal => "post-appraisal",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStage {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-appraisal" => Ok(Self::PreAppraisal),
            "appraisal-meeting" => Ok(Self::AppraisalMeeting),
            "post-appraisal" => Ok(Self::PostAppraisal),
            other => Err(FormError::Translation(format!(
                "workflow must be pre-appraisal, appraisal-meeting, or post-appraisal, got '{other}'"
            ))),
        }
    }
}

/// The declared type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Label,
    Textbox,
    Radio,
    Attachment,
    Dropdown,
    Multiselect,
    Score,
    Sentiment,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        Self::Label,
        Self::Textbox,
        Self::Radio,
        Self::Attachment,
        Self::Dropdown,
        Self::Multiselect,
        Self::Score,
        Self::Sentiment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Textbox => "textbox",
            Self::Radio => "radio",
            Self::Attachment => "attachment",
            Self::Dropdown => "dropdown",
            Self::Multiselect => "multiselect",
            Self::Score => "score",
            Self::Sentiment => "sentiment",
        }
    }

    /// Capitalised type name, used in the default label of a fresh field.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Label => "Label",
            Self::Textbox => "Textbox",
            Self::Radio => "Radio",
            Self::Attachment => "Attachment",
            Self::Dropdown => "Dropdown",
            Self::Multiselect => "Multiselect",
            Self::Score => "Score",
            Self::Sentiment => "Sentiment",
        }
    }

    /// Whether this type carries an option list (radio/dropdown/multiselect).
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Radio | Self::Dropdown | Self::Multiselect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "label" => Ok(Self::Label),
            "textbox" => Ok(Self::Textbox),
            "radio" => Ok(Self::Radio),
            "attachment" => Ok(Self::Attachment),
            "dropdown" => Ok(Self::Dropdown),
            "multiselect" => Ok(Self::Multiselect),
            "score" => Ok(Self::Score),
            "sentiment" => Ok(Self::Sentiment),
            other => Err(FormError::Translation(format!(
                "unknown field type '{other}'"
            ))),
        }
    }
}

/// Switches available on a textbox field.
///
/// `expandable` toggles single-line vs multi-line rendering; the other three
/// enable the dictate, summarize, and live-sentiment affordances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextboxSettings {
    pub expandable: bool,
    pub dictate: bool,
    pub summarize: bool,
    pub sentiment: bool,
}

/// Inclusive score range for a score field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreSettings {
    pub min_score: i32,
    pub max_score: i32,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            min_score: 1,
            max_score: 10,
        }
    }
}

/// Type-specific configuration, one variant per field type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldConfig {
    Label,
    Textbox(TextboxSettings),
    Radio { options: Vec<String> },
    Dropdown { options: Vec<String> },
    Multiselect { options: Vec<String> },
    Attachment,
    Score(ScoreSettings),
    Sentiment,
}

impl FieldConfig {
    /// Default configuration for a freshly added field of the given type.
    ///
    /// Choice types start with three placeholder options; textbox switches
    /// start all-off; score ranges default to 1..=10.
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Label => Self::Label,
            FieldType::Textbox => Self::Textbox(TextboxSettings::default()),
            FieldType::Radio => Self::Radio {
                options: Self::default_options(),
            },
            FieldType::Dropdown => Self::Dropdown {
                options: Self::default_options(),
            },
            FieldType::Multiselect => Self::Multiselect {
                options: Self::default_options(),
            },
            FieldType::Attachment => Self::Attachment,
            FieldType::Score => Self::Score(ScoreSettings::default()),
            FieldType::Sentiment => Self::Sentiment,
        }
    }

    fn default_options() -> Vec<String> {
        (1..=3).map(|n| format!("Option {n}")).collect()
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Label => FieldType::Label,
            Self::Textbox(_) => FieldType::Textbox,
            Self::Radio { .. } => FieldType::Radio,
            Self::Dropdown { .. } => FieldType::Dropdown,
            Self::Multiselect { .. } => FieldType::Multiselect,
            Self::Attachment => FieldType::Attachment,
            Self::Score(_) => FieldType::Score,
            Self::Sentiment => FieldType::Sentiment,
        }
    }

    /// The option list, for the three choice types.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::Radio { options } | Self::Dropdown { options } | Self::Multiselect { options } => {
                Some(options)
            }
            _ => None,
        }
    }
}

/// A single typed input element within a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub id: EntityId,
    pub label: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub config: FieldConfig,
}

impl FormField {
    /// Creates a field of the given type with a fresh id and type-appropriate
    /// defaults. The label starts as `"New "` plus the capitalised type name.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            id: EntityId::generate(),
            label: format!("New {}", field_type.display_name()),
            required: false,
            placeholder: None,
            config: FieldConfig::default_for(field_type),
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.config.field_type()
    }
}

/// A named, status-tagged group of fields within a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSection {
    pub id: EntityId,
    pub title: String,
    pub status: SectionStatus,
    pub fields: Vec<FormField>,
}

impl FormSection {
    /// Creates an empty section titled "New Section", not started.
    pub fn new() -> Self {
        Self {
            id: EntityId::generate(),
            title: "New Section".to_string(),
            status: SectionStatus::NotStarted,
            fields: Vec::new(),
        }
    }

    /// Looks up a field by id.
    pub fn field(&self, field_id: EntityId) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Returns this section with the title replaced. Empty titles are
    /// accepted; no trimming or validation is applied.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.title = title.into();
        next
    }

    /// Returns this section with the status set directly.
    pub fn with_status(&self, status: SectionStatus) -> Self {
        let mut next = self.clone();
        next.status = status;
        next
    }

    /// Returns this section with the traffic light advanced one step.
    pub fn with_status_advanced(&self) -> Self {
        self.with_status(self.status.next())
    }

    /// Returns this section with a fresh default field of the given type
    /// appended.
    pub fn with_field_added(&self, field_type: FieldType) -> Self {
        let mut next = self.clone();
        next.fields.push(FormField::new(field_type));
        next
    }

    /// Returns this section with the field matching `field_id` replaced.
    /// When no field matches, the section is returned unchanged.
    pub fn with_field_replaced(&self, field_id: EntityId, replacement: FormField) -> Self {
        let mut next = self.clone();
        for field in &mut next.fields {
            if field.id == field_id {
                *field = replacement.clone();
            }
        }
        next
    }

    /// Returns this section with the field matching `field_id` removed.
    /// When no field matches, the section is returned unchanged.
    pub fn with_field_removed(&self, field_id: EntityId) -> Self {
        let mut next = self.clone();
        next.fields.retain(|f| f.id != field_id);
        next
    }
}

impl Default for FormSection {
    fn default() -> Self {
        Self::new()
    }
}

/// A top-level appraisal template, composed of ordered sections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppraisalForm {
    pub id: EntityId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub status: FormStatus,
    pub workflow: Option<WorkflowStage>,
    pub sections: Vec<FormSection>,
}

impl AppraisalForm {
    /// Creates a draft form titled "New Appraisal Form" with no sections.
    pub fn new() -> Self {
        Self {
            id: EntityId::generate(),
            title: "New Appraisal Form".to_string(),
            created_at: Utc::now(),
            status: FormStatus::Draft,
            workflow: None,
            sections: Vec::new(),
        }
    }

    /// Looks up a section by id.
    pub fn section(&self, section_id: EntityId) -> Option<&FormSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Looks up a field by id across all sections.
    pub fn field(&self, field_id: EntityId) -> Option<&FormField> {
        self.sections.iter().find_map(|s| s.field(field_id))
    }

    /// Returns this form with the title replaced. Empty titles are accepted.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.title = title.into();
        next
    }

    /// Returns this form with the workflow stage set (or cleared).
    pub fn with_workflow(&self, workflow: Option<WorkflowStage>) -> Self {
        let mut next = self.clone();
        next.workflow = workflow;
        next
    }

    /// Returns this form with a fresh empty section appended.
    pub fn with_section_added(&self) -> Self {
        let mut next = self.clone();
        next.sections.push(FormSection::new());
        next
    }

    /// Returns this form with the section matching `section_id` replaced.
    /// When no section matches, the form is returned unchanged.
    pub fn with_section_replaced(&self, section_id: EntityId, replacement: FormSection) -> Self {
        let mut next = self.clone();
        for section in &mut next.sections {
            if section.id == section_id {
                *section = replacement.clone();
            }
        }
        next
    }

    /// Returns this form with the section matching `section_id` removed,
    /// discarding its fields with it. When no section matches, the form is
    /// returned unchanged.
    pub fn with_section_removed(&self, section_id: EntityId) -> Self {
        let mut next = self.clone();
        next.sections.retain(|s| s.id != section_id);
        next
    }
}

impl Default for AppraisalForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_section_appends_a_fresh_default() {
        let form = AppraisalForm::new();
        let next = form.with_section_added();

        assert_eq!(next.sections.len(), form.sections.len() + 1);
        let section = next.sections.last().expect("appended section");
        assert_eq!(section.title, "New Section");
        assert_eq!(section.status, SectionStatus::NotStarted);
        assert!(section.fields.is_empty());
        // The original value is untouched.
        assert!(form.sections.is_empty());
    }

    #[test]
    fn new_form_starts_as_an_untitled_draft() {
        let form = AppraisalForm::new();
        assert_eq!(form.title, "New Appraisal Form");
        assert_eq!(form.status, FormStatus::Draft);
        assert_eq!(form.workflow, None);
        assert!(form.sections.is_empty());
    }

    #[test]
    fn added_fields_carry_type_appropriate_defaults() {
        let section = FormSection::new();

        for field_type in FieldType::ALL {
            let next = section.with_field_added(field_type);
            let field = next.fields.last().expect("appended field");

            assert_eq!(field.label, format!("New {}", field_type.display_name()));
            assert!(!field.required);
            assert_eq!(field.config, FieldConfig::default_for(field_type));
        }
    }

    #[test]
    fn score_defaults_span_one_to_ten() {
        match FieldConfig::default_for(FieldType::Score) {
            FieldConfig::Score(settings) => {
                assert_eq!(settings.min_score, 1);
                assert_eq!(settings.max_score, 10);
            }
            other => panic!("expected score config, got {other:?}"),
        }
    }

    #[test]
    fn choice_defaults_hold_three_numbered_options() {
        for field_type in [FieldType::Radio, FieldType::Dropdown, FieldType::Multiselect] {
            let config = FieldConfig::default_for(field_type);
            assert_eq!(
                config.options().expect("options"),
                ["Option 1", "Option 2", "Option 3"]
            );
        }
    }

    #[test]
    fn textbox_switches_default_to_off() {
        match FieldConfig::default_for(FieldType::Textbox) {
            FieldConfig::Textbox(settings) => assert_eq!(settings, TextboxSettings::default()),
            other => panic!("expected textbox config, got {other:?}"),
        }
    }

    #[test]
    fn removing_an_unknown_field_is_a_no_op() {
        let section = FormSection::new().with_field_added(FieldType::Textbox);
        let unknown = EntityId::generate();
        assert_eq!(section.with_field_removed(unknown), section);
    }

    #[test]
    fn removing_an_unknown_section_is_a_no_op() {
        let form = AppraisalForm::new().with_section_added();
        let unknown = EntityId::generate();
        assert_eq!(form.with_section_removed(unknown), form);
    }

    #[test]
    fn replacing_a_field_round_trips_exactly() {
        let section = FormSection::new().with_field_added(FieldType::Radio);
        let field_id = section.fields[0].id;

        let mut replacement = section.fields[0].clone();
        replacement.label = "Overall rating".to_string();
        replacement.required = true;
        replacement.config = FieldConfig::Radio {
            options: vec!["Yes".into(), "No".into()],
        };

        let next = section.with_field_replaced(field_id, replacement.clone());
        assert_eq!(next.field(field_id), Some(&replacement));
    }

    #[test]
    fn replacing_an_unknown_section_leaves_the_form_unchanged() {
        let form = AppraisalForm::new().with_section_added();
        let next = form.with_section_replaced(EntityId::generate(), FormSection::new());
        assert_eq!(next, form);
    }

    #[test]
    fn traffic_light_cycles_back_after_three_steps() {
        let section = FormSection::new();
        assert_eq!(section.status, SectionStatus::NotStarted);

        let once = section.with_status_advanced();
        assert_eq!(once.status, SectionStatus::InProgress);

        let twice = once.with_status_advanced();
        assert_eq!(twice.status, SectionStatus::Complete);

        let thrice = twice.with_status_advanced();
        assert_eq!(thrice.status, SectionStatus::NotStarted);
    }

    #[test]
    fn empty_titles_are_accepted_verbatim() {
        let form = AppraisalForm::new().with_title("");
        assert_eq!(form.title, "");

        let section = FormSection::new().with_title("  ");
        assert_eq!(section.title, "  ");
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [FormStatus::Draft, FormStatus::Active, FormStatus::Archived] {
            assert_eq!(status.as_str().parse::<FormStatus>().expect("parse"), status);
        }
        for stage in [
            WorkflowStage::PreAppraisal,
            WorkflowStage::AppraisalMeeting,
            WorkflowStage::PostAppraisal,
        ] {
            assert_eq!(
                stage.as_str().parse::<WorkflowStage>().expect("parse"),
                stage
            );
        }
        assert!("mid-appraisal".parse::<WorkflowStage>().is_err());
    }
}
