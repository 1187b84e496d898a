//! Workflow stage assignment.
//!
//! A form can nominally be assigned to the three appraisal stages via
//! independent flags; the form itself only carries the single stage derived
//! from them. Actually contacting a workflow system is out of scope: the
//! assign action writes a diagnostic record and nothing else.

use afb_types::EntityId;

use crate::form::{AppraisalForm, WorkflowStage};

/// Ephemeral workflow assignment state for one form.
///
/// Not persisted on the form except as the single derived `workflow` stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkflowProcess {
    pub pre_appraisal: bool,
    pub appraisal_meeting: bool,
    pub post_appraisal: bool,
    pub assigned_form: EntityId,
}

impl WorkflowProcess {
    /// Creates the all-flags-off state for a form.
    pub fn new(assigned_form: EntityId) -> Self {
        Self {
            pre_appraisal: false,
            appraisal_meeting: false,
            post_appraisal: false,
            assigned_form,
        }
    }

    /// Sets a single stage flag.
    pub fn set_stage(&mut self, stage: WorkflowStage, enabled: bool) {
        match stage {
            WorkflowStage::PreAppraisal => self.pre_appraisal = enabled,
            WorkflowStage::AppraisalMeeting => self.appraisal_meeting = enabled,
            WorkflowStage::PostAppraisal => self.post_appraisal = enabled,
        }
    }

    /// The single stage the form carries, derived from the flags in fixed
    /// priority order pre -> meeting -> post. Multiple set flags never
    /// combine; the first true one wins. No flag set derives no stage.
    pub fn derived_stage(&self) -> Option<WorkflowStage> {
        if self.pre_appraisal {
            Some(WorkflowStage::PreAppraisal)
        } else if self.appraisal_meeting {
            Some(WorkflowStage::AppraisalMeeting)
        } else if self.post_appraisal {
            Some(WorkflowStage::PostAppraisal)
        } else {
            None
        }
    }

    /// Returns the form with its `workflow` field recomputed from the flags.
    pub fn apply_to(&self, form: &AppraisalForm) -> AppraisalForm {
        form.with_workflow(self.derived_stage())
    }

    /// The "Assign to Workflow" action. No workflow system exists to
    /// contact; this only records the assignment in the log.
    pub fn assign(&self) {
        tracing::info!(
            form_id = %self.assigned_form,
            pre_appraisal = self.pre_appraisal,
            appraisal_meeting = self.appraisal_meeting,
            post_appraisal = self.post_appraisal,
            stage = self.derived_stage().map(|s| s.as_str()).unwrap_or("none"),
            "form assigned to workflow"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_true_flag_wins_in_priority_order() {
        let mut process = WorkflowProcess::new(EntityId::generate());
        process.pre_appraisal = true;
        process.appraisal_meeting = true;

        assert_eq!(process.derived_stage(), Some(WorkflowStage::PreAppraisal));
    }

    #[test]
    fn meeting_beats_post_when_pre_is_off() {
        let mut process = WorkflowProcess::new(EntityId::generate());
        process.appraisal_meeting = true;
        process.post_appraisal = true;

        assert_eq!(
            process.derived_stage(),
            Some(WorkflowStage::AppraisalMeeting)
        );
    }

    #[test]
    fn no_flags_means_no_stage() {
        let process = WorkflowProcess::new(EntityId::generate());
        assert_eq!(process.derived_stage(), None);
    }

    #[test]
    fn applying_writes_the_derived_stage_onto_the_form() {
        let form = AppraisalForm::new();
        let mut process = WorkflowProcess::new(form.id);
        process.set_stage(WorkflowStage::PostAppraisal, true);

        let assigned = process.apply_to(&form);
        assert_eq!(assigned.workflow, Some(WorkflowStage::PostAppraisal));

        // Clearing the flag clears the stage again.
        process.set_stage(WorkflowStage::PostAppraisal, false);
        let cleared = process.apply_to(&assigned);
        assert_eq!(cleared.workflow, None);
    }
}
