//! The form store: the only place mutations land.
//!
//! Holds every form created in the session plus the current selection. All
//! state is volatile; nothing is persisted anywhere.

use afb_types::EntityId;

use crate::form::AppraisalForm;

/// In-memory store of appraisal forms and the current selection.
#[derive(Clone, Debug, Default)]
pub struct FormStore {
    forms: Vec<AppraisalForm>,
    current: Option<AppraisalForm>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh draft form, appends it to the list and makes it the
    /// current form. Returns the created form.
    pub fn create_form(&mut self) -> AppraisalForm {
        let form = AppraisalForm::new();
        self.forms.push(form.clone());
        self.current = Some(form.clone());
        form
    }

    /// Selects the form with the given id as current. When no stored form
    /// matches, the selection is left unchanged (silent no-op).
    pub fn select_form(&mut self, form_id: EntityId) {
        if let Some(form) = self.forms.iter().find(|f| f.id == form_id) {
            self.current = Some(form.clone());
        }
    }

    /// Replaces the stored form whose id matches `updated`, and installs
    /// `updated` as the current form.
    ///
    /// When no stored form matches, the list is left unchanged; the value
    /// still becomes the current form. Callers relying on the list should be
    /// aware that such an update effectively vanishes on the next selection.
    pub fn update_form(&mut self, updated: AppraisalForm) {
        for form in &mut self.forms {
            if form.id == updated.id {
                *form = updated.clone();
            }
        }
        self.current = Some(updated);
    }

    /// All stored forms, in creation order.
    pub fn forms(&self) -> &[AppraisalForm] {
        &self.forms
    }

    /// The currently selected form, if any.
    pub fn current_form(&self) -> Option<&AppraisalForm> {
        self.current.as_ref()
    }

    /// Looks up a stored form by id.
    pub fn form(&self, form_id: EntityId) -> Option<&AppraisalForm> {
        self.forms.iter().find(|f| f.id == form_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creating_a_form_appends_and_selects_it() {
        let mut store = FormStore::new();
        let form = store.create_form();

        assert_eq!(store.forms().len(), 1);
        assert_eq!(store.current_form(), Some(&form));

        let second = store.create_form();
        assert_eq!(store.forms().len(), 2);
        assert_eq!(store.current_form(), Some(&second));
    }

    #[test]
    fn selecting_an_unknown_id_keeps_the_selection() {
        let mut store = FormStore::new();
        let form = store.create_form();

        store.select_form(afb_types::EntityId::generate());
        assert_eq!(store.current_form(), Some(&form));
    }

    #[test]
    fn selecting_switches_the_current_form() {
        let mut store = FormStore::new();
        let first = store.create_form();
        let _second = store.create_form();

        store.select_form(first.id);
        assert_eq!(store.current_form(), Some(&first));
    }

    #[test]
    fn updating_replaces_the_stored_entry() {
        let mut store = FormStore::new();
        let form = store.create_form();

        let renamed = form.with_title("Annual Review");
        store.update_form(renamed.clone());

        assert_eq!(store.form(form.id), Some(&renamed));
        assert_eq!(store.current_form(), Some(&renamed));
        assert_eq!(store.forms().len(), 1);
    }

    #[test]
    fn updating_an_unknown_form_leaves_the_list_but_sets_current() {
        let mut store = FormStore::new();
        let stored = store.create_form();

        let stray = AppraisalForm::new().with_title("Orphan");
        store.update_form(stray.clone());

        assert_eq!(store.forms(), &[stored]);
        assert_eq!(store.current_form(), Some(&stray));
    }
}
