use std::collections::HashMap;

use crate::timers::entities::{Timer, TimerId};

/// Values of an open create or edit form. `id` is set only when editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerForm {
    pub id: Option<TimerId>,
    pub title: String,
    pub project: String,
}

impl TimerForm {
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form prefilled with the current values of `timer`.
    pub fn for_timer(timer: &Timer) -> Self {
        Self {
            id: Some(timer.id),
            title: timer.title.clone(),
            project: timer.project.clone(),
        }
    }

    pub fn submit_text(&self) -> &'static str {
        if self.id.is_some() {
            "Update"
        } else {
            "Create"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Open(TimerForm),
}

/// Two state machine deciding whether a summary or a form is shown.
///
/// `Closed -> Open` on [Toggle::open], `Open -> Closed` on [Toggle::submit] (which hands the form
/// back to the caller) or [Toggle::cancel] (which throws it away). Transitions that don't apply to
/// the current state are ignored.
#[derive(Debug, Clone, Default)]
pub struct Toggle {
    state: FormState,
}

impl Toggle {
    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open(_))
    }

    pub fn form(&self) -> Option<&TimerForm> {
        match &self.state {
            FormState::Open(form) => Some(form),
            FormState::Closed => None,
        }
    }

    /// Opens with `form`. An already open form keeps what was typed into it.
    pub fn open(&mut self, form: TimerForm) -> bool {
        match self.state {
            FormState::Closed => {
                self.state = FormState::Open(form);
                true
            }
            FormState::Open(_) => false,
        }
    }

    /// Replaces the typed values of an open form.
    pub fn update(&mut self, title: String, project: String) -> bool {
        match &mut self.state {
            FormState::Open(form) => {
                form.title = title;
                form.project = project;
                true
            }
            FormState::Closed => false,
        }
    }

    pub fn submit(&mut self) -> Option<TimerForm> {
        match std::mem::take(&mut self.state) {
            FormState::Open(form) => Some(form),
            FormState::Closed => None,
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.submit().is_some()
    }
}

/// Which toggle an action is aimed at: the header one that creates timers, or the one that
/// belongs to a listed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormTarget {
    Create,
    Edit(TimerId),
}

/// Display-side toggle state, kept out of the timer entity. Entries start Closed and are made on
/// first use.
#[derive(Debug, Default)]
pub struct VisibilityMap {
    header: Toggle,
    entries: HashMap<TimerId, Toggle>,
}

impl VisibilityMap {
    pub fn get(&self, target: FormTarget) -> Option<&Toggle> {
        match target {
            FormTarget::Create => Some(&self.header),
            FormTarget::Edit(id) => self.entries.get(&id),
        }
    }

    pub fn get_mut(&mut self, target: FormTarget) -> &mut Toggle {
        match target {
            FormTarget::Create => &mut self.header,
            FormTarget::Edit(id) => self.entries.entry(id).or_default(),
        }
    }

    pub fn is_open(&self, target: FormTarget) -> bool {
        self.get(target).is_some_and(Toggle::is_open)
    }

    pub fn remove(&mut self, id: TimerId) {
        self.entries.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::{FormState, FormTarget, TimerForm, Toggle, VisibilityMap};
    use crate::timers::entities::{Timer, TimerId};

    #[test]
    fn starts_closed() {
        let toggle = Toggle::default();
        assert_eq!(toggle.state(), &FormState::Closed);
        assert!(toggle.form().is_none());
    }

    #[test]
    fn submit_hands_back_typed_values_and_closes() {
        let mut toggle = Toggle::default();
        assert!(toggle.open(TimerForm::blank()));
        assert!(toggle.update("Practice squat".into(), "Gym Chores".into()));

        let form = toggle.submit().unwrap();
        assert_eq!(form.title, "Practice squat");
        assert_eq!(form.project, "Gym Chores");
        assert!(!toggle.is_open());
        assert!(toggle.submit().is_none());
    }

    #[test]
    fn cancel_discards_and_closes() {
        let mut toggle = Toggle::default();
        toggle.open(TimerForm::blank());
        toggle.update("x".into(), "y".into());

        assert!(toggle.cancel());
        assert!(!toggle.is_open());
        assert!(!toggle.cancel());

        toggle.open(TimerForm::blank());
        assert_eq!(toggle.form(), Some(&TimerForm::blank()));
    }

    #[test]
    fn reopening_keeps_typed_values() {
        let mut toggle = Toggle::default();
        toggle.open(TimerForm::blank());
        toggle.update("typed".into(), "".into());

        assert!(!toggle.open(TimerForm::blank()));
        assert_eq!(toggle.form().unwrap().title, "typed");
    }

    #[test]
    fn update_requires_open_form() {
        let mut toggle = Toggle::default();
        assert!(!toggle.update("x".into(), "y".into()));
    }

    #[test]
    fn submit_text_depends_on_id() {
        let timer = Timer::new(TimerId::new_v4(), "t".into(), "p".into());
        assert_eq!(TimerForm::blank().submit_text(), "Create");
        assert_eq!(TimerForm::for_timer(&timer).submit_text(), "Update");
    }

    #[test]
    fn entries_are_independent() {
        let first = TimerId::new_v4();
        let second = TimerId::new_v4();
        let mut map = VisibilityMap::default();

        map.get_mut(FormTarget::Edit(first)).open(TimerForm::blank());

        assert!(map.is_open(FormTarget::Edit(first)));
        assert!(!map.is_open(FormTarget::Edit(second)));
        assert!(!map.is_open(FormTarget::Create));

        map.remove(first);
        assert!(!map.is_open(FormTarget::Edit(first)));
    }
}
