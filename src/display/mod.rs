//! Everything the display side owns: which forms are open, what each row shows and when to
//! re-render. The store stays free of presentation state.

pub mod refresh;
pub mod visibility;

use std::time::Duration;

use chrono::{DateTime, Utc};
use refresh::RefreshLoop;
use tracing::debug;
use visibility::{FormTarget, TimerForm, VisibilityMap};

use crate::timers::{
    entities::{Timer, TimerId},
    store::{TimerSnapshot, TimerStore},
};

/// One rendered entry of the timer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRow {
    pub id: TimerId,
    pub title: String,
    pub project: String,
    pub elapsed: String,
    pub running: bool,
    /// Set while the edit form of this timer is open.
    pub form: Option<TimerForm>,
}

/// Result of submitting a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// There was no open form to submit.
    NotOpen,
    Created(Timer),
    Edited(TimerId),
    /// The edited timer was deleted while its form was open. The form is closed anyway.
    TimerGone(TimerId),
}

/// Binds the store to per-timer and header form toggles. User intents enter here.
pub struct Dashboard {
    store: TimerStore,
    visibility: VisibilityMap,
}

impl Dashboard {
    pub fn new(store: TimerStore) -> Self {
        Self {
            store,
            visibility: VisibilityMap::default(),
        }
    }

    pub fn store(&self) -> &TimerStore {
        &self.store
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.store.snapshot()
    }

    pub fn refresh_loop(&self, interval: Duration) -> RefreshLoop {
        RefreshLoop::new(self.store.subscribe(), self.store.clock(), interval)
    }

    pub fn is_open(&self, target: FormTarget) -> bool {
        self.visibility.is_open(target)
    }

    pub fn form(&self, target: FormTarget) -> Option<&TimerForm> {
        self.visibility.get(target).and_then(|toggle| toggle.form())
    }

    pub fn open_create_form(&mut self) -> bool {
        self.visibility
            .get_mut(FormTarget::Create)
            .open(TimerForm::blank())
    }

    /// Opens the edit form of `id` prefilled with its current title and project.
    pub fn open_edit_form(&mut self, id: TimerId) -> bool {
        let Some(timer) = self.store.get(id) else {
            return false;
        };
        let form = TimerForm::for_timer(timer);
        self.visibility.get_mut(FormTarget::Edit(id)).open(form)
    }

    pub fn update_form(&mut self, target: FormTarget, title: String, project: String) -> bool {
        self.visibility.get_mut(target).update(title, project)
    }

    pub fn submit(&mut self, target: FormTarget) -> SubmitOutcome {
        let Some(form) = self.visibility.get_mut(target).submit() else {
            return SubmitOutcome::NotOpen;
        };
        debug!("Submitting {:?} form", target);
        match target {
            FormTarget::Create => {
                SubmitOutcome::Created(self.store.create(form.title, form.project))
            }
            FormTarget::Edit(id) => {
                if self.store.edit(id, form.title, form.project) {
                    SubmitOutcome::Edited(id)
                } else {
                    SubmitOutcome::TimerGone(id)
                }
            }
        }
    }

    /// Closes the form without touching the store.
    pub fn cancel(&mut self, target: FormTarget) -> bool {
        self.visibility.get_mut(target).cancel()
    }

    pub fn start(&mut self, id: TimerId) -> bool {
        self.store.start(id)
    }

    pub fn stop(&mut self, id: TimerId) -> bool {
        self.store.stop(id)
    }

    pub fn delete(&mut self, id: TimerId) -> bool {
        self.visibility.remove(id);
        self.store.delete(id)
    }

    pub fn rows(&self, now: DateTime<Utc>) -> Vec<TimerRow> {
        self.store
            .snapshot()
            .iter()
            .map(|timer| TimerRow {
                id: timer.id,
                title: timer.title.clone(),
                project: timer.project.clone(),
                elapsed: timer.render_elapsed(now),
                running: timer.is_running(),
                form: self.form(FormTarget::Edit(timer.id)).cloned(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Dashboard, SubmitOutcome};
    use crate::{
        display::visibility::FormTarget,
        timers::{
            entities::{Timer, TimerId},
            store::TimerStore,
        },
        utils::clock::ManualClock,
    };

    fn dashboard(clock: &ManualClock, timers: Vec<Timer>) -> Dashboard {
        Dashboard::new(TimerStore::from_timers(timers, Arc::new(clock.clone())))
    }

    #[test]
    fn create_flow() {
        let clock = ManualClock::at_millis(0);
        let mut dashboard = dashboard(&clock, vec![]);

        assert_eq!(dashboard.submit(FormTarget::Create), SubmitOutcome::NotOpen);
        assert!(dashboard.open_create_form());
        assert_eq!(
            dashboard.form(FormTarget::Create).unwrap().submit_text(),
            "Create"
        );
        dashboard.update_form(FormTarget::Create, "A".into(), "P".into());

        let SubmitOutcome::Created(created) = dashboard.submit(FormTarget::Create) else {
            panic!("Expected a created timer");
        };
        assert_eq!(created.title, "A");
        assert!(!dashboard.is_open(FormTarget::Create));
        assert_eq!(dashboard.snapshot().len(), 1);
    }

    #[test]
    fn cancel_does_not_touch_the_store() {
        let clock = ManualClock::at_millis(0);
        let existing = Timer::new(TimerId::new_v4(), "t".into(), "p".into());
        let id = existing.id;
        let mut dashboard = dashboard(&clock, vec![existing.clone()]);

        dashboard.open_create_form();
        dashboard.update_form(FormTarget::Create, "A".into(), "P".into());
        assert!(dashboard.cancel(FormTarget::Create));

        dashboard.open_edit_form(id);
        dashboard.update_form(FormTarget::Edit(id), "x".into(), "y".into());
        assert!(dashboard.cancel(FormTarget::Edit(id)));

        assert_eq!(&*dashboard.snapshot(), &[existing]);
    }

    #[test]
    fn edit_flow_prefills_and_keeps_time() {
        let clock = ManualClock::at_millis(1000);
        let existing = Timer::new(TimerId::new_v4(), "Practice squat".into(), "Gym".into())
            .with_elapsed(5000);
        let id = existing.id;
        let mut dashboard = dashboard(&clock, vec![existing]);
        dashboard.start(id);

        assert!(dashboard.open_edit_form(id));
        let form = dashboard.form(FormTarget::Edit(id)).unwrap();
        assert_eq!(form.title, "Practice squat");
        assert_eq!(form.submit_text(), "Update");

        dashboard.update_form(FormTarget::Edit(id), "Deadlift".into(), "Gym".into());
        assert_eq!(dashboard.submit(FormTarget::Edit(id)), SubmitOutcome::Edited(id));

        let timer = dashboard.store().get(id).unwrap();
        assert_eq!(timer.title, "Deadlift");
        assert_eq!(timer.elapsed, 5000);
        assert!(timer.is_running());
    }

    #[test]
    fn edit_of_missing_timer_does_not_open() {
        let clock = ManualClock::at_millis(0);
        let mut dashboard = dashboard(&clock, vec![]);
        let id = TimerId::new_v4();

        assert!(!dashboard.open_edit_form(id));
        assert_eq!(dashboard.submit(FormTarget::Edit(id)), SubmitOutcome::NotOpen);
    }

    #[test]
    fn delete_closes_the_entry_form() {
        let clock = ManualClock::at_millis(0);
        let existing = Timer::new(TimerId::new_v4(), "t".into(), "p".into());
        let id = existing.id;
        let mut dashboard = dashboard(&clock, vec![existing]);

        dashboard.open_edit_form(id);
        assert!(dashboard.delete(id));

        assert!(!dashboard.is_open(FormTarget::Edit(id)));
        assert!(dashboard.snapshot().is_empty());
    }

    #[test]
    fn rows_render_running_time() {
        let clock = ManualClock::at_millis(0);
        let running = Timer::new(TimerId::new_v4(), "Practice squat".into(), "Gym".into())
            .with_elapsed(5456099);
        let stopped = Timer::new(TimerId::new_v4(), "Bake squash".into(), "Kitchen".into())
            .with_elapsed(1273998);
        let running_id = running.id;
        let mut dashboard = dashboard(&clock, vec![running, stopped]);
        dashboard.start(running_id);
        dashboard.open_edit_form(running_id);

        clock.set_millis(4000);
        let rows = dashboard.rows(dashboard.store().now());

        assert_eq!(rows[0].elapsed, "01:31:00");
        assert!(rows[0].running);
        assert!(rows[0].form.is_some());
        assert_eq!(rows[1].elapsed, "00:21:13");
        assert!(!rows[1].running);
        assert!(rows[1].form.is_none());
    }
}
