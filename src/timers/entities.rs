use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::time::{millis_between, render_elapsed_string};

/// Identifier of a [Timer]. Generated on creation and never supplied by the user, so it is the
/// only thing the store, the display and the persistence side agree on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(Uuid);

impl TimerId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TimerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A named, project-tagged timer. `elapsed` only holds finished runs; the run in progress is
/// described by `running_since`.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: TimerId,
    pub title: String,
    pub project: String,
    /// Milliseconds accumulated by finished runs.
    #[serde(default)]
    pub elapsed: u64,
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    pub running_since: Option<DateTime<Utc>>,
}

impl Timer {
    /// A stopped timer with nothing accumulated yet.
    pub fn new(id: TimerId, title: String, project: String) -> Self {
        Self {
            id,
            title,
            project,
            elapsed: 0,
            running_since: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Total time including the current run, as it would be displayed at `now`.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        match self.running_since {
            Some(since) => self.elapsed + millis_between(since, now),
            None => self.elapsed,
        }
    }

    pub fn render_elapsed(&self, now: DateTime<Utc>) -> String {
        render_elapsed_string(self.elapsed_at(now))
    }

    pub fn with_details(self, title: String, project: String) -> Self {
        Self {
            title,
            project,
            ..self
        }
    }

    pub fn with_elapsed(self, elapsed: u64) -> Self {
        Self { elapsed, ..self }
    }

    pub fn with_running_since(self, running_since: Option<DateTime<Utc>>) -> Self {
        Self {
            running_since,
            ..self
        }
    }

    /// Returns the running version of this timer. A timer that is already running keeps its
    /// original start, otherwise progress of the current run would be lost.
    pub fn started_at(self, now: DateTime<Utc>) -> Self {
        if self.is_running() {
            self
        } else {
            self.with_running_since(Some(now))
        }
    }

    /// Folds the current run into `elapsed`. A stopped timer is returned unchanged.
    pub fn stopped_at(self, now: DateTime<Utc>) -> Self {
        match self.running_since {
            Some(since) => {
                let elapsed = self.elapsed + millis_between(since, now);
                self.with_elapsed(elapsed).with_running_since(None)
            }
            None => self,
        }
    }
}
