use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::debug;

use crate::timers::entities::{Timer, TimerId};

use super::{RunningState, TimerPersistence};

pub const TIMERS_FILE_NAME: &str = "timers.json";

/// The main realization of [TimerPersistence]. The whole collection lives in one JSON array and
/// every write is a read-modify-write under an exclusive file lock, so two processes sharing the
/// directory don't interleave.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join(TIMERS_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn modify(&self, change: impl FnOnce(&mut Vec<Timer>) -> bool + Send) -> Result<()> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::modify_with_file(&mut file, change).await;
        file.unlock_async().await?;
        result
    }

    async fn modify_with_file(
        file: &mut File,
        change: impl FnOnce(&mut Vec<Timer>) -> bool,
    ) -> Result<()> {
        let mut content = String::new();
        file.read_to_string(&mut content).await?;
        let mut timers = parse_timers(&content)?;

        if !change(&mut timers) {
            debug!("Nothing to write");
            return Ok(());
        }

        let buffer = serde_json::to_vec_pretty(&timers)?;
        file.rewind().await?;
        file.set_len(0).await?;
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

fn parse_timers(content: &str) -> Result<Vec<Timer>> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }
    // A broken file is reported rather than overwritten, it may still hold recoverable data.
    serde_json::from_str(content).context("Timers file is not a valid JSON array of timers")
}

fn find(timers: &mut [Timer], id: TimerId) -> Option<&mut Timer> {
    timers.iter_mut().find(|timer| timer.id == id)
}

#[async_trait]
impl TimerPersistence for JsonFileStore {
    async fn list_all(&self) -> Result<Vec<Timer>> {
        async fn extract(path: &Path) -> Result<String, std::io::Error> {
            debug!("Reading {path:?}");
            let mut file = File::open(path).await?;
            file.lock_shared()?;
            let mut content = String::new();
            let read = file.read_to_string(&mut content).await;
            file.unlock_async().await?;
            read.map(|_| content)
        }

        match extract(&self.path).await {
            Ok(content) => parse_timers(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e)?,
        }
    }

    async fn create(&self, timer: Timer) -> Result<()> {
        self.modify(move |timers| {
            if timers.iter().any(|existing| existing.id == timer.id) {
                return false;
            }
            timers.push(timer);
            true
        })
        .await
    }

    async fn update(&self, id: TimerId, title: String, project: String) -> Result<()> {
        self.modify(move |timers| match find(timers, id) {
            Some(timer) => {
                timer.title = title;
                timer.project = project;
                true
            }
            None => false,
        })
        .await
    }

    async fn delete(&self, id: TimerId) -> Result<()> {
        self.modify(move |timers| {
            let before = timers.len();
            timers.retain(|timer| timer.id != id);
            timers.len() != before
        })
        .await
    }

    async fn set_running(&self, id: TimerId, state: RunningState) -> Result<()> {
        self.modify(move |timers| {
            let Some(timer) = find(timers, id) else {
                return false;
            };
            let updated = match state {
                RunningState::Running { since } => timer.clone().started_at(since),
                RunningState::Stopped { at } => timer.clone().stopped_at(at),
            };
            if updated == *timer {
                return false;
            }
            *timer = updated;
            true
        })
        .await
    }
}
