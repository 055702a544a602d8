pub mod output;
pub mod shutdown;
pub mod watch;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, level_filters::LevelFilter, warn};

use crate::{
    display::{visibility::FormTarget, Dashboard, SubmitOutcome},
    storage::{file_store::JsonFileStore, TimerPersistence},
    sync,
    timers::{entities::TimerId, store::TimerStore},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, LOG_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Timerboard", version, long_about = None)]
#[command(about = "Project-tagged timers you can start, stop and watch", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default uses $XDG_STATE_HOME/timerboard or $HOME/.local/state/timerboard"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable trace logging")]
    log: bool,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console", global = true)]
    log_console: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "List timers with their elapsed time")]
    List {},
    #[command(about = "Create a stopped timer")]
    Create { title: String, project: String },
    #[command(about = "Change title and project of a timer")]
    Edit {
        id: TimerId,
        title: String,
        project: String,
    },
    #[command(about = "Delete a timer")]
    Delete { id: TimerId },
    #[command(about = "Start a stopped timer")]
    Start { id: TimerId },
    #[command(about = "Stop a running timer")]
    Stop { id: TimerId },
    #[command(about = "Show running timers live until Ctrl-C")]
    Watch {
        #[arg(
            long = "interval-ms",
            default_value_t = 50,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Refresh interval in milliseconds"
        )]
        interval_ms: u64,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(LOG_PREFIX, &dir, logging_level, args.log_console)?;

    let persistence = Arc::new(JsonFileStore::new(dir)?);
    let timers = persistence.list_all().await?;
    info!("Loaded {} timers from {:?}", timers.len(), persistence.path());

    let (adapter, worker) = sync::channel(persistence.clone());
    let store = TimerStore::from_timers(timers, Arc::new(DefaultClock)).with_sync(adapter);
    let worker = tokio::spawn(worker.run());

    let mut dashboard = Dashboard::new(store);
    let result = process_command(args.commands, &mut dashboard).await;

    // Dropping the store closes the sync channel, the worker finishes what is queued and exits.
    drop(dashboard);
    let report = worker.await?;
    if report.failed > 0 {
        warn!("{} changes were not saved", report.failed);
        eprintln!("{} changes could not be saved, see logs", report.failed);
    }

    result
}

async fn process_command(command: Commands, dashboard: &mut Dashboard) -> Result<()> {
    match command {
        Commands::List {} => {
            output::print_rows(&dashboard.rows(dashboard.store().now()));
            Ok(())
        }
        Commands::Create { title, project } => {
            dashboard.open_create_form();
            dashboard.update_form(FormTarget::Create, title, project);
            if let SubmitOutcome::Created(timer) = dashboard.submit(FormTarget::Create) {
                println!("{}", timer.id);
            }
            Ok(())
        }
        Commands::Edit { id, title, project } => {
            if !dashboard.open_edit_form(id) {
                output::print_missing(id);
                return Ok(());
            }
            dashboard.update_form(FormTarget::Edit(id), title, project);
            match dashboard.submit(FormTarget::Edit(id)) {
                SubmitOutcome::Edited(_) => {}
                _ => output::print_missing(id),
            }
            Ok(())
        }
        Commands::Delete { id } => {
            report_applied(id, dashboard.delete(id), "not found");
            Ok(())
        }
        Commands::Start { id } => {
            report_applied(id, dashboard.start(id), "not found or already running");
            Ok(())
        }
        Commands::Stop { id } => {
            report_applied(id, dashboard.stop(id), "not found or already stopped");
            Ok(())
        }
        Commands::Watch { interval_ms } => {
            watch::watch(dashboard, Duration::from_millis(interval_ms)).await
        }
    }
}

fn report_applied(id: TimerId, applied: bool, reason: &str) {
    if !applied {
        println!("Nothing to do for {id}: {reason}");
    }
}
