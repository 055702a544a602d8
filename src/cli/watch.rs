use std::{io::Write, time::Duration};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::display::{refresh::RefreshTick, Dashboard};

use super::{output, shutdown::detect_shutdown};

/// Prints the list once, then keeps a single status line of running timers up to date until
/// Ctrl-C.
pub async fn watch(dashboard: &Dashboard, interval: Duration) -> Result<()> {
    output::print_rows(&dashboard.rows(dashboard.store().now()));

    let shutdown = CancellationToken::new();
    let subscription = dashboard.refresh_loop(interval).subscribe(|tick| {
        let mut stdout = std::io::stdout().lock();
        // Terminal might be gone, the next tick will try again.
        let _ = write!(stdout, "\r{}", status_line(&tick)).and_then(|_| stdout.flush());
    });
    info!("Watching timers every {interval:?}");

    detect_shutdown(shutdown).await;
    subscription.unsubscribe();
    println!();
    Ok(())
}

fn status_line(tick: &RefreshTick) -> String {
    tick.snapshot
        .iter()
        .filter(|timer| timer.is_running())
        .map(|timer| format!("{} {}", timer.title, timer.render_elapsed(tick.at)))
        .collect::<Vec<_>>()
        .join(" | ")
}
