use ansi_term::{Colour::Green, Style};

use crate::{display::TimerRow, timers::entities::TimerId};

pub fn print_rows(rows: &[TimerRow]) {
    if rows.is_empty() {
        println!("No timers yet");
        return;
    }
    for row in rows {
        println!("{}", format_row(row));
    }
}

/// `id elapsed title project`, tab separated. Running timers get a highlighted elapsed time.
pub fn format_row(row: &TimerRow) -> String {
    let elapsed = if row.running {
        Green.bold().paint(row.elapsed.as_str())
    } else {
        Style::new().paint(row.elapsed.as_str())
    };
    format!("{}\t{}\t{}\t{}", row.id, elapsed, row.title, row.project)
}

pub fn print_missing(id: TimerId) {
    println!("No timer with id {id}");
}
