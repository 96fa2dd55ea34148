//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `roster_core` linkage.
//! - Optionally print the stats summary of an on-disk roster database.

use roster_core::db::open_db;
use roster_core::{RosterService, SqliteKeyValueRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("roster_core ping={}", roster_core::ping());
    println!("roster_core version={}", roster_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_stats(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("roster_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_stats(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let repo = SqliteKeyValueRepository::try_new(&conn)?;
    let mut service = RosterService::new(repo);
    service.load()?;

    let stats = service.stats();
    println!("entries={}", stats.total_entries);
    println!("average_rating={:.1}", stats.average_rating);
    println!("most_common_flag={}", stats.most_common_flag);
    println!(
        "best_entry={} ({:.1})",
        stats.best_entry.name, stats.best_entry.rating
    );
    for (month, count) in stats.months_newest_first() {
        println!("dates[{month}]={count}");
    }
    Ok(())
}
