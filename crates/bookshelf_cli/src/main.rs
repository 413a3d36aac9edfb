//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `bookshelf_core` linkage with deterministic output.
//! - Optionally boot an on-disk inventory and print its default view.
//!
//! Usage: `bookshelf_cli [DB_PATH [SEED_JSON_FILE]]`

use bookshelf_core::{InventoryConfig, InventoryStore, OpenLibrarySeed, SqliteSlot, ViewQuery};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("bookshelf_core ping={}", bookshelf_core::ping());
    println!("bookshelf_core version={}", bookshelf_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };

    let config = InventoryConfig::from_env();
    let slot = match SqliteSlot::open(&db_path, config.storage_key.as_str()) {
        Ok(slot) => slot,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let seed = match args.next() {
        Some(seed_path) => match std::fs::read_to_string(&seed_path) {
            Ok(body) => OpenLibrarySeed::from_body(body),
            Err(err) => OpenLibrarySeed::unavailable(format!("cannot read `{seed_path}`: {err}")),
        },
        None => OpenLibrarySeed::unavailable("no seed file given"),
    };

    let mut store = InventoryStore::with_config(slot, &config);
    match store.start(&seed) {
        Ok(report) => println!(
            "inventory source={:?} count={} storage_corrupt={} storage_unreadable={}",
            report.source, report.record_count, report.storage_corrupt, report.storage_unreadable
        ),
        Err(err) => {
            eprintln!("inventory start failed: {err}");
            return ExitCode::FAILURE;
        }
    }
    if let Some(message) = store.error_message() {
        println!("inventory error={message}");
    }

    for book in store.view(&ViewQuery::default()) {
        let age = book
            .author_age
            .map_or_else(|| "N/A".to_string(), |age| age.to_string());
        println!(
            "{}\t{}\t{} (age {})\t{}\t{}",
            book.id, book.title, book.author, age, book.publisher, book.published_date
        );
    }
    ExitCode::SUCCESS
}
