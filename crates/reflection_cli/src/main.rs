//! Sequential demo over the reflection store.
//!
//! # Responsibility
//! - Initialize logging and the store from the environment.
//! - Run add/get/list/update/get/delete once and print plain-text results.
//!
//! # Environment
//! - `REFLECTION_DB_URL`, `REFLECTION_DB_NAME`, `REFLECTION_DNS_SERVERS`: see
//!   `reflection_core::config`.
//! - `REFLECTION_LOG_DIR` (optional absolute path) and `REFLECTION_LOG_LEVEL`.

use log::error;
use reflection_core::{
    core_version, default_log_level, init_logging, Reflection, ReflectionStore, ReflectionUpdate,
    StoreConfig, StoreResult,
};
use std::process::ExitCode;

const ENV_LOG_DIR: &str = "REFLECTION_LOG_DIR";
const ENV_LOG_LEVEL: &str = "REFLECTION_LOG_LEVEL";
const DEMO_DATE: &str = "2026-01-30";

#[tokio::main]
async fn main() -> ExitCode {
    println!("reflection_core version={}", core_version());

    if let Ok(log_dir) = std::env::var(ENV_LOG_DIR) {
        let level =
            std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = ReflectionStore::new(config);
    if let Err(err) = store.initialize().await {
        eprintln!("store initialization failed: {err}");
        return ExitCode::FAILURE;
    }

    let demo_result = run_demo(&store).await;
    if let Err(err) = store.close().await {
        error!("event=cli_shutdown module=cli status=error error={}", err);
    }

    match demo_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("\nFAILED: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_demo(store: &ReflectionStore) -> StoreResult<()> {
    println!("ADD REFLECTION");
    let added = store
        .create(Reflection::new("Sunny day", 3, DEMO_DATE, 50))
        .await?;
    println!("Added reflection for date: {}", added.date);

    println!("\nGET SINGLE REFLECTION");
    let found = store.read_one(DEMO_DATE).await?;
    println!("Reflection for {}: {}", found.date, found.reflection_text);

    println!("\nALL REFLECTIONS");
    for reflection in store.read_all().await? {
        println!(
            "{} (mood {}, {} min)",
            reflection.reflection_text, reflection.mood_score, reflection.time_spent_mins
        );
    }

    println!("\nUPDATE SINGLE REFLECTION");
    store
        .update(DEMO_DATE, ReflectionUpdate::new("Rainy now", 1, 30))
        .await?;
    let updated = store.read_one(DEMO_DATE).await?;
    println!(
        "Reflection on date {} has been changed to {}",
        updated.date, updated.reflection_text
    );

    println!("\nDELETE REFLECTION");
    store.delete(DEMO_DATE).await?;
    println!("Deleted reflection for date: {DEMO_DATE}");

    Ok(())
}
