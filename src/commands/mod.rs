//! CLI subcommand handlers.

use crate::driver::{select_batch, Batch, Driver, DriverSettings, RunOutcome};
use anyhow::bail;
use quizcast_channels::{DryRunChannel, TelegramChannel};
use quizcast_core::{
    config::Config,
    question::{load_bank, BankReport},
    traits::{Delivery, ProgressStore},
};
use quizcast_memory::{open_store, MemoryCursor};
use std::sync::Arc;
use tracing::{info, warn};


/// Deliver the next batch.
pub async fn run(cfg: &Config, dry_run: bool) -> anyhow::Result<()> {
    let bank = load_bank(&cfg.quiz.bank_path)?;
    info!("loaded {} questions from {}", bank.len(), cfg.quiz.bank_path);

    let store = open_store(&cfg.cursor).await?;
    let (store, delivery): (Arc<dyn ProgressStore>, Arc<dyn Delivery>) = if dry_run {
        let cursor = store.load().await;
        info!("dry run from cursor {cursor}; nothing will be sent or saved");
        (Arc::new(MemoryCursor::new(cursor)), Arc::new(DryRunChannel))
    } else {
        if !cfg.telegram.has_token() {
            warn!("TELEGRAM_BOT_TOKEN is not set; every delivery will fail");
        }
        (
            Arc::from(store),
            Arc::new(TelegramChannel::new(cfg.telegram.clone())),
        )
    };

    let driver = Driver::new(bank, store, delivery, DriverSettings::from_config(cfg));
    let outcome = driver.run_once().await?;
    println!("{}", run_summary(&outcome, dry_run));
    Ok(())
}

/// One-line report of a run. A dry run never moves the real cursor.
fn run_summary(outcome: &RunOutcome, dry_run: bool) -> String {
    match *outcome {
        RunOutcome::Sent {
            start,
            end,
            delivered,
            failed,
            advanced,
        } => {
            let cursor = if dry_run {
                "cursor unchanged (dry run)".to_string()
            } else {
                format!("cursor {}", if advanced { end } else { start })
            };
            format!(
                "questions {}..{end}: {delivered} delivered, {failed} failed, {cursor}",
                start + 1
            )
        }
        RunOutcome::Exhausted { notified, failed } => {
            format!("bank exhausted: notice sent to {notified}, {failed} failed")
        }
    }
}

/// Print bank size, cursor, and delivery setup.
pub async fn status(cfg: &Config, config_path: &str) -> anyhow::Result<()> {
    let bank = load_bank(&cfg.quiz.bank_path)?;
    let store: Arc<dyn ProgressStore> = Arc::from(open_store(&cfg.cursor).await?);
    let backend = store.describe();
    let driver = offline_driver(cfg, bank, store);
    let progress = driver.progress().await;

    println!("quizcast — Status\n");
    println!("Config:       {config_path}");
    println!("Bank:         {} ({} questions)", cfg.quiz.bank_path, driver.bank().len());
    println!("Cursor:       {} [{backend}]", progress.cursor);
    println!("Remaining:    {}", progress.remaining());
    match select_batch(progress.total, progress.cursor, cfg.quiz.batch_size) {
        Batch::Exhausted => println!("Next run:     exhausted notice"),
        batch @ Batch::Range { start, end } => {
            println!("Next run:     {} questions ({}..{end})", batch.len(), start + 1)
        }
    }
    let destinations = cfg.telegram.destinations();
    println!(
        "Destinations: {}",
        if destinations.is_empty() {
            "none".to_string()
        } else {
            destinations.join(", ")
        }
    );
    println!(
        "Telegram:     {}",
        if cfg.telegram.has_token() {
            "configured"
        } else {
            "missing bot_token"
        }
    );
    Ok(())
}

/// Validate the bank structure.
pub fn check(cfg: &Config, strict: bool) -> anyhow::Result<()> {
    let bank = load_bank(&cfg.quiz.bank_path)?;
    let report = BankReport::from_bank(&bank);

    println!("{}: {} questions", cfg.quiz.bank_path, report.total);
    for &i in &report.unscored {
        println!("  #{:<4} no option matches the answer: {}", i + 1, bank[i].prompt);
    }

    if report.is_clean() {
        println!("all questions have a correct option");
    } else if strict {
        bail!(
            "{} question(s) have no correct option",
            report.unscored.len()
        );
    }
    Ok(())
}

/// Overwrite the cursor.
pub async fn reset(cfg: &Config, to: usize) -> anyhow::Result<()> {
    let bank = load_bank(&cfg.quiz.bank_path)?;
    let store: Arc<dyn ProgressStore> = Arc::from(open_store(&cfg.cursor).await?);
    let driver = offline_driver(cfg, bank, store);
    let next = driver.reset(to).await?;
    println!("cursor set to {next} of {}", driver.bank().len());
    Ok(())
}

/// A driver that never delivers, for inspecting or moving the cursor.
fn offline_driver(
    cfg: &Config,
    bank: Vec<quizcast_core::question::QuestionRecord>,
    store: Arc<dyn ProgressStore>,
) -> Driver {
    Driver::new(
        bank,
        store,
        Arc::new(DryRunChannel),
        DriverSettings::from_config(cfg),
    )
}
