use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

use rolas_etl::{mine_in_background, Config, Miner};

/// Mine `music_dir` into the configured store, printing progress.
pub async fn run_mine(config: &Config, music_dir: PathBuf) -> Result<()> {
    println!("\n🎵 Mining {}\n", music_dir.display());
    println!("  Database: {}", config.database_path.display());

    let (tx, mut rx) = mpsc::unbounded_channel::<f64>();
    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(fraction) = rx.recv().await {
            print!("\r  ⏳ {:>3.0}%", fraction * 100.0);
            stdout.flush().ok();
        }
    });

    let miner = Miner::new().with_extensions(&config.extensions);
    let result = mine_in_background(
        miner,
        music_dir,
        config.database_path.clone(),
        tx,
    )
    .await;

    // The sender was dropped with the worker; drain the remaining updates.
    printer.await.context("Progress printer failed")?;
    println!();

    let report = result.context("Mining failed")?;

    println!("\n✓ Mining complete");
    println!("  Files processed: {}", report.files_processed);
    println!("  Tracks added:    {}", report.tracks_added);
    println!("  Already known:   {}", report.already_present);
    if report.failed > 0 {
        println!("  Skipped (unreadable): {}", report.failed);
    }

    Ok(())
}
