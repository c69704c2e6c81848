use anyhow::Result;
use std::path::Path;

use rolas_core::Database;

pub fn show_status(db_path: &Path) -> Result<()> {
    let db = Database::open(db_path)?;
    let stats = db.stats()?;

    println!("\n📊 Rolas Status\n");
    println!("  Database:   {}", db_path.display());
    println!("  Performers: {}", stats.performers);
    println!("  Albums:     {}", stats.albums);
    println!("  Tracks:     {}", stats.tracks);

    if stats.tracks == 0 {
        println!("\n  Run `rolas mine` to catalog your music");
    }

    Ok(())
}
