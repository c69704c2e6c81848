use anyhow::Result;
use std::path::Path;

use rolas_core::model::TrackView;
use rolas_core::Database;
use rolas_search::{search, SearchOutcome};

pub fn run_search(db_path: &Path, expression: &str, json: bool) -> Result<()> {
    let db = Database::open(db_path)?;

    match search(&db, expression)? {
        SearchOutcome::Found(tracks) => print_tracks(&tracks, json),
        SearchOutcome::NoMatches if json => {
            println!("[]");
            Ok(())
        }
        SearchOutcome::NoMatches => {
            println!("No tracks match {expression:?}");
            Ok(())
        }
    }
}

pub fn run_list(db_path: &Path, json: bool) -> Result<()> {
    let db = Database::open(db_path)?;
    let tracks = db.list_all_tracks()?;

    if tracks.is_empty() && !json {
        println!("The catalog is empty. Run `rolas mine` to add tracks.");
        return Ok(());
    }

    print_tracks(&tracks, json)
}

fn print_tracks(tracks: &[TrackView], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tracks)?);
        return Ok(());
    }

    for track in tracks {
        println!(
            "{} | {} | {} | {} | {} | {}",
            track.title, track.performer, track.album, track.year, track.genre, track.track_number
        );
    }
    println!("\n{} track(s)", tracks.len());

    Ok(())
}
