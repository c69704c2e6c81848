use anyhow::{Context, Result};
use rolas_etl::{config, Config};

const SETTABLE_KEYS: &[&str] = &["database_path", "music_dir"];

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    println!(
        "File exists: {}\n",
        if config_path.exists() {
            "yes"
        } else {
            "no (using defaults)"
        }
    );

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  music_dir: {}", config.music_dir.display());
    println!("  extensions: {}", config.extensions.join(", "));
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (ROLAS_*) > Config file > Defaults");

    Ok(())
}

/// Set a path value in the config file, creating the file if needed.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    if !SETTABLE_KEYS.contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}\n\nValid keys: {}",
            key,
            SETTABLE_KEYS.join(", ")
        );
    }

    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = replace_key(&contents, key, value);

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Replace the active `key = ...` line, or append one when there is none.
/// Commented-out lines are left alone.
fn replace_key(contents: &str, key: &str, value: &str) -> String {
    let assignment = format!("{key} = {value:?}");
    let mut found = false;

    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let is_key = trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if is_key && !found {
                found = true;
                assignment.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !found {
        lines.push(String::new());
        lines.push(assignment);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure rolas.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_key_updates_active_line() {
        let contents = "# music_dir = \"/old\"\nmusic_dir = \"/old\"\nextensions = [\"mp3\"]\n";
        let updated = replace_key(contents, "music_dir", "/new");
        assert_eq!(
            updated,
            "# music_dir = \"/old\"\nmusic_dir = \"/new\"\nextensions = [\"mp3\"]\n"
        );
    }

    #[test]
    fn test_replace_key_appends_when_missing() {
        let updated = replace_key("#database_path = \"/x\"\n", "database_path", "/data/rolas.db");
        assert!(updated.starts_with("#database_path = \"/x\"\n"));
        assert!(updated.ends_with("database_path = \"/data/rolas.db\"\n"));
    }

    #[test]
    fn test_replace_key_ignores_longer_keys() {
        let updated = replace_key("music_dir_backup = \"/b\"\n", "music_dir", "/m");
        assert!(updated.contains("music_dir_backup = \"/b\""));
        assert!(updated.ends_with("music_dir = \"/m\"\n"));
    }
}
