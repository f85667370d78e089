//! Import/export command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use quoteboard_core::{Config, QuoteStore};

use crate::output::Output;

/// Export all quotes as a JSON array
pub fn export(
    store: &QuoteStore,
    config: &Config,
    path: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    match path {
        Some(ref p) if p.as_os_str() == "-" => {
            println!("{}", store.export_json()?);
        }
        _ => {
            let path = path.unwrap_or_else(|| config.export_path());
            store
                .export_to_file(&path)
                .context("Failed to export quotes")?;
            output.success(&format!(
                "Exported {} quote(s) to {}",
                store.len(),
                path.display()
            ));
        }
    }

    Ok(())
}

/// Append quotes from a JSON file
pub fn import(store: &mut QuoteStore, file: PathBuf, output: &Output) -> Result<()> {
    let count = store
        .import_from_file(&file)
        .context("Failed to import quotes")?;

    output.success(&format!("Quotes imported successfully! ({} added)", count));
    Ok(())
}
