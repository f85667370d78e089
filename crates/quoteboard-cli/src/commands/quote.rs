//! Quote command handlers

use anyhow::{bail, Context, Result};
use tracing::debug;

use quoteboard_core::{CategoryFilter, Config, HttpRemoteSource, QuoteStore, RemoteSource};

use crate::output::Output;

/// Show a random quote from a category
///
/// Without a category, the last used one is picked, then the first known one.
pub fn random(store: &mut QuoteStore, category: Option<String>, output: &Output) -> Result<()> {
    let category = category
        .or_else(|| store.last_category())
        .or_else(|| store.categories().into_iter().next());

    let Some(category) = category else {
        output.message("No quotes yet. Add one with `quoteboard add <text> <category>`.");
        return Ok(());
    };

    debug!("Picking a random quote from '{}'", category);
    match store.random_quote(&category) {
        Some(quote) => output.print_quote(&quote),
        None => output.message("No quotes found in this category."),
    }

    Ok(())
}

/// Add a new quote, optionally sending it to the remote endpoint
pub async fn add(
    store: &mut QuoteStore,
    config: &Config,
    text: String,
    category: String,
    push: bool,
    output: &Output,
) -> Result<()> {
    let quote = store.add_quote(&text, &category)?;
    output.success("Quote added successfully!");

    if push {
        let remote =
            HttpRemoteSource::from_config(config).context("Failed to create HTTP client")?;
        match remote.post_quote(&quote).await {
            Some(response) => {
                output.message("Quote sent to remote.");
                output.json(&response);
            }
            None => output.message("Could not send quote to remote (see log)."),
        }
    }

    Ok(())
}

/// List quotes, optionally filtered by category
///
/// A given category becomes the saved filter; without one the saved filter
/// is applied.
pub fn list(store: &mut QuoteStore, category: Option<String>, output: &Output) -> Result<()> {
    let filter = match category {
        Some(ref c) => {
            let filter = CategoryFilter::parse(c);
            store
                .set_last_filter(&filter)
                .context("Failed to save filter")?;
            filter
        }
        None => store.last_filter(),
    };

    if let CategoryFilter::Category(ref c) = filter {
        if !output.is_json() && !output.is_quiet() {
            println!("Category: {}\n", c);
        }
    }

    output.print_quotes(&store.filtered(&filter));
    Ok(())
}

/// List categories
pub fn categories(store: &QuoteStore, output: &Output) -> Result<()> {
    output.print_categories(&store.categories());
    Ok(())
}

/// Send an existing quote to the remote endpoint
pub async fn push(store: &QuoteStore, config: &Config, text: String, output: &Output) -> Result<()> {
    let Some(quote) = store.find(&text) else {
        bail!("No quote matching '{}'", text);
    };

    let remote = HttpRemoteSource::from_config(config).context("Failed to create HTTP client")?;
    match remote.post_quote(quote).await {
        Some(response) => {
            output.success("Quote sent to remote");
            output.json(&response);
        }
        None => bail!("Remote did not accept the quote"),
    }

    Ok(())
}
