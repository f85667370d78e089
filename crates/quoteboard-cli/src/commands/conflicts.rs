//! Conflict review handlers
//!
//! Conflicts are numbered from 1 as printed by `conflicts list`.

use anyhow::{bail, Result};

use quoteboard_core::{HttpRemoteSource, SyncController};

use crate::output::Output;

type Controller = SyncController<HttpRemoteSource>;

/// List pending conflicts
pub async fn list(controller: &Controller, output: &Output) -> Result<()> {
    output.print_conflicts(&controller.pending_conflicts().await);
    Ok(())
}

/// Restore the local category
pub async fn keep_local(controller: &Controller, number: usize, output: &Output) -> Result<()> {
    let conflict = controller.keep_local(to_index(number)?).await?;
    output.success(&format!(
        "Kept local category '{}' for \"{}\"",
        conflict.local.category, conflict.local.text
    ));
    Ok(())
}

/// Keep the server category
pub async fn accept_server(controller: &Controller, number: usize, output: &Output) -> Result<()> {
    let conflict = controller.accept_server(to_index(number)?).await?;
    output.success(&format!(
        "Accepted server category '{}' for \"{}\"",
        conflict.server.category, conflict.server.text
    ));
    Ok(())
}

/// Keep the server category everywhere
pub async fn accept_all(controller: &Controller, output: &Output) -> Result<()> {
    let count = controller.accept_all_server().await?;
    output.success(&format!("Accepted server category for {} conflict(s)", count));
    Ok(())
}

fn to_index(number: usize) -> Result<usize> {
    if number == 0 {
        bail!("Conflict numbers start at 1");
    }
    Ok(number - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert_eq!(to_index(3).unwrap(), 2);
        assert!(to_index(0).is_err());
    }
}
