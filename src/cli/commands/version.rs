//! `credseal version` — display version.

use crate::cli::output;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    output::result(&format!("credseal {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}
