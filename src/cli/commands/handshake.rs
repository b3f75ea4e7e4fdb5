//! `credseal handshake` — run one key exchange and print the session key.

use crate::cli::{load_settings, output, runtime, Cli};
use crate::errors::Result;
use crate::handshake::HandshakeCoordinator;

/// Execute the `handshake` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let coordinator = HandshakeCoordinator::from_settings(&settings)?;

    let session_key = runtime()?.block_on(coordinator.obtain_session_key())?;

    output::success(&format!("Key exchange with {} complete", settings.server_url));
    output::warning("The session key below decrypts every value sealed in this session.");
    output::result(session_key.as_hex());
    Ok(())
}
