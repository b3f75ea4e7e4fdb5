//! `credseal decrypt` — open a salted blob with a known session key.

use crate::cli::output;
use crate::crypto::{self, SessionKey};
use crate::errors::Result;

/// Execute the `decrypt` command.
pub fn execute(session_key_hex: &str, blob: &str) -> Result<()> {
    let session_key = SessionKey::from_hex(session_key_hex.trim())?;
    let plaintext = crypto::decrypt(&session_key, blob)?;
    output::result(&plaintext);
    Ok(())
}
