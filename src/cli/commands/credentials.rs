//! `credseal credentials` — build an encrypted login/register request body.

use crate::cli::{load_settings, output, read_secret, runtime, Cli};
use crate::encryptor::Encryptor;
use crate::errors::{CredSealError, Result};

/// Execute the `credentials` command.
pub fn execute(cli: &Cli, username: &str, password: Option<&str>) -> Result<()> {
    let settings = load_settings(cli)?;
    let password = read_secret(password, &format!("Password for {username}"))?;

    let encryptor = Encryptor::from_settings(&settings)?;
    let sealed = runtime()?
        .block_on(encryptor.encrypt_credentials(username.trim(), password.trim()))?;

    let body = serde_json::to_string_pretty(&sealed)
        .map_err(|e| CredSealError::SerializationError(e.to_string()))?;
    output::result(&body);
    Ok(())
}
