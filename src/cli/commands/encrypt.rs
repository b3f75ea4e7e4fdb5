//! `credseal encrypt` — seal a single value for transmission.

use crate::cli::{load_settings, output, read_secret, runtime, Cli};
use crate::encryptor::Encryptor;
use crate::errors::Result;

/// Execute the `encrypt` command.
pub fn execute(cli: &Cli, text: Option<&str>) -> Result<()> {
    let settings = load_settings(cli)?;
    let plaintext = read_secret(text, "Value to encrypt")?;

    let encryptor = Encryptor::from_settings(&settings)?;
    let sealed = runtime()?.block_on(encryptor.encrypt(&plaintext))?;

    output::result(&sealed);
    Ok(())
}
