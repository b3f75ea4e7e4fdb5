//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CredSealError, Result};

/// CredSeal CLI: seal credentials with a Diffie–Hellman session key.
#[derive(Parser)]
#[command(
    name = "credseal",
    about = "Encrypt credentials for transmission using a Diffie-Hellman session key",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides .credseal.toml)
    #[arg(short, long, env = "CREDSEAL_SERVER", global = true)]
    pub server: Option<String>,

    /// Directory containing .credseal.toml (default: current directory)
    #[arg(long, default_value = ".", global = true)]
    pub config_dir: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt a value (handshakes with the server first)
    Encrypt {
        /// Value to encrypt (omit for stdin or interactive prompt)
        text: Option<String>,
    },

    /// Encrypt a username/password pair into a login request body
    Credentials {
        /// Username to encrypt
        #[arg(short, long)]
        username: String,
        /// Password (omit for stdin or interactive prompt)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Run one key exchange and print the session key
    Handshake,

    /// Decrypt a salted blob with a known session key (offline)
    Decrypt {
        /// Session key as 64 hex characters
        #[arg(long)]
        session_key: String,
        /// Base64 blob produced by `encrypt`
        blob: String,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config-dir`, then apply `--server`.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(&PathBuf::from(&cli.config_dir))?;
    if let Some(server) = &cli.server {
        settings.server_url = server.clone();
    }
    Ok(settings)
}

/// Build the single-threaded runtime the network commands run on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CredSealError::from)
}

/// Read a secret value from one of three sources: the inline argument,
/// piped stdin, or an interactive hidden prompt.
///
/// Returns `Zeroizing<String>` so the value is wiped from memory on drop.
pub fn read_secret(inline: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end().to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| CredSealError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}
