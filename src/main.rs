use clap::Parser;
use credseal::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Library diagnostics go to stderr; RUST_LOG=debug shows handshake steps.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { ref text } => {
            credseal::cli::commands::encrypt::execute(&cli, text.as_deref())
        }
        Commands::Credentials {
            ref username,
            ref password,
        } => credseal::cli::commands::credentials::execute(&cli, username, password.as_deref()),
        Commands::Handshake => credseal::cli::commands::handshake::execute(&cli),
        Commands::Decrypt {
            ref session_key,
            ref blob,
        } => credseal::cli::commands::decrypt::execute(session_key, blob),
        Commands::Version => credseal::cli::commands::version::execute(),
        Commands::Completions { shell } => credseal::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        credseal::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
