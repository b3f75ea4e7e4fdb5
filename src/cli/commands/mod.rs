//! One module per subcommand.

pub mod completions;
pub mod credentials;
pub mod decrypt;
pub mod encrypt;
pub mod handshake;
pub mod version;
