pub mod cli;
pub mod config;
pub mod crypto;
pub mod encryptor;
pub mod errors;
pub mod handshake;
pub mod transport;
