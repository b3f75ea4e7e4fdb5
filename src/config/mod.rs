//! Configuration loaded from `.credseal.toml`.

pub mod settings;

pub use settings::Settings;
