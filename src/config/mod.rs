//! Configuration loaded from `.securedata.toml`.

pub mod settings;

pub use settings::Settings;
