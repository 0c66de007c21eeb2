//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::CipherPreference;
use crate::errors::{Result, SecureDataError};
use crate::vault::{RecordStore, VaultService};

/// Environment variable holding the passkey for non-interactive use.
pub const PASSKEY_ENV: &str = "SECUREDATA_PASSKEY";

/// SecureData CLI: passkey-protected text storage.
#[derive(Parser)]
#[command(
    name = "securedata",
    about = "Store text under a passkey and retrieve it later",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data file to load and save records (default from .securedata.toml)
    #[arg(long, global = true)]
    pub data_file: Option<String>,

    /// Use the substitution cipher even if AES-GCM is available
    #[arg(long, global = true)]
    pub fallback_cipher: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt and store a piece of text
    Store {
        /// Keep the record in memory only (it is lost when the command exits)
        #[arg(long)]
        no_save: bool,
    },

    /// Decrypt a stored record
    ///
    /// Each invocation is its own session, so failed attempts do not
    /// carry over between runs. Use `securedata session` for lockout
    /// that persists across attempts.
    Retrieve {
        /// Record id (or the full ciphertext)
        record: String,
    },

    /// Show how many records are stored and which cipher is in use
    Stats,

    /// Interactive session (store, retrieve, login) with shared lockout state
    Session,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the working directory and start a session over
/// the configured data file.
pub fn open_service(cli: &Cli) -> Result<VaultService> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if cli.fallback_cipher {
        settings.cipher = CipherPreference::Substitution;
    }

    let path = match &cli.data_file {
        Some(p) => cwd.join(p),
        None => settings.data_path(&cwd),
    };
    let store = RecordStore::load(&path);
    let service = VaultService::new(&settings.vault_config(), store)?;

    if !service.cipher_kind().is_cryptographic() {
        output::cipher_notice(service.cipher_kind());
    }

    Ok(service)
}

/// The passkey from `SECUREDATA_PASSKEY`, if set and non-empty.
pub fn passkey_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSKEY_ENV) {
        Ok(pk) if !pk.is_empty() => Some(Zeroizing::new(pk)),
        _ => None,
    }
}

/// Prompt for a hidden value.
///
/// Empty input is allowed through so the vault reports it the same way
/// for every caller.
pub fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>> {
    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| SecureDataError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}

/// Get a new passkey and its confirmation.
///
/// `SECUREDATA_PASSKEY` supplies both for scripted usage.
pub fn prompt_new_passkey() -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    if let Some(pk) = passkey_from_env() {
        let confirm = pk.clone();
        return Ok((pk, confirm));
    }

    let passkey = prompt_secret("Create passkey")?;
    let confirm = prompt_secret("Confirm passkey")?;
    Ok((passkey, confirm))
}

/// Read the text to store: piped stdin, or an interactive prompt.
pub fn read_data(prompt: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(strip_line_ending(&buf).to_string());
    }

    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SecureDataError::CommandFailed(format!("input prompt: {e}")))
}

/// Drop the one line terminator a pipe or heredoc appends.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}

/// Read a single line of visible input.
pub fn prompt_line(prompt: &str) -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| SecureDataError::CommandFailed(format!("input prompt: {e}")))
}
