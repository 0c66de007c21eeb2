//! `securedata retrieve` — decrypt a stored record.

use crate::cli::output;
use crate::cli::{open_service, passkey_from_env, prompt_secret, Cli};
use crate::errors::{Result, SecureDataError};
use crate::vault::VaultService;

/// Execute the `retrieve` command.
///
/// With `SECUREDATA_PASSKEY` set there is exactly one attempt.
/// Interactively the passkey is asked for again after each wrong guess
/// until it matches or the session locks.
pub fn execute(cli: &Cli, record: &str) -> Result<()> {
    let mut service = open_service(cli)?;

    if let Some(passkey) = passkey_from_env() {
        let plaintext = service.retrieve(record, &passkey)?;
        println!("{plaintext}");
        return Ok(());
    }

    let plaintext = retrieve_interactive(&mut service, record)?;
    output::success("Data decrypted.");
    println!("{plaintext}");
    Ok(())
}

/// Prompt for the passkey until it is accepted or the guard locks.
pub(crate) fn retrieve_interactive(service: &mut VaultService, record: &str) -> Result<String> {
    loop {
        let passkey = prompt_secret("Enter passkey")?;
        match service.retrieve(record, &passkey) {
            Ok(plaintext) => return Ok(plaintext),
            Err(SecureDataError::AuthFailure { remaining_attempts }) if remaining_attempts > 0 => {
                output::error(&format!(
                    "Incorrect passkey! Attempts remaining: {remaining_attempts}"
                ));
            }
            Err(SecureDataError::AuthFailure { .. }) => {
                let retry_after_secs = service.lockout_status().retry_after_secs.unwrap_or(0);
                return Err(SecureDataError::LockedOut { retry_after_secs });
            }
            Err(e) if e.is_validation() => output::error(&e.to_string()),
            Err(e) => return Err(e),
        }
    }
}
