//! `securedata session` — interactive menu over one vault session.
//!
//! Unlike the one-shot commands, failed attempts and lockouts carry
//! across actions here, and the master password can lift a lockout.

use dialoguer::{Confirm, Select};

use crate::cli::output;
use crate::cli::{open_service, prompt_new_passkey, prompt_line, prompt_secret, read_data, Cli};
use crate::errors::{Result, SecureDataError};
use crate::vault::{GuardState, VaultService};

use super::retrieve::retrieve_interactive;
use super::store::{report_stored, save};

/// Menu entries, in display order.
const ACTIONS: [&str; 6] = ["Store data", "Retrieve data", "Login", "Stats", "Save", "Quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Store,
    Retrieve,
    Login,
    Stats,
    Save,
    Quit,
}

impl Action {
    fn from_index(i: usize) -> Self {
        match i {
            0 => Self::Store,
            1 => Self::Retrieve,
            2 => Self::Login,
            3 => Self::Stats,
            4 => Self::Save,
            _ => Self::Quit,
        }
    }

    /// Whether the action is blocked while the session is locked.
    fn needs_open_guard(self) -> bool {
        matches!(self, Self::Store | Self::Retrieve)
    }
}

/// Execute the `session` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut service = open_service(cli)?;
    output::info(&format!(
        "Session started — {} record(s) loaded.",
        service.records().len()
    ));

    loop {
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(&ACTIONS)
            .default(0)
            .interact()
            .map_err(|e| SecureDataError::CommandFailed(format!("menu: {e}")))?;
        let action = Action::from_index(choice);

        if action.needs_open_guard() {
            let status = service.lockout_status();
            if status.state == GuardState::Locked {
                output::warning(&format!(
                    "Locked due to too many failed attempts. Wait {}s or choose Login.",
                    status.retry_after_secs.unwrap_or(0)
                ));
                continue;
            }
        }

        let outcome = match action {
            Action::Store => store(&mut service),
            Action::Retrieve => retrieve(&mut service),
            Action::Login => login(&mut service),
            Action::Stats => {
                output::print_stats(&service.stats());
                output::print_records_table(&service.records());
                Ok(())
            }
            Action::Save => {
                save(&mut service);
                Ok(())
            }
            Action::Quit => return Ok(()),
        };

        // Errors end the action, not the session.
        if let Err(e) = outcome {
            output::error(&e.to_string());
        }
    }
}

fn store(service: &mut VaultService) -> Result<()> {
    let data = read_data("Enter data to encrypt")?;
    let (passkey, confirm) = prompt_new_passkey()?;
    let id = service.store(&data, &passkey, &confirm)?;
    report_stored(service, &id);

    let persist = Confirm::new()
        .with_prompt("Save to file?")
        .default(false)
        .interact()
        .map_err(|e| SecureDataError::CommandFailed(format!("confirm prompt: {e}")))?;
    if persist {
        save(service);
    }
    Ok(())
}

fn retrieve(service: &mut VaultService) -> Result<()> {
    let record = prompt_line("Record id or ciphertext")?;
    let plaintext = retrieve_interactive(service, &record)?;
    output::success("Data decrypted.");
    println!("{plaintext}");
    Ok(())
}

fn login(service: &mut VaultService) -> Result<()> {
    if !service.can_reauthorize() {
        output::warning("No master password is configured for this vault.");
        output::tip("Set `master_password` in .securedata.toml or SECUREDATA_MASTER_PASSWORD.");
        return Ok(());
    }

    let password = prompt_secret("Enter master password")?;
    match service.reauthorize(&password) {
        Ok(()) => {
            output::success("Reauthorized successfully.");
            Ok(())
        }
        Err(SecureDataError::AuthFailure { .. }) => {
            output::error("Incorrect master password!");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
