//! `securedata store` — encrypt a piece of text under a new passkey.

use crate::cli::output;
use crate::cli::{open_service, prompt_new_passkey, read_data, Cli};
use crate::errors::Result;
use crate::vault::VaultService;

/// Execute the `store` command.
pub fn execute(cli: &Cli, no_save: bool) -> Result<()> {
    let mut service = open_service(cli)?;

    let data = read_data("Enter data to encrypt")?;
    let (passkey, confirm) = prompt_new_passkey()?;

    let id = service.store(&data, &passkey, &confirm)?;
    report_stored(&service, &id);

    if no_save {
        output::tip("Record kept in memory only (--no-save).");
    } else {
        // Nothing outlives this process except the file, so a failed
        // write is an error here rather than a warning.
        service.persist()?;
        report_saved(&service);
    }

    Ok(())
}

/// Show the new record's id and ciphertext.
pub(crate) fn report_stored(service: &VaultService, id: &str) {
    output::success("Data encrypted and stored.");
    output::info(&format!("Record id: {id}"));
    if let Some(record) = service.record(id) {
        output::info(&format!("Ciphertext: {}", record.ciphertext));
    }
    output::tip(&format!("Retrieve it with: securedata retrieve {id}"));
}

/// Persist records; failure is reported but not fatal.
pub(crate) fn save(service: &mut VaultService) {
    match service.persist() {
        Ok(()) => report_saved(service),
        Err(e) => {
            output::warning(&e.to_string());
            output::tip("Records are still held in memory for this session.");
        }
    }
}

fn report_saved(service: &VaultService) {
    if let Some(path) = service.data_file() {
        output::info(&format!(
            "Saved {} record(s) to {}",
            service.records().len(),
            path.display()
        ));
    }
}
