//! `securedata stats` — record count, cipher status and record list.

use crate::cli::output;
use crate::cli::{open_service, Cli};
use crate::errors::Result;

/// Execute the `stats` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut service = open_service(cli)?;

    output::print_stats(&service.stats());
    if let Some(path) = service.data_file() {
        output::info(&format!("Data file: {}", path.display()));
    }
    output::print_records_table(&service.records());

    Ok(())
}
