//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::crypto::CipherKind;
use crate::vault::{GuardState, RecordMetadata, VaultStats};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Warn that the obfuscation-only fallback is in use.
pub fn cipher_notice(kind: CipherKind) {
    if kind.is_cryptographic() {
        return;
    }
    warning(&format!(
        "Using the {}. Records are not securely encrypted and a wrong passkey cannot be detected.",
        kind.describe()
    ));
    tip("Build with the default `aead` feature for AES-256-GCM encryption.");
}

/// Print the stats summary lines.
pub fn print_stats(stats: &VaultStats) {
    info(&format!("Stored records: {}", stats.stored_count));
    info(&format!("Cipher: {}", stats.cipher.describe()));

    let lock = &stats.lockout;
    match (lock.state, lock.retry_after_secs) {
        (GuardState::Locked, Some(secs)) => {
            warning(&format!("Locked after too many failed attempts ({secs}s left)"));
        }
        _ if lock.failed_count > 0 => {
            warning(&format!(
                "Failed attempts: {}/{}",
                lock.failed_count,
                lock.failed_count + lock.remaining_attempts
            ));
        }
        _ => {}
    }
}

/// Print a table of record metadata (Id, Created).
pub fn print_records_table(records: &[RecordMetadata]) {
    if records.is_empty() {
        info("No records stored yet.");
        tip("Run `securedata store` to add your first record.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Created"]);

    for r in records {
        table.add_row(vec![
            r.id.clone(),
            r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}
