//! # tea-cli — Command-Line Front End
//!
//! Provides the `tea` binary:
//!
//! ```bash
//! tea validate --policy politica.yaml --request pedido.json --pretty
//! cat pedidos.json | tea validate --policy politica.json
//! tea check-policy politica.yaml
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | every request compliant / policy valid |
//! | 1 | at least one request non-compliant |
//! | 2 | operational error (unreadable or invalid policy, malformed request, or any rejected item in a batch) |

pub mod check_policy;
pub mod validate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a whole input source. `None` or `-` means standard input.
pub fn read_input(path: Option<&Path>, stdin: &mut dyn Read) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("failed to read standard input")?;
            Ok(buf)
        }
    }
}
