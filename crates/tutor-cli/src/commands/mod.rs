pub mod assist;
pub mod check;
pub mod init;
pub mod list_models;
pub mod run;
pub mod validate;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Read a playbook from `path`, or from stdin when it is absent or "-".
pub(crate) fn read_submission(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_path() != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read playbook: {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read playbook from stdin")?;
            Ok(buf)
        }
    }
}
