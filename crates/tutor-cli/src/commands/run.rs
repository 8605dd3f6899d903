//! The `tutor run` command.

use std::path::PathBuf;

use anyhow::Result;

use tutor_core::terminal::MockTerminal;
use tutor_core::traits::PlaybookRunner;

pub fn execute(path: Option<PathBuf>) -> Result<()> {
    let playbook = match &path {
        Some(_) => super::read_submission(path.as_ref())?,
        None => String::new(),
    };

    let output = MockTerminal::new().run(&playbook)?;
    println!("{}", output.output);

    Ok(())
}
