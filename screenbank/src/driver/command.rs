/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! [`DriverAdapter`] backed by the `artistactrl` command-line program.
//!
//! | Operation | Invocation |
//! |---|---|
//! | `get_ids` | `artistactrl --get_ids` → YAML list on stdout, e.g. `["", "D3"]` |
//! | `set_id` | `artistactrl --set_id OLD NEW` |
//! | `render` | `artistactrl --show FILE ID` |
//! | `blank_all` | `artistactrl -r all` |
//!
//! Arguments are passed as separate argv entries, so identifiers and paths
//! containing spaces or quotes need no escaping.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{DriverAdapter, DriverError};

/// Default program name, looked up on `$PATH`.
pub const DEFAULT_PROGRAM: &str = "artistactrl";

/// Runs the control program once per operation and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandDriver {
    program: PathBuf,
}

impl CommandDriver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the program with `args` and return its stdout.
    fn run(&self, args: &[OsString]) -> Result<String, DriverError> {
        let rendered = render_args(args);
        debug!(program = %self.program.display(), args = %rendered, "driver call");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| DriverError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DriverError::Failed {
                args: rendered,
                code: output.status.code(),
                output: format!("{}{}", stdout, stderr).trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

impl Default for CommandDriver {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl DriverAdapter for CommandDriver {
    fn get_ids(&self) -> Result<Vec<String>, DriverError> {
        let args = [OsString::from("--get_ids")];
        let stdout = self.run(&args)?;
        parse_id_list(&stdout).map_err(|source| DriverError::UnparsableOutput {
            args: render_args(&args),
            source,
        })
    }

    fn set_id(&self, old_id: &str, new_id: &str) -> Result<(), DriverError> {
        let args = [
            OsString::from("--set_id"),
            OsString::from(old_id),
            OsString::from(new_id),
        ];
        self.run(&args).map(drop)
    }

    fn render(&self, path: &Path, screen_id: &str) -> Result<(), DriverError> {
        let args = [
            OsString::from("--show"),
            path.as_os_str().to_owned(),
            OsString::from(screen_id),
        ];
        self.run(&args).map(drop)
    }

    fn blank_all(&self) -> Result<(), DriverError> {
        self.run(&[OsString::from("-r"), OsString::from("all")])
            .map(drop)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Parse the `--get_ids` output.  `null` entries count as unlabeled screens.
fn parse_id_list(stdout: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let ids: Vec<Option<String>> = serde_yaml::from_str(stdout)?;
    Ok(ids.into_iter().map(Option::unwrap_or_default).collect())
}

fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| format!("{:?}", a.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flow_sequence_with_unlabeled_entry() {
        let ids = parse_id_list("[\"\", \"D3\"]\n").unwrap();
        assert_eq!(ids, ["", "D3"]);
    }

    #[test]
    fn null_entries_become_empty_ids() {
        let ids = parse_id_list("[~, \"A\"]").unwrap();
        assert_eq!(ids, ["", "A"]);
    }

    #[test]
    fn empty_list_parses() {
        assert!(parse_id_list("[]").unwrap().is_empty());
    }

    #[test]
    fn non_list_output_is_rejected() {
        assert!(parse_id_list("3 Artista devices found.").is_err());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let driver = CommandDriver::new("/nonexistent/artistactrl");
        let err = driver.get_ids().unwrap_err();
        assert!(matches!(err, DriverError::Spawn { .. }));
    }

    #[test]
    fn default_program_is_artistactrl() {
        assert_eq!(CommandDriver::default().program(), Path::new(DEFAULT_PROGRAM));
    }
}
