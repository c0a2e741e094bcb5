/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! artista-sim stands in for `artistactrl` so Screenbank can be run
//! end-to-end without USB screens.
//!
//! State (connected screen ids and what each last showed) lives in a YAML file
//! so a running Screenbank and an operator poking at it share one view:
//!
//! ```text
//! ARTISTA_SIM_STATE=/tmp/sim.yaml artista-sim --plug        # connect an unlabeled screen
//! screenbank --driver ./artista-sim screens.yaml            # picks it up on the next tick
//! ARTISTA_SIM_STATE=/tmp/sim.yaml artista-sim --list
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "artista-sim", about = "File-backed artistactrl simulator")]
struct Cli {
    /// Print the YAML list of screen ids.
    #[arg(long = "get_ids")]
    get_ids: bool,

    /// Relabel screen OLD as NEW.
    #[arg(long = "set_id", num_args = 2, value_names = ["OLD", "NEW"])]
    set_id: Option<Vec<String>>,

    /// Show FILE on SCREEN.
    #[arg(long = "show", num_args = 2, value_names = ["FILE", "SCREEN"])]
    show: Option<Vec<String>>,

    /// Reset SCREEN ('all' resets every screen).
    #[arg(short = 'r', value_name = "SCREEN")]
    reset: Option<String>,

    /// Connect a new, unlabeled screen.
    #[arg(long = "plug")]
    plug: bool,

    /// Disconnect the screen with this id.
    #[arg(long = "unplug", value_name = "ID")]
    unplug: Option<String>,

    /// Print the whole simulator state.
    #[arg(long = "list")]
    list: bool,

    /// Simulator state file.
    #[arg(long = "state", env = "ARTISTA_SIM_STATE", default_value = "artista-sim.yaml")]
    state: PathBuf,
}

// ── State file ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
struct SimState {
    #[serde(default)]
    screens: Vec<SimScreen>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SimScreen {
    id: String,
    #[serde(default)]
    showing: Option<String>,
}

impl SimState {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read state file: {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))
    }

    fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_yaml::to_string(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Cannot write state file: {}", path.display()))
    }

    fn screen_mut(&mut self, id: &str) -> Result<&mut SimScreen> {
        match self.screens.iter_mut().find(|s| s.id == id) {
            Some(screen) => Ok(screen),
            None => bail!("ERROR: screen {} does not exist!", id),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut state = SimState::load(&cli.state)?;

    if cli.get_ids {
        let ids: Vec<&str> = state.screens.iter().map(|s| s.id.as_str()).collect();
        print!("{}", serde_yaml::to_string(&ids)?);
        return Ok(());
    }

    if cli.list {
        print!("{}", serde_yaml::to_string(&state)?);
        return Ok(());
    }

    if let Some(args) = cli.set_id {
        let (old_id, new_id) = (&args[0], &args[1]);
        state.screen_mut(old_id)?.id = new_id.clone();
        println!("Relabeled '{}' as '{}'", old_id, new_id);
    } else if let Some(args) = cli.show {
        let (file, id) = (&args[0], &args[1]);
        if !Path::new(file).exists() {
            bail!("ERROR: cannot open {}", file);
        }
        state.screen_mut(id)?.showing = Some(file.clone());
        println!("Send {} to '{}'", file, id);
    } else if let Some(target) = cli.reset {
        if target == "all" {
            state.screens.iter_mut().for_each(|s| s.showing = None);
        } else {
            state.screen_mut(&target)?.showing = None;
        }
    } else if cli.plug {
        state.screens.push(SimScreen {
            id: String::new(),
            showing: None,
        });
        println!("{} screen(s) connected", state.screens.len());
    } else if let Some(id) = cli.unplug {
        let before = state.screens.len();
        state.screens.retain(|s| s.id != id);
        if state.screens.len() == before {
            bail!("ERROR: screen {} does not exist!", id);
        }
    } else {
        bail!("no option given, see --help");
    }

    state.save(&cli.state)
}
