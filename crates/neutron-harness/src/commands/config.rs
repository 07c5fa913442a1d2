//! Config command

use anyhow::Result;
use camino::Utf8Path;

use super::load_config;
use crate::cli::{ConfigCommands, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config),
    }
}

fn show(args: ConfigShowArgs, config: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config)?;

    if args.json {
        output::json(&config)?;
    } else {
        print!("{}", serde_yaml_ng::to_string(&config)?);
    }
    Ok(())
}
