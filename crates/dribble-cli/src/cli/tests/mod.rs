//! Argument parsing tests for the dribble CLI.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    Cli::try_parse_from(args).unwrap().command
}
