use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::init::InitOptions;

#[derive(Debug, Parser)]
#[command(name = "lintplug")]
#[command(version, about = "Provision rule set plugins for lintplug projects")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (overridden by LINTPLUG_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the plugins declared in the config file
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Run in every directory below the current one that has a config file
    #[arg(long)]
    pub recursive: bool,

    /// Switch to a different working directory before running
    #[arg(long, value_name = "DIR", conflicts_with = "recursive")]
    pub chdir: Option<PathBuf>,

    /// Config file to load, relative to each working directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl InitArgs {
    pub fn options(&self) -> InitOptions {
        InitOptions {
            recursive: self.recursive,
            chdir: self.chdir.clone(),
            config: self.config.clone(),
        }
    }
}
