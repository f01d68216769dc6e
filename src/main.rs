//! vox: a minimal distributed version control system.
//!
//! The crate is split into the content-addressed core (C1-C6 of the
//! design: [`hash`], [`store`], [`index`], [`objects`], [`dag`], [`merge`],
//! [`workdir`]) and the ambient layer that turns the core into a runnable
//! tool ([`repo::Repository`], [`refs`], [`config`]). [`cli`]/[`commands`]
//! wire a `clap` CLI on top of it, all in a single binary.

mod cli;
mod commands;
mod config;
mod dag;
mod error;
mod hash;
mod index;
mod merge;
mod objects;
mod refs;
mod repo;
mod store;
mod workdir;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Init => std::env::current_dir()
            .context("failed to read current working directory")
            .and_then(|dir| commands::init_command(&dir)),
        Commands::Add { paths } => commands::add_command(&paths),
        Commands::Commit { message } => commands::commit_command(&message),
        Commands::Log { count } => commands::log_command(count),
        Commands::Branch { name, delete } => commands::branch_command(name, delete),
        Commands::Checkout { target } => commands::checkout_command(&target),
        Commands::Merge { branch } => commands::merge_command(&branch),
        Commands::Config(sub) => commands::config_command(sub),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
