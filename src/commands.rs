//! A6 (handler half): one function per CLI subcommand, each a thin call into
//! [`crate::repo::Repository`] with formatting and exit-code-relevant errors
//! layered on top.

use crate::cli::ConfigCommand;
use crate::config::{Config, PersistentConfig};
use crate::error::VoxError;
use crate::repo::Repository;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Opens the repository containing the actual current working directory,
/// the way the teacher's `find_repository_root` seeds its walk-up with
/// `env::current_dir()` rather than the literal string `"."` (which never
/// ascends past itself).
fn open_repo() -> Result<Repository> {
    let cwd = std::env::current_dir().context("failed to read current working directory")?;
    Ok(Repository::open(cwd)?)
}

fn config_path(repo: &Repository) -> PathBuf {
    repo.meta_dir().join("config.toml")
}

/// Reads the committer identity off `<meta>/config.toml`. The core treats
/// identity as an opaque caller-supplied string and never reads this file
/// itself; this is the CLI's one concrete source for it.
fn identity(repo: &Repository) -> Result<String> {
    Ok(Config::read_from_file(&config_path(repo))?.identity())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb
}

pub fn init_command(workdir: &std::path::Path) -> Result<()> {
    Repository::init(workdir).context("failed to initialize repository")?;
    println!("{}", "Initialized empty vox repository".green());
    Ok(())
}

pub fn add_command(paths: &[String]) -> Result<()> {
    let mut repo = open_repo()?;
    let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
    repo.add(&paths)?;
    Ok(())
}

pub fn commit_command(message: &str) -> Result<()> {
    let mut repo = open_repo()?;
    let identity = identity(&repo)?;
    let digest = repo.commit(&identity, message)?;
    println!("[{}] {}", &digest[..7].bright_yellow(), message);
    Ok(())
}

pub fn log_command(count: Option<usize>) -> Result<()> {
    let repo = open_repo()?;
    let commits = repo.log(count)?;

    if commits.is_empty() {
        println!("{}", "No commits yet.".yellow());
        return Ok(());
    }

    for (digest, commit) in &commits {
        println!("{} {}", "commit".yellow(), digest.bright_yellow());
        if commit.is_merge() {
            println!(
                "{} {}",
                "Merge:".cyan(),
                commit
                    .parents
                    .iter()
                    .map(|p| p[..7].to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }
        println!("{} {}", "Author:".cyan(), commit.author);
        println!();
        for line in commit.message.lines() {
            println!("    {line}");
        }
        println!();
    }

    Ok(())
}

pub fn branch_command(name: Option<String>, delete: bool) -> Result<()> {
    let repo = open_repo()?;

    if delete {
        let name = name.context("branch name required for deletion")?;
        repo.delete_branch(&name)?;
        println!("Deleted branch '{}'", name.green());
        return Ok(());
    }

    if let Some(name) = name {
        repo.create_branch(&name)?;
        println!("Created branch '{}'", name.green());
        return Ok(());
    }

    let current = repo.current_branch()?;
    for (branch_name, digest) in repo.list_branches()? {
        let marker = if Some(&branch_name) == current.as_ref() {
            "* ".green()
        } else {
            "  ".normal()
        };
        println!("{}{} {}", marker, branch_name.green(), digest[..7].yellow());
    }
    Ok(())
}

pub fn checkout_command(target: &str) -> Result<()> {
    let mut repo = open_repo()?;
    let pb = spinner("reconciling working directory...");
    let result = repo.checkout(target);
    pb.finish_and_clear();
    result?;
    println!("Switched to '{}'", target.green());
    Ok(())
}

pub fn merge_command(branch: &str) -> Result<()> {
    let mut repo = open_repo()?;
    let identity = identity(&repo)?;

    let pb = spinner(&format!("merging '{branch}'..."));
    let result = repo.merge(&identity, branch);
    pb.finish_and_clear();

    match result {
        Ok(digest) => {
            println!(
                "Merge made by the three-way merge strategy, new commit {}",
                digest[..7].bright_yellow()
            );
            Ok(())
        }
        Err(VoxError::Conflicted { paths }) => {
            println!("{}", "Automatic merge failed; fix conflicts and commit the result.".red());
            for path in &paths {
                println!("  {} {}", "conflict:".red(), path);
            }
            Err(VoxError::Conflicted { paths }.into())
        }
        Err(VoxError::AlreadyUpToDate) => {
            println!("{}", "Already up to date.".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn config_command(command: ConfigCommand) -> Result<()> {
    let repo = open_repo()?;
    let path = config_path(&repo);
    let mut config = Config::read_from_file(&path)?;

    match command {
        ConfigCommand::Show => {
            println!("user.name = {}", config.user.name);
            println!("user.email = {}", config.user.email);
        }
        ConfigCommand::SetName { name } => {
            config.set_name(name);
            config.write_to_file(&path)?;
        }
        ConfigCommand::SetEmail { email } => {
            config.set_email(email);
            config.write_to_file(&path)?;
        }
    }

    Ok(())
}
