//! A6: the CLI surface. A thin `clap`-derived dispatcher over the six core
//! operations plus `init` and a `config` convenience command for the author
//! identity (A5). No `cat-file`, `hash-object`, `remote`, or `clone` —
//! those belong to a wire-protocol/remote layer this crate doesn't have.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vox", version, about = "A minimal distributed version control system", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scaffold a new repository in the current directory.
    Init,

    /// Stage files (or directories, recursively) for the next commit.
    Add {
        /// Paths relative to the working directory root.
        paths: Vec<String>,
    },

    /// Record a new commit from the current staging area.
    Commit {
        #[arg(short, long)]
        message: String,
    },

    /// Show commit history starting from HEAD.
    Log {
        /// Maximum number of commits to show.
        #[arg(short = 'n', long = "max-count")]
        count: Option<usize>,
    },

    /// Create, list, or delete branches.
    Branch {
        /// Name of the branch to create (or delete with -d). Omit to list.
        name: Option<String>,

        #[arg(short, long)]
        delete: bool,
    },

    /// Switch the working directory and index to a branch or commit.
    Checkout {
        /// Branch name, or a 40-hex commit digest for a detached checkout.
        target: String,
    },

    /// Three-way merge a branch into the current HEAD.
    Merge {
        /// Name of the branch to merge in.
        branch: String,
    },

    /// Inspect or update the committer identity (`user.name`/`user.email`).
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current committer identity.
    Show,
    /// Set `user.name`.
    SetName { name: String },
    /// Set `user.email`.
    SetEmail { email: String },
}
