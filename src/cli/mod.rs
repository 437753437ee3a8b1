//! CLI module - Command-line interface for Marquee
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Marquee - movie discovery backend
/// Accounts, favorites and lists over a TMDB-backed catalog
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account
    Create {
        /// Display name
        #[arg(long)]
        name: String,
        /// Login email
        #[arg(long)]
        email: String,
        /// Plaintext password, hashed before it is stored
        #[arg(long)]
        password: String,
        /// Grant the admin flag
        #[arg(long)]
        admin: bool,
    },
    /// List user accounts
    #[command(alias = "ls")]
    List,
    /// Grant the admin flag to an existing account
    Promote {
        /// Email of the account
        email: String,
    },
}

pub use commands::*;
