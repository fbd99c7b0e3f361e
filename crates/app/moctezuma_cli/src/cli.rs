//! Command-line interface definition.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "moctezuma",
    version,
    about = "Terminal client for the Moctezuma record shop"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the catalog, one page at a time.
    Records {
        /// Page number (the first page when omitted).
        #[arg(long)]
        page: Option<u32>,
    },

    /// Full-text search across the catalog.
    Search {
        /// Search terms.
        query: String,
        #[arg(long)]
        page: Option<u32>,
    },

    /// Show one record by slug.
    Show {
        /// Record slug, e.g. "rumours".
        slug: String,
    },

    /// Log in with email and password.
    Login {
        email: String,
        #[arg(long, env = "MOCTEZUMA_PASSWORD")]
        password: String,
    },

    /// Create an account and open a session.
    Register {
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "MOCTEZUMA_PASSWORD")]
        password: String,
    },

    /// Close the current session.
    Logout,

    /// Show the current session's user.
    Whoami,

    /// Show the session's cart.
    Cart,

    /// Add a record to the cart.
    CartAdd {
        /// Record id (numeric or string).
        record_id: String,
        /// Units to add; the server default (1) applies when omitted.
        #[arg(long)]
        quantity: Option<u32>,
    },
}
