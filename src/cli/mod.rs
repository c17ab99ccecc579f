// src/cli/mod.rs — CLI definition (clap derive)

pub mod ask;
pub mod inbox;
pub mod migrate;
pub mod serve;
pub mod tools;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio", about = "Portfolio backend with an LLM-backed assistant", version)]
pub struct Cli {
    /// Config file path (defaults to $FOLIO_CONFIG or ./folio.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    Serve,
    /// Ask the portfolio assistant one question
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// List the tools offered over MCP
    Tools,
    /// Show contact-form messages
    Inbox {
        /// Only messages not yet marked read
        #[arg(long)]
        unread: bool,
        /// Mark a message as read
        #[arg(long, value_name = "ID")]
        mark_read: Option<i64>,
    },
    /// Show or change the database schema version
    Migrate {
        #[arg(long)]
        status: bool,
        #[arg(long)]
        rollback: bool,
    },
}
