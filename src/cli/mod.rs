//! Command-line interface for the attach agent.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::attach_info::AttachInfoArgs;
use commands::scan::ScanArgs;

#[derive(Parser, Debug)]
#[command(name = "attach-agent")]
#[command(
    about = "Node-local attach info agent with NUMA-aware fabric selection",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./attach-agent.yaml if present)
    #[arg(short, long, global = true, env = "ATTACH_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve attach info requests for a client NUMA node
    AttachInfo(AttachInfoArgs),

    /// Scan the fabric and show interfaces by NUMA node
    Scan(ScanArgs),
}

/// Report a command failure and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1);
}
