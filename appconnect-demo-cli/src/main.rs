//! App Connect Demo CLI
//!
//! Plays both sides of the app-to-app connect round trip from a terminal:
//! `connect` starts an attempt and prints the URL the companion app would be
//! opened with, `callback` feeds the companion's deep link back in.

use std::path::PathBuf;

use anyhow::Result;
use appconnect_lib::NamespaceKind;
use clap::{Parser, Subcommand};

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "appconnect-demo")]
#[command(about = "App Connect Demo CLI - Correlate deep-link round trips with a companion app", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom storage directory (can also be set via APPCONNECT_DEMO_DIR env var)
    #[arg(long, global = true)]
    storage_dir: Option<String>,

    /// Route path or app name the session is scoped to
    #[arg(long, global = true, default_value = "/")]
    target: String,

    /// How the storage namespace is derived from --target (pathname, verbatim)
    #[arg(long, global = true, default_value = "pathname")]
    namespace: NamespaceKind,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a connection attempt
    Connect {
        /// Companion app URL
        url: String,

        /// Deep link type sent to the companion app
        #[arg(short, long, default_value = "icp")]
        deep_link_type: String,

        /// Extra parameter (key=value), repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Route to return to after a successful callback
        #[arg(short, long)]
        redirect: Option<String>,

        /// Request a new tab instead of replacing the current window
        #[arg(long)]
        new_tab: bool,
    },

    /// Resolve an inbound deep link
    Callback {
        /// Deep link URL (result parameters in the fragment)
        url: String,
    },

    /// Show the stored session for the target
    Status,

    /// Remove the stored session for the target
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("appconnect_demo=debug,appconnect_lib=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("appconnect_demo=info,appconnect_lib=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    // Setup storage directory
    let storage_dir = if let Some(dir) = cli.storage_dir {
        PathBuf::from(dir)
    } else if let Some(dir) = std::env::var_os("APPCONNECT_DEMO_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("appconnect-demo")
    };

    let scope = commands::Scope {
        storage_dir,
        target: cli.target,
        namespace: cli.namespace,
    };

    // Dispatch commands
    match cli.command {
        Commands::Connect {
            url,
            deep_link_type,
            params,
            redirect,
            new_tab,
        } => {
            commands::connect::run(&scope, &url, &deep_link_type, &params, redirect, new_tab)
                .await?;
        }
        Commands::Callback { url } => {
            commands::callback::run(&scope, &url, cli.verbose).await?;
        }
        Commands::Status => {
            commands::status::run(&scope).await?;
        }
        Commands::Clear => {
            commands::clear::run(&scope).await?;
        }
    }

    Ok(())
}
