// DocSearch Gate - Main Entry Point
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// PreToolUse hook for WebSearch plus a few operator commands.
// Usage:
//   docsearch-gate                        # Hook mode: request on stdin, exit 0 allow / 2 deny
//   docsearch-gate hook                   # Same as above
//   docsearch-gate check <query>          # Dry-run keyword matching, no state touched
//   docsearch-gate validate               # Validate config, print diagnostics
//   docsearch-gate session <id>           # Show stored state for a session
//   docsearch-gate clean                  # Remove stale session state files

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docsearch_gate::{
    config::DocsearchConfig,
    gate::{self, GateDecision, EXIT_ALLOW},
    input::HookInput,
    matcher, paths,
    storage::SessionStore,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsearch-gate")]
#[command(version)]
#[command(about = "DocSearch Gate - redirects documentation web searches to local RAG databases")]
struct Cli {
    /// Config file (env DOCSEARCH_CONFIG_PATH)
    #[arg(short, long, default_value_os_t = paths::config_path())]
    config: PathBuf,

    /// Session state directory (env DOCSEARCH_STATE_DIR)
    #[arg(short, long, default_value_os_t = paths::state_dir())]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as PreToolUse hook (default when no command given)
    Hook,

    /// Show which databases a query would be redirected to
    Check {
        /// Search query
        query: String,
    },

    /// Validate the config file and print every diagnostic
    Validate,

    /// Show stored escape-hatch state for a session
    Session {
        /// Session id (sanitized the same way the hook does)
        session_id: String,
    },

    /// Remove stale session state files
    Clean,
}

/// Hook mode. Never fails: anything unexpected ends in exit 0 (allow).
fn run_hook(cli: &Cli) -> i32 {
    let raw = match std::io::read_to_string(std::io::stdin()) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("stdin unreadable, allowing: {}", e);
            return EXIT_ALLOW;
        }
    };
    let Some(input) = HookInput::parse(&raw) else {
        return EXIT_ALLOW;
    };

    let store = SessionStore::new(&cli.state_dir);
    let decision = gate::process(&input, &cli.config, &store, gate::now_secs());

    match &decision {
        GateDecision::Allow(reason) => {
            log::debug!("allow: {:?}", reason);
            EXIT_ALLOW
        }
        GateDecision::Deny(response) => match serde_json::to_string(response) {
            Ok(json) => {
                println!("{}", json);
                decision.exit_code()
            }
            Err(e) => {
                log::warn!("deny payload not serializable, allowing: {}", e);
                EXIT_ALLOW
            }
        },
    }
}

fn main() -> Result<()> {
    // stderr only; stdout is reserved for the decision payload
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    // clap exits 2 on bad arguments, which the host reads as "deny"
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    match &cli.command {
        None | Some(Commands::Hook) => {
            std::process::exit(run_hook(&cli));
        }

        Some(Commands::Check { query }) => {
            let validated = DocsearchConfig::load(&cli.config)
                .with_context(|| format!("Failed to load config {:?}", cli.config))?;
            let matches = matcher::find_matches(query, &validated.config.databases);

            if matches.is_empty() {
                println!("No match: web search allowed");
            } else {
                let plural = if matches.len() == 1 { "" } else { "s" };
                println!("Redirect ({} database{}):", matches.len(), plural);
                for (i, m) in matches.iter().enumerate() {
                    println!(
                        "  {}. '{}' via {} ({}) at {}",
                        i + 1,
                        m.keyword,
                        m.entry.mcp_tool_name,
                        m.entry.description,
                        m.entry.path
                    );
                }
            }
        }

        Some(Commands::Validate) => {
            let validated = DocsearchConfig::load(&cli.config)
                .with_context(|| format!("Failed to load config {:?}", cli.config))?;

            println!("Config: {:?}", cli.config);
            for diag in &validated.diagnostics {
                println!("  ! {}", diag);
            }
            println!("Usable databases: {}", validated.config.databases.len());
            for db in &validated.config.databases {
                println!("  {} [{}] -> {}", db.mcp_tool_name, db.keywords.join(", "), db.path);
            }

            if validated.config.is_empty() {
                bail!("config has no usable databases");
            }
        }

        Some(Commands::Session { session_id }) => {
            let store = SessionStore::new(&cli.state_dir);
            let state = store.load(session_id);
            println!("State file: {:?}", store.state_path(session_id));
            println!("{}", serde_json::to_string_pretty(&state)?);
        }

        Some(Commands::Clean) => {
            let store = SessionStore::new(&cli.state_dir);
            let removed = store.clean_stale(gate::now_secs(), None);
            println!("Removed {} stale session file(s) from {:?}", removed, store.dir());
        }
    }

    Ok(())
}
