use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lib::assistant::SimulatedReply;
use lib::config::Config;
use lib::context::ContextRegistry;
use lib::conversation::ConversationStore;
use lib::present;

#[derive(Parser)]
#[command(name = "lifeos")]
#[command(about = "LifeOS CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and default files (config and bundled assets such as the background worker script).
    Init {
        /// Config file path (default: LIFEOS_CONFIG_PATH or ~/.lifeos/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Chat with the simulated assistant (interactive). Type /quit to exit.
    Chat {
        /// Config file path (default: LIFEOS_CONFIG_PATH or ~/.lifeos/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// List contexts as the contexts tab shows them, optionally adding one first.
    Contexts {
        /// Config file path (default: LIFEOS_CONFIG_PATH or ~/.lifeos/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Display name of a context to add (normalized to a slug).
        #[arg(long, value_name = "NAME")]
        add: Option<String>,

        /// Description for the added context.
        #[arg(long, value_name = "TEXT", requires = "add")]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("lifeos {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Chat { config }) => {
            if let Err(e) = run_chat(config).await {
                log::error!("chat failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Contexts {
            config,
            add,
            description,
        }) => {
            if let Err(e) = run_contexts(config, add, description) {
                log::error!("contexts failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_chat(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    use std::io::{self, BufRead, Write};

    let (config, _) = lib::config::load_config(config_path)?;
    let generator = Arc::new(SimulatedReply::from_config(&config));
    let mut store = ConversationStore::new(generator, tokio::runtime::Handle::current());
    if let Some(greeting) = &config.assistant.greeting {
        store = store.with_greeting(greeting.clone());
    }
    for m in store.messages() {
        println!("assistant [{}]: {}", present::message_time(m.timestamp), m.content);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("/quit") {
            break;
        }
        if !store.submit(line) {
            continue;
        }
        println!("AI is thinking...");
        if let Some(reply) = store.wait_reply().await {
            println!("assistant [{}]: {}", present::message_time(reply.timestamp), reply.content);
        }
    }
    Ok(())
}

fn run_contexts(
    config_path: Option<PathBuf>,
    add: Option<String>,
    description: Option<String>,
) -> anyhow::Result<()> {
    let (config, _) = lib::config::load_config(config_path)?;
    let lines = context_lines(
        &config,
        chrono::Utc::now(),
        add.as_deref(),
        description.as_deref(),
    );
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Build the registry from config, apply an optional add, and format one line per context.
/// A blank name is ignored the same way the new-context dialog ignores it.
fn context_lines(
    config: &Config,
    now: DateTime<Utc>,
    add: Option<&str>,
    description: Option<&str>,
) -> Vec<String> {
    let placeholder = config.contexts.default_description.clone();
    let mut registry = if config.contexts.seed {
        ContextRegistry::seeded(now, placeholder)
    } else {
        ContextRegistry::empty(placeholder)
    };

    if let Some(name) = add {
        if registry.add_context(name, description).is_none() {
            log::debug!("ignoring blank context name");
        }
    }

    let max = config.contexts.description_preview_chars;
    registry
        .contexts()
        .iter()
        .map(|c| {
            format!(
                "#{:<20} {:<12} {}",
                c.name,
                present::relative_age(c.last_updated, now),
                present::truncate_description(&c.description, max)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_add_still_lists_seed() {
        let config = Config::default();
        let lines = context_lines(&config, Utc::now(), Some("   "), Some("ignored"));
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("#general"));
    }

    #[test]
    fn add_prepends_slug() {
        let config = Config::default();
        let lines = context_lines(&config, Utc::now(), Some("Q4 Planning"), None);
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("#q4-planning"));
        assert!(lines[0].contains("Just now"));
        assert!(lines[0].ends_with("No description"));
    }
}
