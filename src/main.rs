use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use promptdesk::cli;
use promptdesk::config::Config;
use promptdesk::llm::factory;
use promptdesk::server::{self, AppState};
use promptdesk::store::SqliteStore;

#[derive(Parser)]
#[command(name = "promptdesk", version)]
#[command(about = "Prompt-templated assistant over the Gemini API", long_about = None)]
struct Cli {
    /// Path to config file (defaults to ./promptdesk.toml or ~/.config/promptdesk/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Override the Gemini model (e.g., "gemini-2.0-flash")
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,

        /// SQLite database path
        #[arg(long)]
        database: Option<String>,
    },

    /// Start an interactive session in the terminal
    Chat {
        /// Feedback file path
        #[arg(long)]
        feedback_file: Option<String>,
    },

    /// Send a single query and print the response
    Ask {
        /// question_answering, text_summarization or creative_generation
        #[arg(short = 'f', long, default_value = "question_answering")]
        function_type: String,

        /// Style within the function type (e.g., factual, bullet_points, storytelling)
        #[arg(short = 's', long, default_value = "factual")]
        style: String,

        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Print feedback analytics from the feedback file
    Stats {
        /// Feedback file path
        #[arg(long)]
        feedback_file: Option<String>,
    },
}

/// `RUST_LOG` wins; otherwise the per-command default. Logs go to stderr so
/// they never mix with interactive output.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    init_logging(default_level);

    let mut config = Config::load_with_path(cli.config)?;
    if let Some(model) = cli.model {
        info!("CLI override: model = {}", model);
        config.llm.model = model;
    }

    match cli.command {
        Commands::Serve { bind, database } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(database) = database {
                config.server.database_path = database;
            }

            // Refuse to serve anything without a usable client
            let client = factory::create_client(&config)?;
            let store = SqliteStore::open_at(&config.server.database_path)?;
            server::run(AppState::new(client, store), &config.server.bind).await?;
        }
        Commands::Chat { feedback_file } => {
            if let Some(path) = feedback_file {
                config.cli.feedback_file = path;
            }
            cli::chat::run(&config).await?;
        }
        Commands::Ask {
            function_type,
            style,
            query,
        } => {
            cli::ask::run(&config, &function_type, &style, &query.join(" ")).await?;
        }
        Commands::Stats { feedback_file } => {
            if let Some(path) = feedback_file {
                config.cli.feedback_file = path;
            }
            cli::stats::run(&config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["promptdesk", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { bind, database } => {
                assert!(bind.is_none());
                assert!(database.is_none());
            }
            _ => panic!("expected serve"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "promptdesk",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--database",
            "/tmp/pd.db",
            "--model",
            "gemini-1.5-pro",
        ])
        .unwrap();
        assert_eq!(cli.model.as_deref(), Some("gemini-1.5-pro"));
        match cli.command {
            Commands::Serve { bind, database } => {
                assert_eq!(bind.unwrap(), "0.0.0.0:9000");
                assert_eq!(database.unwrap(), "/tmp/pd.db");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::try_parse_from([
            "promptdesk",
            "ask",
            "-f",
            "creative_generation",
            "-s",
            "storytelling",
            "a",
            "dragon",
            "story",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                function_type,
                style,
                query,
            } => {
                assert_eq!(function_type, "creative_generation");
                assert_eq!(style, "storytelling");
                assert_eq!(query.join(" "), "a dragon story");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_ask_defaults() {
        let cli = Cli::try_parse_from(["promptdesk", "ask", "What is osmosis?"]).unwrap();
        match cli.command {
            Commands::Ask {
                function_type,
                style,
                ..
            } => {
                assert_eq!(function_type, "question_answering");
                assert_eq!(style, "factual");
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_ask_requires_query() {
        assert!(Cli::try_parse_from(["promptdesk", "ask"]).is_err());
    }

    #[test]
    fn test_parse_chat_feedback_file() {
        let cli =
            Cli::try_parse_from(["promptdesk", "chat", "--feedback-file", "fb.json"]).unwrap();
        match cli.command {
            Commands::Chat { feedback_file } => assert_eq!(feedback_file.unwrap(), "fb.json"),
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_parse_missing_subcommand() {
        assert!(Cli::try_parse_from(["promptdesk"]).is_err());
    }

    #[test]
    fn test_parse_unknown_subcommand() {
        assert!(Cli::try_parse_from(["promptdesk", "foobar"]).is_err());
    }
}
