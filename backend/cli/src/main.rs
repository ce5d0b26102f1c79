mod config_cmd;
mod write_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use daylog_config::{config_dir, config_file_path, load_config, prepare_config};
use daylog_logging::{init_logger, DailyFileLogWriter};

use config_cmd::ConfigAction;

#[derive(Parser)]
#[command(name = "daylog")]
#[command(about = "Per-channel daily file logging")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.daylog/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one message to a channel's daily file
    Write {
        /// Channel name (default: the configured default channel)
        #[arg(short, long)]
        channel: Option<String>,

        /// debug, info, notice, warning, error, critical, alert, or emergency
        #[arg(short, long, default_value = "info")]
        level: String,

        /// JSON object of extra fields
        #[arg(long)]
        context: Option<String>,

        /// Parse the message as JSON instead of plain text
        #[arg(long)]
        json: bool,

        message: String,
    },
    /// Write to a channel from positional arguments: [level] message
    Route {
        name: String,

        #[arg(required = true)]
        args: Vec<String>,
    },
    /// Print today's log file path for a channel
    Path { name: Option<String> },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config,
        log_dir,
        command,
    } = Cli::parse();
    let config_path = config.unwrap_or_else(|| config_file_path(&config_dir()));

    match command {
        Commands::Config { action } => {
            init_logger("warn");
            config_cmd::run(action, &config_path).await
        }
        Commands::Write {
            channel,
            level,
            context,
            json,
            message,
        } => {
            let writer = open_writer(&config_path, log_dir).await?;
            let request = write_cmd::WriteRequest {
                channel: channel.as_deref(),
                level: &level,
                context: context.as_deref(),
                json,
                message: &message,
            };
            write_cmd::write(&writer, &request)
        }
        Commands::Route { name, args } => {
            let writer = open_writer(&config_path, log_dir).await?;
            write_cmd::route(&writer, &name, args)
        }
        Commands::Path { name } => {
            let writer = open_writer(&config_path, log_dir).await?;
            write_cmd::print_path(&writer, name.as_deref())
        }
    }
}

/// Load the config, install diagnostics, and construct the writer.
async fn open_writer(config_path: &Path, log_dir: Option<PathBuf>) -> Result<DailyFileLogWriter> {
    let raw = load_config(config_path).await?;
    init_logger(raw.log_level());

    let config = prepare_config(raw, config_path)?;
    let mut writer_config = config.writer_config()?;
    if let Some(dir) = log_dir {
        writer_config.path = dir;
    }

    debug!(dir = %writer_config.path.display(), "Opening daily file writer");
    Ok(DailyFileLogWriter::new(writer_config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_write_command() {
        let cli = Cli::try_parse_from([
            "daylog", "write", "-c", "orders", "-l", "error", "--context", r#"{"id":1}"#,
            "payment failed",
        ])
        .unwrap();
        match cli.command {
            Commands::Write {
                channel,
                level,
                context,
                json,
                message,
            } => {
                assert_eq!(channel.as_deref(), Some("orders"));
                assert_eq!(level, "error");
                assert_eq!(context.as_deref(), Some(r#"{"id":1}"#));
                assert!(!json);
                assert_eq!(message, "payment failed");
            }
            _ => panic!("expected write"),
        }
    }

    #[test]
    fn parses_route_with_global_flags() {
        let cli = Cli::try_parse_from([
            "daylog", "route", "billing", "critical", "card declined", "--log-dir", "/tmp/logs",
        ])
        .unwrap();
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/logs")));
        match cli.command {
            Commands::Route { name, args } => {
                assert_eq!(name, "billing");
                assert_eq!(args, vec!["critical", "card declined"]);
            }
            _ => panic!("expected route"),
        }
    }

    #[test]
    fn route_requires_arguments() {
        assert!(Cli::try_parse_from(["daylog", "route", "billing"]).is_err());
    }

    #[test]
    fn level_defaults_to_info() {
        let cli = Cli::try_parse_from(["daylog", "write", "hello"]).unwrap();
        assert!(matches!(cli.command, Commands::Write { ref level, .. } if level == "info"));
    }
}
