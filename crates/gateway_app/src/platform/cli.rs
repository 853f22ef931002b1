use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gateway_engine::{GatewaySettings, DEFAULT_API_BASE_URL, DEFAULT_PUSH_ENDPOINT};

use super::logging::LogDestination;

/// Upload course packages and follow their processing.
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about)]
pub struct Cli {
    /// Base URL of the upload-target service.
    #[arg(long, env = "GATEWAY_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_url: String,

    /// WebSocket endpoint for processing notifications.
    #[arg(long, env = "GATEWAY_PUSH_URL", default_value = DEFAULT_PUSH_ENDPOINT)]
    pub push_url: String,

    /// Directory holding the session file. Defaults to a folder in the
    /// system temp directory.
    #[arg(long)]
    pub session_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Upload one package without prompts and wait until processing completes.
    Upload {
        /// Path to a `.zip` package.
        package: PathBuf,
        /// Content name. Derived from the file name when omitted.
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma separated tags.
        #[arg(long, default_value = "")]
        tags: String,
    },
}

impl Cli {
    pub fn settings(&self) -> GatewaySettings {
        GatewaySettings {
            api_base_url: self.api_url.clone(),
            push_endpoint: self.push_url.clone(),
            ..GatewaySettings::default()
        }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.session_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("content-gateway"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_with_file_logging() {
        let cli = Cli::try_parse_from(["gateway", "--api-url", "http://127.0.0.1:9000"]).unwrap();
        assert_eq!(cli.log, LogDestination::File);
        assert!(cli.command.is_none());
        assert_eq!(cli.settings().api_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn parses_scripted_upload() {
        let cli = Cli::try_parse_from([
            "gateway",
            "--log",
            "both",
            "--session-dir",
            "/tmp/s",
            "upload",
            "course.zip",
            "--name",
            "Safety 101",
            "--tags",
            "safety, onboarding",
        ])
        .unwrap();
        assert_eq!(cli.log, LogDestination::Both);
        assert_eq!(cli.session_dir(), PathBuf::from("/tmp/s"));
        assert_eq!(
            cli.command,
            Some(Command::Upload {
                package: PathBuf::from("course.zip"),
                name: Some("Safety 101".to_string()),
                description: String::new(),
                tags: "safety, onboarding".to_string(),
            })
        );
    }

    #[test]
    fn rejects_unknown_log_destination() {
        assert!(Cli::try_parse_from(["gateway", "--log", "syslog"]).is_err());
    }
}
