//! Command-line argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FlowAI chat CLI
#[derive(Parser)]
#[command(name = "flowai")]
#[command(about = "Chat with an LLM that can call tools on a JSON-RPC tool server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// YAML settings file (defaults to ~/.config/flowai/config.yaml, then LLM_* / MCP_* variables)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one message and print the answer
    Chat {
        message: String,

        /// System message to start the conversation with
        #[arg(long)]
        system: Option<String>,

        /// Model to use instead of the configured default
        #[arg(long)]
        model: Option<String>,

        /// Answer without offering any tools
        #[arg(long)]
        no_tools: bool,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List models offered by the LLM endpoint
    Models,

    /// List tools offered by the tool server
    Tools,

    /// Run one tool directly
    Tool {
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Check that the tool server is up
    Health {
        /// Poll up to this many times, one second apart
        #[arg(long, default_value_t = 1)]
        wait: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat() {
        let cli = Cli::try_parse_from(["flowai", "chat", "hello", "--no-tools", "--model", "llama2"]).unwrap();
        match cli.command {
            Commands::Chat { message, model, no_tools, system, json } => {
                assert_eq!(message, "hello");
                assert_eq!(model.as_deref(), Some("llama2"));
                assert!(no_tools);
                assert!(system.is_none());
                assert!(!json);
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["flowai", "tools", "--config", "settings.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
        assert!(matches!(cli.command, Commands::Tools));
    }

    #[test]
    fn test_tool_args_default() {
        let cli = Cli::try_parse_from(["flowai", "tool", "check_order_status"]).unwrap();
        match cli.command {
            Commands::Tool { name, args } => {
                assert_eq!(name, "check_order_status");
                assert_eq!(args, "{}");
            }
            _ => panic!("expected tool"),
        }
    }
}
