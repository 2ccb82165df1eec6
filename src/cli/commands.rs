use std::path::PathBuf;

use crate::config::ClassifierMode;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "autosales")]
#[command(
    author,
    version,
    about = "LLM-backed B2B sales email drafting service"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .autosales.yml by default)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .autosales.yml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Route one free-text request and print the JSON result
    #[command(visible_alias = "ask")]
    Chat {
        /// The request, e.g. "프로젝트 1번에 메일 보내줘"
        prompt: String,

        /// JSON object with structured parameters (use '-' to read from stdin)
        #[arg(long)]
        payload: Option<String>,

        /// How to classify the prompt (overrides config)
        #[arg(long, value_enum)]
        classifier: Option<ClassifierArg>,
    },

    /// List the supported intents and their required fields
    Intents {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ClassifierArg {
    Keyword,
    Llm,
}

impl From<ClassifierArg> for ClassifierMode {
    fn from(arg: ClassifierArg) -> Self {
        match arg {
            ClassifierArg::Keyword => ClassifierMode::Keyword,
            ClassifierArg::Llm => ClassifierMode::Llm,
        }
    }
}
