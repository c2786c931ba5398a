//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::options::ChatOptions;

#[derive(Parser)]
#[command(name = "ragchat")]
#[command(about = "Retrieval-augmented chat over a pgvector passage store")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: configured level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat web UI and API server
    Serve {
        /// Host address to bind to (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS
        #[arg(long)]
        cors: bool,
    },
    /// Ask one question and print the answer as it streams
    Ask {
        /// The question
        question: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Interactive chat in the terminal
    Chat {
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Create the vector extension, passage table and index
    Init {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Embed text files and store them as passages
    Ingest {
        /// Files to ingest; passages are separated by blank lines
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Connect, run the probe query and report the passage count
    Check,
    /// Show current configuration
    Config,
}

/// Per-request chat options; unset flags keep the configured defaults
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Answer without retrieving passages
    #[arg(long)]
    pub no_vector_search: bool,
    /// Number of passages to retrieve (1-20)
    #[arg(long)]
    pub fetch_k: Option<usize>,
    /// Wait for the whole answer instead of streaming it
    #[arg(long)]
    pub no_streaming: bool,
    /// Maximum tokens to generate (10-1024)
    #[arg(long)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0-1.0)
    #[arg(long)]
    pub temperature: Option<f32>,
    /// Top-k sampling (0-500)
    #[arg(long)]
    pub top_k: Option<u32>,
    /// Top-p sampling (0.0-0.99)
    #[arg(long)]
    pub top_p: Option<f32>,
    /// Frequency penalty (0.0-1.0)
    #[arg(long)]
    pub frequency_penalty: Option<f32>,
    /// Presence penalty (0.0-1.0)
    #[arg(long)]
    pub presence_penalty: Option<f32>,
}

impl OptionArgs {
    /// Overlay the given flags on `defaults`
    #[must_use]
    pub fn apply(&self, defaults: &ChatOptions) -> ChatOptions {
        ChatOptions {
            use_vector_search: defaults.use_vector_search && !self.no_vector_search,
            fetch_k: self.fetch_k.unwrap_or(defaults.fetch_k),
            streaming: defaults.streaming && !self.no_streaming,
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            frequency_penalty: self.frequency_penalty.unwrap_or(defaults.frequency_penalty),
            presence_penalty: self.presence_penalty.unwrap_or(defaults.presence_penalty),
        }
    }
}
