//! Command-line definition for the `chirpstream` binary.

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "chirpstream",
    version,
    about = "Watch a live, filterable tweet stream from your terminal"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile name from the config file.
    #[arg(long, short = 'p', global = true, env = "CHIRPSTREAM_PROFILE")]
    pub profile: Option<String>,

    /// SSE stream endpoint override (bypasses the config file).
    #[arg(long, global = true, env = "CHIRPSTREAM_STREAM")]
    pub stream: Option<String>,

    /// WebSocket notice endpoint override.
    #[arg(long = "socket-url", global = true, env = "CHIRPSTREAM_SOCKET")]
    pub socket_url: Option<String>,

    /// Accept invalid TLS certificates.
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Connect timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream tweets to stdout as they arrive.
    Watch(WatchArgs),

    /// Inspect the configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only show tweets whose text contains this substring (case-sensitive).
    #[arg(long, short = 'c')]
    pub contains: Option<String>,

    /// Also open the notice socket channel.
    #[arg(long)]
    pub socket: bool,

    /// Stop after this many matching tweets.
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration.
    Show,
    /// Print the config file path.
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
