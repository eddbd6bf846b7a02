//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rift_tail::config::DEFAULT_MESSAGE_TYPE;

/// Rift -- tail CloudWatch log streams and SQS queues to the terminal.
///
/// Use `rift <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "rift", version, about, long_about = None)]
pub struct Cli {
    /// Path to the rift.toml configuration file (optional; defaults apply when absent).
    #[arg(short, long, global = true, default_value = "rift.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Verbose file:line diagnostics on stderr (same as DEBUG=debug).
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tail the first log stream in a group whose name starts with a prefix.
    LogTail(LogTailArgs),

    /// Tail messages from a queue without consuming them.
    QueueTail(QueueTailArgs),
}

/// Remote account selection shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Remote API region (e.g. us-west-2).
    #[arg(long)]
    pub region: String,

    /// Named credentials profile.
    #[arg(long)]
    pub profile: String,
}

/// Decoding, filtering and rendering options shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Emit one JSON object per line instead of colored text.
    #[arg(long)]
    pub json: bool,

    /// Keep polling until interrupted instead of reading one batch.
    #[arg(long)]
    pub live: bool,

    /// Only print entries whose raw payload matches this regular expression.
    #[arg(long, visible_alias = "grep")]
    pub grep_pattern: Option<String>,

    /// Print only the matched parts of each entry (text mode only).
    #[arg(long, visible_alias = "only")]
    pub only_matching: bool,

    /// .proto file describing the payload message type.
    #[arg(long, visible_alias = "proto")]
    pub schema_file: Option<PathBuf>,

    /// Message type to decode from the schema file.
    #[arg(long, default_value = DEFAULT_MESSAGE_TYPE, requires = "schema_file")]
    pub message_type: String,
}

// ---- log-tail ----

/// Tail a log stream.
#[derive(Args, Debug)]
pub struct LogTailArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Log group name.
    #[arg(long)]
    pub group: String,

    /// Stream name prefix; the first matching stream with recent events is used.
    #[arg(long, visible_alias = "stream")]
    pub stream_prefix: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

// ---- queue-tail ----

/// Tail a message queue.
#[derive(Args, Debug)]
pub struct QueueTailArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Queue name, resolved to its URL before polling.
    #[arg(long, visible_alias = "queue")]
    pub queue_name: String,

    #[command(flatten)]
    pub output: OutputArgs,
}
