// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "kubesel")]
#[command(author, version, about = "Compose Kubernetes label and field selector strings")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Render a selector mapping document (JSON or YAML) directly.
    /// Example: -q '{"app": ["in", "web", "api"], "tier": ":present"}'
    #[arg(short = 'q', long = "mapping", value_name = "DOC")]
    pub mapping: Option<String>,

    /// Execute selector-building commands from a script file
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output format (defaults to the configured format, then raw)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start interactive REPL mode
    Interactive,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Raw,
    Json,
    Yaml,
}
