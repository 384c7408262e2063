// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
mod command;
pub mod config;
mod output;
mod selector;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;

use cli::{Args, Command, OutputFormat};
use command::{DirectiveParser, Outcome, RenderTarget, SelectorSession};
use selector::{ApiSelectors, Selector};

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool, to_stderr: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    // Create log directory
    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // File appender with size-based rotation:
    // - Max 10MB per file
    // - Keep up to 5 files (total max ~50MB)
    // - Also rotate daily
    let log_path = log_dir.join("kubesel.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024); // 10MB

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    // Use non-blocking writer for better performance
    let (non_blocking, _guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(_guard);

    let filter = if verbose { "kubesel=debug" } else { "kubesel=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    // File layer (always enabled)
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if to_stderr && verbose {
        // Both file and stderr output
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        // File only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    // - Always log to file (~/.kubesel/log/kubesel.log)
    // - For batch mode with -v, also log to stderr
    let is_batch = args.mapping.is_some() || args.file.is_some();
    init_logging(args.verbose, is_batch && args.verbose);

    if args.no_color {
        console::set_colors_enabled(false);
    }

    // Handle subcommands
    if let Some(cmd) = &args.command {
        match cmd {
            Command::Interactive => {
                return cli::repl::run_repl(resolve_output(&args));
            }
        }
    }

    // Batch mode: -q or -f
    if is_batch {
        return run_batch(&args);
    }

    // Default: interactive REPL mode
    cli::repl::run_repl(resolve_output(&args))
}

/// Resolve the output format: -o flag, then configured default, then raw
fn resolve_output(args: &Args) -> OutputFormat {
    if let Some(ref format) = args.output {
        return format.clone();
    }
    config::Config::load()
        .ok()
        .and_then(|c| c.default_output)
        .and_then(|name| OutputFormat::from_str(&name, true).ok())
        .unwrap_or_default()
}

fn run_batch(args: &Args) -> Result<()> {
    let mut format = resolve_output(args);

    // -q: render a mapping document directly
    if let Some(ref doc) = args.mapping {
        let selector = Selector::from_mapping_str(doc)?;
        tracing::info!(selector = %selector, "rendered mapping document");
        let selectors = ApiSelectors::new(Some(selector.to_string()), None);
        println!("{}", output::format_selectors(&selectors, &format));
        return Ok(());
    }

    // -f: execute a command script line by line
    if let Some(ref file) = args.file {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read script file: {}", file))?;
        let parser = DirectiveParser::new();
        let mut session = SelectorSession::new();
        let mut rendered_any = false;

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("--") {
                continue;
            }
            let directive = parser
                .parse(line)
                .with_context(|| format!("{}:{}", file, lineno + 1))?;
            let outcome = session
                .apply(&directive)
                .with_context(|| format!("{}:{}", file, lineno + 1))?;
            match outcome {
                Outcome::Rendered(selectors) => {
                    rendered_any = true;
                    println!("{}", output::format_selectors(&selectors, &format));
                }
                Outcome::Listing(rows) => {
                    println!("{}", output::format_listing(&rows));
                }
                Outcome::OutputChanged(name) => {
                    format = OutputFormat::from_str(&name, true).map_err(|_| {
                        anyhow!("{}:{}: unknown output format: {}", file, lineno + 1, name)
                    })?;
                }
                Outcome::Ack(_) | Outcome::Reset => {}
            }
        }

        // A script that never rendered still produces its selector
        if !rendered_any {
            let selectors = session.render(RenderTarget::All);
            println!("{}", output::format_selectors(&selectors, &format));
        }
    }

    Ok(())
}
