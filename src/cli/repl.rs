// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::Result;
use clap::ValueEnum;
use console::{Style, style};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow;

use crate::cli::OutputFormat;
use crate::command::{DirectiveParser, Outcome, SelectorSession};
use crate::config::{self, Config};
use crate::output;

// Command keywords and argument words for completion
const COMMANDS: &[&str] = &[
    "present", "absent", "add", "set", "in", "notin", "raw", "merge",
    "field", "show", "render", "reset", "output", "help", "quit",
];

const ARGUMENTS: &[&str] = &[
    "labels", "fields", "all", "raw", "json", "yaml",
    ":present", ":absent",
];

struct SelectorHelper;

impl Helper for SelectorHelper {}

impl Hinter for SelectorHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Validator for SelectorHelper {
    fn validate(&self, _ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Completer for SelectorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];

        // Find the start of the current word
        let word_start = line_to_cursor
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);

        let prefix = &line_to_cursor[word_start..];
        if prefix.is_empty() {
            return Ok((pos, vec![]));
        }

        let prefix_lower = prefix.to_lowercase();
        let mut matches: Vec<Pair> = Vec::new();

        // Command keywords only complete at the start of the line
        if word_start == 0 {
            for &cmd in COMMANDS {
                if cmd.starts_with(&prefix_lower) {
                    matches.push(Pair {
                        display: cmd.to_string(),
                        replacement: cmd.to_string(),
                    });
                }
            }
        } else {
            for &arg in ARGUMENTS {
                if arg.starts_with(&prefix_lower) {
                    matches.push(Pair {
                        display: arg.to_string(),
                        replacement: arg.to_string(),
                    });
                }
            }
        }

        Ok((word_start, matches))
    }
}

impl Highlighter for SelectorHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        // Highlight the leading command keyword
        let mut result = line.to_string();

        for &cmd in COMMANDS {
            let re = regex::RegexBuilder::new(&format!(r"^\s*\b{}\b", regex::escape(cmd)))
                .case_insensitive(true)
                .build()
                .unwrap();
            result = re
                .replace(&result, |caps: &regex::Captures| {
                    format!("\x1b[1;34m{}\x1b[0m", &caps[0])
                })
                .to_string();
        }

        Cow::Owned(result)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(format!("\x1b[1;32m{}\x1b[0m", prompt))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "{} {} - Compose Kubernetes selector strings",
        style("kubesel").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "{}",
        style("Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>").dim()
    );
    println!(
        "{}",
        style("Type 'help' for commands, Ctrl+D to exit").dim()
    );
    println!();
}

fn print_help() {
    let help_style = Style::new().cyan();
    let cmd_style = Style::new().yellow();

    println!("{}", help_style.apply_to("Label terms:"));
    println!("  {}        - Bare key (\"key is set\")", cmd_style.apply_to("present <key>"));
    println!("  {}         - Record a key that renders as nothing", cmd_style.apply_to("absent <key>"));
    println!("  {}  - Append a term (no values = present)", cmd_style.apply_to("add <key> [value...]"));
    println!("  {}  - Replace the first term with that key", cmd_style.apply_to("set <key> [value...]"));
    println!("  {}   - Explicit in term", cmd_style.apply_to("in <key> <value...>"));
    println!("  {} - Explicit notin term", cmd_style.apply_to("notin <key> <value...>"));
    println!("  {}            - Verbatim passthrough clause", cmd_style.apply_to("raw <text>"));
    println!("  {}   - Merge a mapping document", cmd_style.apply_to("merge <mapping doc>"));
    println!();
    println!("{}", help_style.apply_to("Field expressions:"));
    println!("  {} - e.g. field status.phase == Running", cmd_style.apply_to("field <path> ==|!= <value>"));
    println!();
    println!("{}", help_style.apply_to("Session:"));
    println!("  {}  - List the draft", cmd_style.apply_to("show"));
    println!("  {}  - Print the selector string(s)", cmd_style.apply_to("render [labels|fields|all]"));
    println!("  {}  - Discard the draft", cmd_style.apply_to("reset"));
    println!("  {}  - Switch output format", cmd_style.apply_to("output <raw|json|yaml>"));
    println!();
    println!("{}", help_style.apply_to("Examples:"));
    println!("  {}", cmd_style.apply_to("in app web api"));
    println!("  {}", cmd_style.apply_to("notin env dev staging"));
    println!("  {}", cmd_style.apply_to(r#"merge {"tier": ":present", "___": "x!=y"}"#));
    println!();
}

pub fn run_repl(initial_format: OutputFormat) -> Result<()> {
    let parser = DirectiveParser::new();
    let mut session = SelectorSession::new();
    let mut format = initial_format;

    let helper = SelectorHelper;
    let rl_config = rustyline::Config::builder()
        .auto_add_history(true)
        .max_history_size(1000)?
        .build();

    let mut rl: Editor<SelectorHelper, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    // Load history
    let history_path = config::history_path()
        .unwrap_or_else(|_| ".kubesel_history".into());
    let _ = rl.load_history(&history_path);

    print_welcome();

    loop {
        let prompt = format!("{}> ", style("kubesel").green().bold());

        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();

                if input.is_empty() {
                    continue;
                }

                // Handle special commands
                let lower = input.to_lowercase();
                if lower == "quit" || lower == "exit" || lower == "\\q" {
                    println!("{}", style("Goodbye!").dim());
                    break;
                }
                if lower == "help" || lower == "\\?" {
                    print_help();
                    continue;
                }
                if lower == "clear" || lower == "\\c" {
                    print!("\x1B[2J\x1B[1;1H"); // Clear screen
                    continue;
                }

                match parser.parse(input) {
                    Ok(directive) => match session.apply(&directive) {
                        Ok(outcome) => print_outcome(outcome, &mut format),
                        Err(e) => {
                            println!("{} {}", style("Error:").red().bold(), style(e).red());
                        }
                    },
                    Err(e) => {
                        println!("{} {}", style("Parse error:").red().bold(), style(e).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", style("^C").dim());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", style("Goodbye!").dim());
                break;
            }
            Err(err) => {
                println!("{} {:?}", style("Error:").red().bold(), err);
                break;
            }
        }
    }

    // Save history
    if let Some(parent) = history_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}

fn print_outcome(outcome: Outcome, format: &mut OutputFormat) {
    match outcome {
        Outcome::Ack(msg) => {
            println!("{} {}", style("+").green().bold(), style(msg).dim());
        }
        Outcome::Listing(rows) => {
            if rows.is_empty() {
                println!("{}", style("(empty draft)").dim());
            } else {
                println!("{}", output::format_listing(&rows));
            }
        }
        Outcome::Rendered(selectors) => {
            let rendered = output::format_selectors(&selectors, format);
            if rendered.is_empty() {
                println!("{}", style("(empty selector)").dim());
            } else {
                println!("{}", rendered);
            }
        }
        Outcome::Reset => {
            println!("{}", style("draft reset").dim());
        }
        Outcome::OutputChanged(name) => match OutputFormat::from_str(&name, true) {
            Ok(new_format) => {
                *format = new_format;
                // Persist as the default for future sessions
                if let Ok(mut cfg) = Config::load()
                    && let Err(e) = cfg.set_default_output(&name)
                {
                    println!(
                        "{} Could not save config: {}",
                        style("Warning:").yellow().bold(),
                        e
                    );
                }
                println!("{}", style(format!("output format: {}", name)).dim());
            }
            Err(_) => {
                println!(
                    "{} {}",
                    style("Error:").red().bold(),
                    style(format!("unknown output format: {} (raw|json|yaml)", name)).red()
                );
            }
        },
    }
}
