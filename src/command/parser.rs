// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use anyhow::{Result, anyhow, bail};

use super::ast::{Directive, RenderTarget};
use crate::selector::FieldOperator;

/// Parser for the selector-building command language.
///
/// Commands are flat: a keyword, then whitespace-separated arguments with
/// single- or double-quoting for values containing spaces. `raw` and `merge`
/// take the untokenized rest of the line, since fragment text and mapping
/// documents carry their own syntax.
pub struct DirectiveParser;

impl DirectiveParser {
    pub fn new() -> DirectiveParser {
        DirectiveParser
    }

    pub fn parse(&self, line: &str) -> Result<Directive> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "present" => Ok(Directive::Present {
                key: one_key(rest, "present")?,
            }),
            "absent" => Ok(Directive::Absent {
                key: one_key(rest, "absent")?,
            }),
            "add" => {
                let (key, values) = key_and_values(rest, "add")?;
                Ok(Directive::Add { key, values })
            }
            "set" => {
                let (key, values) = key_and_values(rest, "set")?;
                Ok(Directive::Set { key, values })
            }
            "in" => {
                let (key, values) = key_and_values(rest, "in")?;
                Ok(Directive::In { key, values })
            }
            "notin" => {
                let (key, values) = key_and_values(rest, "notin")?;
                Ok(Directive::NotIn { key, values })
            }
            "raw" => {
                if rest.is_empty() {
                    bail!("Usage: raw <text>");
                }
                Ok(Directive::Raw {
                    text: rest.to_string(),
                })
            }
            "merge" => {
                if rest.is_empty() {
                    bail!("Usage: merge <mapping document>");
                }
                Ok(Directive::Merge {
                    doc: rest.to_string(),
                })
            }
            "field" => {
                let tokens = tokenize(rest)?;
                let [path, op, value] = tokens.as_slice() else {
                    bail!("Usage: field <path> ==|!= <value>");
                };
                let op = FieldOperator::from_token(op)
                    .ok_or_else(|| anyhow!("Unknown field operator: {}", op))?;
                Ok(Directive::Field {
                    path: path.clone(),
                    op,
                    value: value.clone(),
                })
            }
            "show" => {
                no_args(rest, "show")?;
                Ok(Directive::Show)
            }
            "render" => {
                let target = match rest.to_lowercase().as_str() {
                    "" | "labels" => RenderTarget::Labels,
                    "fields" => RenderTarget::Fields,
                    "all" => RenderTarget::All,
                    other => bail!("Unknown render target: {} (labels|fields|all)", other),
                };
                Ok(Directive::Render { target })
            }
            "reset" => {
                no_args(rest, "reset")?;
                Ok(Directive::Reset)
            }
            "output" => {
                if rest.is_empty() {
                    bail!("Usage: output <raw|json|yaml>");
                }
                Ok(Directive::Output {
                    format: rest.to_lowercase(),
                })
            }
            "" => bail!("Empty command"),
            other => bail!("Unknown command: {} (try 'help')", other),
        }
    }
}

fn one_key(rest: &str, command: &str) -> Result<String> {
    let tokens = tokenize(rest)?;
    let [key] = tokens.as_slice() else {
        bail!("Usage: {} <key>", command);
    };
    Ok(key.clone())
}

fn key_and_values(rest: &str, command: &str) -> Result<(String, Vec<String>)> {
    let mut tokens = tokenize(rest)?;
    if tokens.is_empty() {
        bail!("Usage: {} <key> [value...]", command);
    }
    let key = tokens.remove(0);
    Ok((key, tokens))
}

fn no_args(rest: &str, command: &str) -> Result<()> {
    if !rest.is_empty() {
        bail!("{} takes no arguments", command);
    }
    Ok(())
}

/// Split a line into whitespace-separated tokens, honoring single and double
/// quotes so values may contain spaces.
fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if let Some(q) = quote {
        bail!("Unclosed {} quote", q);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Directive {
        DirectiveParser::new().parse(line).unwrap()
    }

    #[test]
    fn test_parse_present_and_absent() {
        assert_eq!(
            parse("present app"),
            Directive::Present {
                key: "app".to_string()
            }
        );
        assert_eq!(
            parse("absent legacy"),
            Directive::Absent {
                key: "legacy".to_string()
            }
        );
    }

    #[test]
    fn test_parse_add_with_and_without_values() {
        assert_eq!(
            parse("add foo"),
            Directive::Add {
                key: "foo".to_string(),
                values: vec![]
            }
        );
        assert_eq!(
            parse("add bar a b"),
            Directive::Add {
                key: "bar".to_string(),
                values: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_explicit_operators() {
        assert_eq!(
            parse("in app web api"),
            Directive::In {
                key: "app".to_string(),
                values: vec!["web".to_string(), "api".to_string()]
            }
        );
        // Arity is enforced at execution, not parse
        assert_eq!(
            parse("notin app"),
            Directive::NotIn {
                key: "app".to_string(),
                values: vec![]
            }
        );
    }

    #[test]
    fn test_parse_quoted_values() {
        assert_eq!(
            parse(r#"add note "hello world" 'second value'"#),
            Directive::Add {
                key: "note".to_string(),
                values: vec!["hello world".to_string(), "second value".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_unclosed_quote_is_error() {
        assert!(DirectiveParser::new().parse(r#"add note "oops"#).is_err());
    }

    #[test]
    fn test_parse_raw_takes_rest_of_line() {
        assert_eq!(
            parse("raw x!=y, env in (a, b)"),
            Directive::Raw {
                text: "x!=y, env in (a, b)".to_string()
            }
        );
    }

    #[test]
    fn test_parse_merge_takes_rest_of_line() {
        assert_eq!(
            parse(r#"merge {"bar": ":present"}"#),
            Directive::Merge {
                doc: r#"{"bar": ":present"}"#.to_string()
            }
        );
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse("field status.phase == Running"),
            Directive::Field {
                path: "status.phase".to_string(),
                op: FieldOperator::Equals,
                value: "Running".to_string()
            }
        );
        assert_eq!(
            parse("field spec.nodeName != node-1"),
            Directive::Field {
                path: "spec.nodeName".to_string(),
                op: FieldOperator::NotEquals,
                value: "node-1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_render_targets() {
        assert_eq!(
            parse("render"),
            Directive::Render {
                target: RenderTarget::Labels
            }
        );
        assert_eq!(
            parse("render fields"),
            Directive::Render {
                target: RenderTarget::Fields
            }
        );
        assert_eq!(
            parse("RENDER ALL"),
            Directive::Render {
                target: RenderTarget::All
            }
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(DirectiveParser::new().parse("frobnicate x").is_err());
    }
}
