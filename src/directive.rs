use crate::error::{Error, Result};
use crate::registry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Directive values keyed by registry name. Later occurrences overwrite
/// earlier ones.
pub(crate) type DirectiveValues = HashMap<&'static str, String>;

static DIRECTIVE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^~([a-zA-Z_][a-zA-Z0-9_]*)\s*"([^"]*)"$"#).expect("directive pattern"));

static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^---(.*)$").expect("comment pattern"));

/// Parses the contents of a directive file.
///
/// Each trimmed, non-empty line must match one of the two whole-line forms:
/// a directive (`~name "text"`) or a comment (`--- ...`). The matchers are
/// applied in that priority order. A `--- help` comment prints the help text
/// and parsing continues. Lines are reported 1-indexed.
///
/// The mandatory-directive check is separate; see [`check_mandatory`].
pub(crate) fn parse(input: &str) -> Result<DirectiveValues> {
    let mut values = DirectiveValues::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let number = idx + 1;

        if let Some(captures) = DIRECTIVE_LINE.captures(line) {
            let name = &captures[1];
            let Some(spec) = registry::lookup(name) else {
                return Err(Error::UnknownDirective {
                    name: name.to_string(),
                    line: number,
                });
            };
            values.insert(spec.name, captures[2].to_string());
            continue;
        }

        let Some(captures) = COMMENT_LINE.captures(line) else {
            return Err(Error::UnexpectedLine {
                line: number,
                text: line.to_string(),
            });
        };
        if captures[1].trim() == "help" {
            println!("{}", registry::render_help());
        }
    }

    Ok(values)
}

/// Fails with the first mandatory directive that is still unset, checked
/// once after the whole file has been consumed.
pub(crate) fn check_mandatory(values: &DirectiveValues) -> Result<()> {
    for spec in registry::DIRECTIVES {
        if spec.mandatory && !values.contains_key(spec.name) {
            return Err(Error::MissingDirective { name: spec.name });
        }
    }
    Ok(())
}
