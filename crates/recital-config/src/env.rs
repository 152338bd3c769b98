use std::sync::OnceLock;

use regex::{Captures, Regex};

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.VAR }}` with an optional `| default("fallback")` clause
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// When the variable is unset, an optional `{{ env.VAR | default("x") }}`
/// fallback is substituted instead of failing. Comment lines are passed
/// through untouched so commented-out secrets don't have to resolve.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut missing: Option<String> = None;

    let expanded = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }

            placeholder_re()
                .replace_all(line, |caps: &Captures<'_>| {
                    let var = &caps[1];
                    match std::env::var(var) {
                        Ok(value) => value,
                        Err(_) => match caps.get(2) {
                            Some(default) => default.as_str().to_string(),
                            None => {
                                missing.get_or_insert_with(|| var.to_string());
                                String::new()
                            }
                        },
                    }
                })
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n");

    if let Some(var) = missing {
        return Err(format!("environment variable not found: `{var}`"));
    }

    if input.ends_with('\n') {
        Ok(expanded + "\n")
    } else {
        Ok(expanded)
    }
}
