use std::sync::OnceLock;

use regex::Regex;

/// Matches `{{ scope.NAME }}` with an optional `| default("value")` pipe
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// A placeholder may carry a fallback, `{{ env.VAR | default("value") }}`,
/// used when the variable is unset. Expansion runs on the raw text before
/// deserialization; lines that are TOML comments pass through unchanged.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
        } else {
            expand_line(line, &mut output)?;
        }
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str, output: &mut String) -> Result<(), String> {
    let mut last_end = 0;

    for captures in placeholder_re().captures_iter(line) {
        let overall = captures.get(0).unwrap();
        let key = captures.get(1).unwrap().as_str();
        let fallback = captures.get(2).map(|m| m.as_str());

        let Some(var_name) = key.strip_prefix("env.") else {
            return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
        };

        output.push_str(&line[last_end..overall.start()]);

        match std::env::var(var_name) {
            Ok(value) => output.push_str(&value),
            Err(_) => match fallback {
                Some(value) => output.push_str(value),
                None => return Err(format!("environment variable not found: `{var_name}`")),
            },
        }

        last_end = overall.end();
    }

    output.push_str(&line[last_end..]);
    Ok(())
}
