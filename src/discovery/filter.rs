use regex::Regex;

use crate::errors::Error;

/// Comma-separated, OR-combined name patterns selecting which running nodes
/// are reported on. `*` matches any run of characters, `?` a single one;
/// everything else matches literally.
#[derive(Debug, Clone)]
pub struct HostFilter {
    patterns: Vec<Regex>,
}

impl HostFilter {
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let mut patterns = Vec::new();
        for term in expression.split(',') {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            patterns.push(pattern_to_regex(term)?);
        }

        if patterns.is_empty() {
            return Err(Error::InvalidConfigValue {
                name: "NODE_FILTER",
                reason: format!("'{expression}' contains no name patterns"),
            });
        }
        Ok(Self { patterns })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

fn pattern_to_regex(pattern: &str) -> Result<Regex, Error> {
    let mut expression = String::with_capacity(pattern.len() + 2);
    expression.push('^');
    for character in pattern.chars() {
        match character {
            '*' => expression.push_str(".*"),
            '?' => expression.push('.'),
            literal => expression.push_str(&regex::escape(&literal.to_string())),
        }
    }
    expression.push('$');

    Regex::new(&expression).map_err(|error| Error::InvalidConfigValue {
        name: "NODE_FILTER",
        reason: format!("pattern '{pattern}': {error}"),
    })
}
