use log::debug;

use super::{format, integer, RunOptions, WandaError, ARROW, CURSOR, DEFINE, END};

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    pattern: Vec<String>,
    replacement: Vec<String>,
}

/// A rewrite found at some position of the redex. `stop` is inclusive.
#[derive(Debug)]
struct Match {
    start: usize,
    stop: usize,
    pattern: Vec<String>,
    replacement: Vec<String>,
    new_rule: Option<Rule>,
}

/// Rewrites `redex` until no position matches. Every call starts with an empty
/// rule set, so nothing carries over between runs.
///
/// There is no step limit: a program that keeps matching never returns.
pub fn evaluate(mut redex: Vec<String>, options: &RunOptions) -> Result<Vec<String>, WandaError> {
    let mut rules: Vec<Rule> = Vec::new();
    let mut index = 0;

    while index < redex.len() {
        let Some(found) = find_match(&rules, &redex, index)? else {
            index += 1;
            continue;
        };

        redex.splice(found.start..=found.stop, found.replacement.iter().cloned());

        if options.trace {
            debug!(
                ":{} -> {}; => {}",
                format(&found.pattern),
                format(&found.replacement),
                format(&redex)
            );
        }

        if let Some(rule) = found.new_rule {
            rules.insert(0, rule);
        }

        index = 0;
    }

    Ok(redex)
}

fn find_match(rules: &[Rule], redex: &[String], i: usize) -> Result<Option<Match>, WandaError> {
    let atom = |offset: usize| redex.get(i + offset).map(String::as_str);
    let (r0, r1, r2, r3) = (atom(0), atom(1), atom(2), atom(3));

    if r0 == Some(CURSOR) && r1 == Some(DEFINE) {
        return define_rule(redex, i).map(Some);
    }

    if let (Some(x), Some(y), Some(CURSOR), Some(op)) = (r0, r1, r2, r3) {
        let value = match (integer(x), integer(y), op) {
            (Some(a), Some(b), "+") => Some(a.checked_add(b)),
            (Some(a), Some(b), "*") => Some(a.checked_mul(b)),
            (Some(a), Some(b), "-") => Some(a.checked_sub(b)),
            _ => None,
        };
        if let Some(value) = value {
            let pattern = atoms(&[x, y, CURSOR, op]);
            let value = value.ok_or_else(|| {
                WandaError::Evaluation(format!("integer overflow in `{}`", format(&pattern)))
            })?;
            return Ok(Some(Match {
                start: i,
                stop: i + 3,
                pattern,
                replacement: atoms(&[value.to_string().as_str(), CURSOR]),
                new_rule: None,
            }));
        }
    }

    if let (Some(x), Some(CURSOR), Some("sgn")) = (r0, r1, r2) {
        if let Some(a) = integer(x) {
            let sign = a.signum().to_string();
            return Ok(Some(Match {
                start: i,
                stop: i + 2,
                pattern: atoms(&[x, CURSOR, "sgn"]),
                replacement: atoms(&[sign.as_str(), CURSOR]),
                new_rule: None,
            }));
        }
    }

    if let (Some(top), Some(CURSOR), Some(word @ ("pop" | "dup"))) = (r0, r1, r2) {
        let replacement = if word == "pop" {
            atoms(&[CURSOR])
        } else {
            atoms(&[top, top, CURSOR])
        };
        return Ok(Some(Match {
            start: i,
            stop: i + 2,
            pattern: atoms(&[top, CURSOR, word]),
            replacement,
            new_rule: None,
        }));
    }

    if let (Some(CURSOR), Some(n)) = (r0, r1) {
        if integer(n).is_some() {
            return Ok(Some(Match {
                start: i,
                stop: i + 1,
                pattern: atoms(&[CURSOR, n]),
                replacement: atoms(&[n, CURSOR]),
                new_rule: None,
            }));
        }
    }

    let rest = &redex[i..];
    Ok(rules
        .iter()
        .find(|rule| rest.starts_with(&rule.pattern))
        .map(|rule| Match {
            start: i,
            stop: i + rule.pattern.len() - 1,
            pattern: rule.pattern.clone(),
            replacement: rule.replacement.clone(),
            new_rule: None,
        }))
}

/// Consumes `$ : pattern -> replacement ;` starting at `i`, leaving `$` behind.
fn define_rule(redex: &[String], i: usize) -> Result<Match, WandaError> {
    let mut pattern = Vec::new();
    let mut replacement = Vec::new();
    let mut seen_arrow = false;

    let mut j = i + 2;
    while j < redex.len() && redex[j] != END {
        if redex[j] == ARROW {
            seen_arrow = true;
        } else if seen_arrow {
            replacement.push(redex[j].clone());
        } else {
            pattern.push(redex[j].clone());
        }
        j += 1;
    }

    if pattern.is_empty() {
        return Err(WandaError::Evaluation(format!(
            "rule defined at position {i} has an empty pattern"
        )));
    }

    Ok(Match {
        start: i,
        // An unterminated definition swallows the rest of the redex.
        stop: j.min(redex.len() - 1),
        pattern: atoms(&[CURSOR, DEFINE, "...", END]),
        replacement: atoms(&[CURSOR]),
        new_rule: Some(Rule {
            pattern,
            replacement,
        }),
    })
}

fn atoms(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
