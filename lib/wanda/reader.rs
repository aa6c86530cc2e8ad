use super::{integer, WandaError, ARROW, CURSOR, DEFINE, END};

const OPERATOR_CHARS: &str = "+-*/<>=!%^&|~@#";

/// Splits source text into atoms and checks that every atom is well formed and
/// every rule definition is closed.
pub fn parse(text: &str) -> Result<Vec<String>, WandaError> {
    let atoms: Vec<String> = text.split_whitespace().map(str::to_string).collect();

    for (position, atom) in atoms.iter().enumerate() {
        check_atom(atom, position)?;
    }
    check_definitions(&atoms)?;

    Ok(atoms)
}

fn check_atom(atom: &str, position: usize) -> Result<(), WandaError> {
    if [CURSOR, DEFINE, ARROW, END].contains(&atom) || is_word(atom) || is_operator(atom) {
        return Ok(());
    }
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return match integer(atom) {
            Some(_) => Ok(()),
            None => Err(WandaError::Parse(format!(
                "integer `{atom}` at position {position} is out of range"
            ))),
        };
    }
    Err(WandaError::Parse(format!(
        "malformed atom `{atom}` at position {position}"
    )))
}

fn is_word(atom: &str) -> bool {
    let mut chars = atom.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || "_/?!'.-".contains(c))
}

fn is_operator(atom: &str) -> bool {
    !atom.is_empty() && atom.chars().all(|c| OPERATOR_CHARS.contains(c))
}

struct OpenDefinition {
    start: usize,
    pattern_len: usize,
    seen_arrow: bool,
}

fn check_definitions(atoms: &[String]) -> Result<(), WandaError> {
    let mut open: Option<OpenDefinition> = None;

    for (position, atom) in atoms.iter().enumerate() {
        match atom.as_str() {
            DEFINE => {
                if let Some(definition) = &open {
                    return Err(WandaError::Parse(format!(
                        "nested rule definition at position {position} (opened at position {})",
                        definition.start
                    )));
                }
                open = Some(OpenDefinition {
                    start: position,
                    pattern_len: 0,
                    seen_arrow: false,
                });
            }
            ARROW => match open.as_mut() {
                None => {
                    return Err(WandaError::Parse(format!(
                        "`->` outside of a rule definition at position {position}"
                    )))
                }
                Some(definition) if definition.seen_arrow => {
                    return Err(WandaError::Parse(format!(
                        "second `->` in rule definition at position {position}"
                    )))
                }
                Some(definition) => {
                    if definition.pattern_len == 0 {
                        return Err(empty_pattern(definition.start));
                    }
                    definition.seen_arrow = true;
                }
            },
            END => match open.take() {
                None => {
                    return Err(WandaError::Parse(format!(
                        "`;` without a rule definition at position {position}"
                    )))
                }
                Some(definition) if definition.pattern_len == 0 => {
                    return Err(empty_pattern(definition.start))
                }
                Some(_) => {}
            },
            _ => {
                if let Some(definition) = open.as_mut().filter(|d| !d.seen_arrow) {
                    definition.pattern_len += 1;
                }
            }
        }
    }

    match open {
        Some(definition) => Err(WandaError::Parse(format!(
            "unterminated rule definition at position {}",
            definition.start
        ))),
        None => Ok(()),
    }
}

fn empty_pattern(start: usize) -> WandaError {
    WandaError::Parse(format!("empty rule pattern at position {start}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        let atoms = parse("  $ 2\n3\t+ \r\n").unwrap();
        assert_eq!(atoms, vec!["$", "2", "3", "+"]);
        assert!(parse("").unwrap().is_empty());
        assert!(parse(" \n ").unwrap().is_empty());
    }

    #[test]
    fn accepts_well_formed_atoms() {
        let source = "$ : $ fact -> $ dup sgn fact/sgn ; -12 0 + - * <= zero? _tmp x'";
        let atoms = parse(source).unwrap();
        assert_eq!(atoms.len(), 19);
    }

    #[test]
    fn rejects_malformed_atoms() {
        let cases = vec![
            ("!!!not a program", "parse error: malformed atom `!!!not` at position 0"),
            ("$ 1 2x", "parse error: malformed atom `2x` at position 2"),
            ("$ -x", "parse error: malformed atom `-x` at position 1"),
            ("$$", "parse error: malformed atom `$$` at position 0"),
            ("(1)", "parse error: malformed atom `(1)` at position 0"),
            ("$ café", "parse error: malformed atom `café` at position 1"),
            (
                "$ 99999999999999999999",
                "parse error: integer `99999999999999999999` at position 1 is out of range",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(parse(input).unwrap_err().to_string(), expected, "input: {input}");
        }
    }

    #[test]
    fn rejects_broken_definitions() {
        let cases = vec![
            ("$ : a -> b", "unterminated rule definition at position 1"),
            ("$ : a : b ;", "nested rule definition at position 3 (opened at position 1)"),
            ("$ a -> b", "`->` outside of a rule definition at position 2"),
            ("$ a ;", "`;` without a rule definition at position 2"),
            ("$ : -> b ;", "empty rule pattern at position 1"),
            ("$ : ;", "empty rule pattern at position 1"),
            ("$ : a -> b -> c ;", "second `->` in rule definition at position 5"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                parse(input).unwrap_err(),
                WandaError::Parse(expected.to_string()),
                "input: {input}"
            );
        }
    }

    #[test]
    fn definitions_may_omit_the_arrow() {
        assert_eq!(parse("$ : forget me ;").unwrap().len(), 5);
    }
}
