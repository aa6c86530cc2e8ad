use anyhow::{anyhow, bail, Result};

use super::object::{Builtin, Object};
use crate::wanda::{self, RunOptions};

pub struct Builtins;

impl Builtins {
    pub fn get() -> Vec<(&'static str, Builtin)> {
        vec![
            ("parse", Self::parse_fn as Builtin),
            ("evaluate", Self::evaluate_fn as Builtin),
            ("format", Self::format_fn as Builtin),
        ]
    }

    // Stage failures are returned as `WandaError` inside the `anyhow::Error` so
    // the bridge can tell them apart from misuse of the builtins themselves.

    fn parse_fn(args: Vec<Object>) -> Result<Object> {
        if args.len() != 1 {
            bail!(
                "wrong number of arguments for parse: want=1, got={}",
                args.len()
            );
        }

        match args.first() {
            Some(Object::String(text)) => {
                let atoms = wanda::parse(text)?;
                Ok(Object::Array(atoms.into_iter().map(Object::String).collect()))
            }
            Some(other) => Err(anyhow!(
                "argument to `parse` must be string, got {}",
                other.type_name()
            )),
            None => Err(anyhow!("argument to `parse` not provided")),
        }
    }

    fn evaluate_fn(args: Vec<Object>) -> Result<Object> {
        if args.is_empty() || args.len() > 2 {
            bail!(
                "wrong number of arguments for evaluate: want=1 or 2, got={}",
                args.len()
            );
        }

        let mut args = args.into_iter();
        let redex = match args.next() {
            Some(Object::Array(elements)) => elements
                .into_iter()
                .map(|element| match element {
                    Object::String(atom) => Ok(atom),
                    other => Err(anyhow!(
                        "program passed to `evaluate` must hold strings, got {}",
                        other.type_name()
                    )),
                })
                .collect::<Result<Vec<String>>>()?,
            Some(other) => bail!(
                "argument to `evaluate` must be array, got {}",
                other.type_name()
            ),
            None => bail!("argument to `evaluate` not provided"),
        };
        let options = Self::run_options(args.next())?;

        let result = wanda::evaluate(redex, &options)?;
        Ok(Object::Array(result.into_iter().map(Object::String).collect()))
    }

    fn format_fn(args: Vec<Object>) -> Result<Object> {
        if args.len() != 1 {
            bail!(
                "wrong number of arguments for format: want=1, got={}",
                args.len()
            );
        }

        match args.first() {
            Some(Object::Array(elements)) => {
                let atoms: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                Ok(Object::String(wanda::format(&atoms)))
            }
            Some(other) => Ok(Object::String(other.to_string())),
            None => Err(anyhow!("argument to `format` not provided")),
        }
    }

    fn run_options(env: Option<Object>) -> Result<RunOptions> {
        let mut options = RunOptions::default();
        let hash = match env {
            None | Some(Object::Null) => return Ok(options),
            Some(Object::Hash(hash)) => hash,
            Some(other) => bail!(
                "environment passed to `evaluate` must be hash, got {}",
                other.type_name()
            ),
        };
        for (key, value) in hash {
            match (&key, value) {
                (Object::String(name), Object::Boolean(trace)) if name == "trace" => {
                    options.trace = trace
                }
                (Object::String(name), other) if name == "trace" => bail!(
                    "option `trace` must be boolean, got {}",
                    other.type_name()
                ),
                _ => bail!("unknown option {} for `evaluate`", key),
            }
        }
        Ok(options)
    }
}
