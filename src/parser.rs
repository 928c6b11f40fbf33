// SPDX-License-Identifier: BSD-3-Clause
//! Textual front end. The first line of a program is a JSON object giving
//! the initial environment; every following non-blank line is one
//! instruction:
//!
//! ```text
//! {"zero": 0, "one": 1}
//! v = alloca
//! *v = one
//! w = *v
//! x = add w one
//! b = lth x one
//! bt b 2
//! ```
//!
//! Branch targets are instruction ordinals, counted from zero over the
//! instruction lines.

use std::collections::BTreeMap;

use regex::Regex;

use crate::interp::{Env, Value};
use crate::lang::instruction::{Add, Alloca, Bt, Geq, Load, Lth, Move, Mul, Opcode, Store};
use crate::lang::{InstId, Name, Program};

#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, thiserror::Error)]
pub struct Error(pub String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Malformed program: {}", self.0)
    }
}

const STORE: &str = r"\s*\*\s*([a-zA-Z][a-zA-Z0-9]*)\s*=\s*([a-zA-Z][a-zA-Z0-9]*)";
const LOAD: &str = r"([a-zA-Z][a-zA-Z0-9]*)\s*=\s*\*\s*([a-zA-Z][a-zA-Z0-9]*)";

/// An initial binding from the JSON header line.
#[derive(Clone, Copy, Debug, serde::Deserialize)]
#[serde(untagged)]
enum Init {
    Bool(bool),
    Int(i64),
}

fn parse_env(header: &str) -> Result<Env, Error> {
    let bindings: BTreeMap<String, Init> = serde_json::from_str(header)
        .map_err(|_| Error(format!("Invalid environment: {header}")))?;
    let mut env = Env::new();
    for (var, init) in bindings {
        let value = match init {
            Init::Bool(b) => Value::Bool(b),
            Init::Int(i) => Value::Int(i),
        };
        env.set(Name::from(var), value);
    }
    Ok(env)
}

struct InstParser {
    store: Regex,
    load: Regex,
}

impl InstParser {
    fn new() -> Self {
        InstParser {
            store: Regex::new(STORE).unwrap(),
            load: Regex::new(LOAD).unwrap(),
        }
    }

    /// Instructions with an opcode token are dispatched on that token; the
    /// store and load forms (`*p = s`, `d = *p`) have none and are matched
    /// by pattern.
    fn parse(&self, line: &str) -> Result<Opcode, Error> {
        let invalid = || Error(format!("Invalid instruction: {}", line.trim()));
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [dst, "=", "add", operand0, operand1] => Ok(Opcode::Add(Add {
                dst: Name::from(*dst),
                operand0: Name::from(*operand0),
                operand1: Name::from(*operand1),
            })),
            [dst, "=", "mul", operand0, operand1] => Ok(Opcode::Mul(Mul {
                dst: Name::from(*dst),
                operand0: Name::from(*operand0),
                operand1: Name::from(*operand1),
            })),
            [dst, "=", "lth", operand0, operand1] => Ok(Opcode::Lth(Lth {
                dst: Name::from(*dst),
                operand0: Name::from(*operand0),
                operand1: Name::from(*operand1),
            })),
            [dst, "=", "geq", operand0, operand1] => Ok(Opcode::Geq(Geq {
                dst: Name::from(*dst),
                operand0: Name::from(*operand0),
                operand1: Name::from(*operand1),
            })),
            ["bt", cond, target] => {
                let target = target.parse::<usize>().map_err(|_| invalid())?;
                Ok(Opcode::Bt(Bt {
                    cond: Name::from(*cond),
                    target: InstId::from(target),
                }))
            }
            [dst, "=", "move", src] => Ok(Opcode::Move(Move {
                dst: Name::from(*dst),
                src: Name::from(*src),
            })),
            [dst, "=", "alloca"] => Ok(Opcode::Alloca(Alloca {
                name: Name::from(*dst),
            })),
            _ => {
                if let Some(captures) = self.store.captures(line) {
                    Ok(Opcode::Store(Store {
                        pointer: Name::from(&captures[1]),
                        value: Name::from(&captures[2]),
                    }))
                } else if let Some(captures) = self.load.captures(line) {
                    Ok(Opcode::Load(Load {
                        dst: Name::from(&captures[1]),
                        pointer: Name::from(&captures[2]),
                    }))
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

/// Parses a whole program: the environment header, then one instruction per
/// line. Blank lines are skipped. Branch targets are checked against the
/// final instruction count.
pub fn parse(input: &str) -> Result<(Env, Program), Error> {
    let mut lines = input.lines();
    let header = lines
        .next()
        .ok_or_else(|| Error("Missing environment line".to_string()))?;
    let env = parse_env(header)?;

    let inst_parser = InstParser::new();
    let mut program = Program::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        program.push(inst_parser.parse(line)?);
    }

    for inst in program.insts() {
        if let Opcode::Bt(bt) = &inst.opcode {
            if program.get(bt.target).is_none() {
                return Err(Error(format!("Invalid branch target: {}", inst)));
            }
        }
    }

    Ok((env, program))
}
