// SPDX-License-Identifier: BSD-3-Clause
//! Concrete semantics for the instruction language. The environment is a
//! stack of bindings: reassigning a variable shadows the old binding rather
//! than replacing it, so a finished run still shows the whole history of the
//! state. The storage names its cells after the allocation site that minted
//! them plus a running counter, one fresh cell per execution of the site.

use std::fmt::Display;

use rustc_hash::FxHashMap;

use crate::lang::instruction::Opcode;
use crate::lang::{Inst, InstId, Name, Program};

#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, thiserror::Error)]
pub struct Error(pub String);

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Evaluation error: {}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Ref(Name),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Ref(location) => write!(f, "{location}"),
        }
    }
}

/// Variable bindings, newest on top.
#[derive(Clone, Debug, Default)]
pub struct Env {
    bindings: Vec<(Name, Value)>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    pub fn set(&mut self, var: Name, value: Value) {
        self.bindings.push((var, value));
    }

    /// The most recent binding of `var`.
    pub fn get(&self, var: &Name) -> Result<&Value, Error> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == var)
            .map(|(_, value)| value)
            .ok_or_else(|| Error(format!("Absent key {var}")))
    }

    /// All bindings, newest first.
    pub fn bindings(&self) -> impl Iterator<Item = &(Name, Value)> {
        self.bindings.iter().rev()
    }
}

/// Memory cells, keyed by dynamic location name.
#[derive(Clone, Debug, Default)]
pub struct Storage {
    cells: FxHashMap<Name, Option<Value>>,
    counter: usize,
}

impl Storage {
    pub fn new() -> Self {
        Storage::default()
    }

    /// Mints the location `ref_<site>_<counter>` and an uninitialized cell
    /// for it.
    pub fn alloca(&mut self, site: InstId) -> Name {
        let location = Name::location(site, self.counter);
        self.counter += 1;
        self.cells.insert(location.clone(), None);
        location
    }

    pub fn store(&mut self, location: &Name, value: Value) {
        self.cells.insert(location.clone(), Some(value));
    }

    pub fn load(&self, location: &Name) -> Result<&Value, Error> {
        match self.cells.get(location) {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(Error(format!("Uninitialized location {location}"))),
            None => Err(Error(format!("Absent location {location}"))),
        }
    }

    /// All cells, sorted by location name.
    pub fn cells(&self) -> Vec<(&Name, Option<&Value>)> {
        let mut cells: Vec<_> = self
            .cells
            .iter()
            .map(|(location, value)| (location, value.as_ref()))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(b.0));
        cells
    }
}

/// Runs `program` from its first instruction until control falls past the
/// end, threading `env` through a fresh storage.
pub fn run(program: &Program, env: Env) -> Result<(Env, Storage), Error> {
    let mut env = env;
    let mut storage = Storage::new();
    let mut pc = 0;
    while let Some(inst) = program.get(InstId::from(pc)) {
        pc = step(inst, &mut env, &mut storage)?;
    }
    Ok((env, storage))
}

fn step(inst: &Inst, env: &mut Env, storage: &mut Storage) -> Result<usize, Error> {
    let next = inst.id.index() + 1;
    // No `_` pattern to ensure this is updated if the type changes
    match &inst.opcode {
        Opcode::Add(a) => {
            let sum = int(env, &a.operand0)?
                .checked_add(int(env, &a.operand1)?)
                .ok_or_else(|| Error(format!("Integer overflow at {inst}")))?;
            env.set(a.dst.clone(), Value::Int(sum));
        }
        Opcode::Alloca(a) => {
            let location = storage.alloca(inst.id);
            env.set(a.name.clone(), Value::Ref(location));
        }
        Opcode::Bt(b) => {
            if truthy(env.get(&b.cond)?) {
                return Ok(b.target.index());
            }
        }
        Opcode::Geq(g) => {
            let holds = int(env, &g.operand0)? >= int(env, &g.operand1)?;
            env.set(g.dst.clone(), Value::Bool(holds));
        }
        Opcode::Load(l) => {
            let value = storage.load(reference(env, &l.pointer)?)?.clone();
            env.set(l.dst.clone(), value);
        }
        Opcode::Lth(l) => {
            let holds = int(env, &l.operand0)? < int(env, &l.operand1)?;
            env.set(l.dst.clone(), Value::Bool(holds));
        }
        Opcode::Move(m) => {
            let value = env.get(&m.src)?.clone();
            env.set(m.dst.clone(), value);
        }
        Opcode::Mul(m) => {
            let product = int(env, &m.operand0)?
                .checked_mul(int(env, &m.operand1)?)
                .ok_or_else(|| Error(format!("Integer overflow at {inst}")))?;
            env.set(m.dst.clone(), Value::Int(product));
        }
        Opcode::Store(s) => {
            let location = reference(env, &s.pointer)?.clone();
            let value = env.get(&s.value)?.clone();
            storage.store(&location, value);
        }
    }
    Ok(next)
}

fn int(env: &Env, var: &Name) -> Result<i64, Error> {
    match env.get(var)? {
        Value::Int(i) => Ok(*i),
        value => Err(Error(format!("{var} holds {value}, not an integer"))),
    }
}

fn reference<'env>(env: &'env Env, var: &Name) -> Result<&'env Name, Error> {
    match env.get(var)? {
        Value::Ref(location) => Ok(location),
        value => Err(Error(format!("{var} holds {value}, not a reference"))),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Ref(_) => true,
    }
}
