// SPDX-License-Identifier: BSD-3-Clause
//! The instruction language under analysis: straight-line pointer and
//! arithmetic instructions with explicit branch targets. A [`Program`] owns
//! its instructions and is the only allocator of their ordinals, so programs
//! built independently always number their instructions from zero.

use std::fmt::Display;

pub mod instruction;
mod name;
pub use name::*;

use self::instruction::Opcode;

/// The ordinal of an instruction within its [`Program`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstId(usize);

impl InstId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for InstId {
    fn from(idx: usize) -> Self {
        InstId(idx)
    }
}

impl Display for InstId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Inst {
    pub id: InstId,
    pub opcode: Opcode,
}

impl Display for Inst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.opcode)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Program {
    insts: Vec<Inst>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Appends `opcode`, assigning it the next free ordinal.
    pub fn push(&mut self, opcode: Opcode) -> InstId {
        let id = InstId(self.insts.len());
        self.insts.push(Inst { id, opcode });
        id
    }

    pub fn get(&self, id: InstId) -> Option<&Inst> {
        self.insts.get(id.index())
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::instruction::{Alloca, Move, Opcode};
    use super::{Name, Program};

    #[test]
    fn ordinals_count_from_zero() {
        let mut program = Program::new();
        let i0 = program.push(Opcode::Alloca(Alloca {
            name: Name::from("v"),
        }));
        let i1 = program.push(Opcode::Move(Move {
            dst: Name::from("w"),
            src: Name::from("v"),
        }));
        assert_eq!(0, i0.index());
        assert_eq!(1, i1.index());
        assert_eq!("0: v = alloca", program.get(i0).unwrap().to_string());
        assert_eq!("1: w = move v", program.get(i1).unwrap().to_string());
    }

    #[test]
    fn programs_number_independently() {
        let mut first = Program::new();
        first.push(Opcode::Alloca(Alloca {
            name: Name::from("v"),
        }));
        let mut second = Program::new();
        let id = second.push(Opcode::Alloca(Alloca {
            name: Name::from("v"),
        }));
        assert_eq!(0, id.index());
        assert_eq!(Name::reference(id), "ref_0");
    }
}
