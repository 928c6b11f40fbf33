// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

use super::name::Name;
use super::InstId;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Add {
    pub dst: Name,
    pub operand0: Name,
    pub operand1: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Alloca {
    pub name: Name,
}

/// Branch to `target` when `cond` holds, fall through otherwise.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Bt {
    pub cond: Name,
    pub target: InstId,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Geq {
    pub dst: Name,
    pub operand0: Name,
    pub operand1: Name,
}

/// Indirect read: `dst = *pointer`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Load {
    pub dst: Name,
    pub pointer: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Lth {
    pub dst: Name,
    pub operand0: Name,
    pub operand1: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Move {
    pub dst: Name,
    pub src: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Mul {
    pub dst: Name,
    pub operand0: Name,
    pub operand1: Name,
}

/// Indirect write: `*pointer = value`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Store {
    pub pointer: Name,
    pub value: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Opcode {
    Add(Add),
    Alloca(Alloca),
    Bt(Bt),
    Geq(Geq),
    Load(Load),
    Lth(Lth),
    Move(Move),
    Mul(Mul),
    Store(Store),
}

impl Opcode {
    /// The variable this instruction defines, if any. A store defines
    /// nothing: it writes through its pointer operand.
    pub fn defines(&self) -> Option<&Name> {
        match self {
            Opcode::Add(a) => Some(&a.dst),
            Opcode::Alloca(a) => Some(&a.name),
            Opcode::Bt(_) => None,
            Opcode::Geq(g) => Some(&g.dst),
            Opcode::Load(l) => Some(&l.dst),
            Opcode::Lth(l) => Some(&l.dst),
            Opcode::Move(m) => Some(&m.dst),
            Opcode::Mul(m) => Some(&m.dst),
            Opcode::Store(_) => None,
        }
    }

    /// The values this instruction reads out of the environment.
    pub fn uses(&self) -> Vec<&Name> {
        match self {
            Opcode::Add(a) => vec![&a.operand0, &a.operand1],
            Opcode::Alloca(_) => vec![],
            Opcode::Bt(b) => vec![&b.cond],
            Opcode::Geq(g) => vec![&g.operand0, &g.operand1],
            Opcode::Load(l) => vec![&l.pointer],
            Opcode::Lth(l) => vec![&l.operand0, &l.operand1],
            Opcode::Move(m) => vec![&m.src],
            Opcode::Mul(m) => vec![&m.operand0, &m.operand1],
            Opcode::Store(s) => vec![&s.value],
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Add(a) => write!(f, "{} = add {} {}", a.dst, a.operand0, a.operand1),
            Opcode::Alloca(a) => write!(f, "{} = alloca", a.name),
            Opcode::Bt(b) => write!(f, "bt {} {}", b.cond, b.target),
            Opcode::Geq(g) => write!(f, "{} = geq {} {}", g.dst, g.operand0, g.operand1),
            Opcode::Load(l) => write!(f, "{} = *{}", l.dst, l.pointer),
            Opcode::Lth(l) => write!(f, "{} = lth {} {}", l.dst, l.operand0, l.operand1),
            Opcode::Move(m) => write!(f, "{} = move {}", m.dst, m.src),
            Opcode::Mul(m) => write!(f, "{} = mul {} {}", m.dst, m.operand0, m.operand1),
            Opcode::Store(s) => write!(f, "*{} = {}", s.pointer, s.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_branches_define_nothing() {
        let store = Opcode::Store(Store {
            pointer: Name::from("p"),
            value: Name::from("v"),
        });
        assert_eq!(None, store.defines());
        assert_eq!(vec![&Name::from("v")], store.uses());

        let bt = Opcode::Bt(Bt {
            cond: Name::from("c"),
            target: InstId::from(0),
        });
        assert_eq!(None, bt.defines());
        assert_eq!(vec![&Name::from("c")], bt.uses());
    }

    #[test]
    fn everything_else_defines_its_destination() {
        let load = Opcode::Load(Load {
            dst: Name::from("d"),
            pointer: Name::from("p"),
        });
        assert_eq!(Some(&Name::from("d")), load.defines());
        assert_eq!(vec![&Name::from("p")], load.uses());

        let add = Opcode::Add(Add {
            dst: Name::from("z"),
            operand0: Name::from("x"),
            operand1: Name::from("y"),
        });
        assert_eq!(Some(&Name::from("z")), add.defines());
        assert_eq!(vec![&Name::from("x"), &Name::from("y")], add.uses());

        let alloca = Opcode::Alloca(Alloca {
            name: Name::from("v"),
        });
        assert_eq!(Some(&Name::from("v")), alloca.defines());
        assert!(alloca.uses().is_empty());
    }
}
