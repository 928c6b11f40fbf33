// SPDX-License-Identifier: BSD-3-Clause
//! Andersen-style points-to analysis for a tiny pointer language.
//!
//! Programs are parsed from a small textual format ([`parser`]), can be run
//! directly ([`interp`]), and can be analyzed for aliasing without running
//! them ([`analysis::alias`]).

pub mod analysis;
pub mod interp;
pub mod lang;
pub mod layers;
pub mod parser;

pub use analysis::alias;
pub use lang::{Inst, InstId, Name, Program};
