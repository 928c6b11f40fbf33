// SPDX-License-Identifier: BSD-3-Clause
//! Andersen-style, flow-insensitive points-to analysis.
//!
//! The solver keeps one points-to set per name and a growing set of subset
//! edges between names. Moves contribute edges once, up front. Stores and
//! loads contribute edges that depend on the sets themselves, so they are
//! re-derived on every pass. Sets and the edge set only ever grow, and the
//! universe of locations is bounded by the allocation count, so iteration
//! reaches a fixed point.

use std::fmt::Display;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace_span;

use crate::lang::instruction::{Load, Opcode, Store};
use crate::lang::{Name, Program};

/// The state of the analysis: each name's set of may-point-to locations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointsToEnv {
    sets: FxHashMap<Name, FxHashSet<Name>>,
}

impl PointsToEnv {
    pub fn new() -> Self {
        PointsToEnv::default()
    }

    /// The set of locations `name` may point to, materializing an empty
    /// entry if `name` has not been seen before.
    pub fn points_to(&mut self, name: &Name) -> &FxHashSet<Name> {
        self.sets.entry(name.clone()).or_default()
    }

    /// Unions `additions` into the set for `dst`. Returns true iff the set
    /// grew.
    pub fn merge(&mut self, dst: &Name, additions: impl IntoIterator<Item = Name>) -> bool {
        let set = self.sets.entry(dst.clone()).or_default();
        let mut grew = false;
        for addition in additions {
            grew |= set.insert(addition);
        }
        grew
    }

    /// The recorded set for `name`, without materializing one.
    pub fn get(&self, name: &Name) -> Option<&FxHashSet<Name>> {
        self.sets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &FxHashSet<Name>)> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Drops entries whose sets are empty.
    fn prune(&mut self) {
        self.sets.retain(|_, set| !set.is_empty());
    }
}

/// A subset constraint between two points-to sets: everything `src` may
/// point to, `dst` may point to as well.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Edge {
    pub dst: Name,
    pub src: Name,
}

impl Edge {
    /// Copies the set for `src` into the set for `dst`, materializing both.
    /// Returns true iff the set for `dst` grew.
    pub fn evaluate(&self, env: &mut PointsToEnv) -> bool {
        env.points_to(&self.dst);
        let sources: Vec<Name> = env.points_to(&self.src).iter().cloned().collect();
        env.merge(&self.dst, sources)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Alias({}) >= Alias({})", self.dst, self.src)
    }
}

/// Edges induced by the stores under the current environment: for `*p = v`
/// and each location `t` that `p` may point to, the set for `t` must cover
/// the set for `v`. Edges from a name to itself are skipped.
pub fn store_edges(stores: &[&Store], env: &mut PointsToEnv) -> Vec<Edge> {
    let mut edges = Vec::new();
    for store in stores {
        env.points_to(&store.value);
        let pointees: Vec<Name> = env.points_to(&store.pointer).iter().cloned().collect();
        for target in pointees {
            if target != store.value {
                edges.push(Edge {
                    dst: target,
                    src: store.value.clone(),
                });
            }
        }
    }
    edges
}

/// Edges induced by the loads under the current environment: for `d = *p`
/// and each location `t` that `p` may point to, the set for `d` must cover
/// the set for `t`. Edges from a name to itself are skipped.
pub fn load_edges(loads: &[&Load], env: &mut PointsToEnv) -> Vec<Edge> {
    let mut edges = Vec::new();
    for load in loads {
        env.points_to(&load.dst);
        let pointees: Vec<Name> = env.points_to(&load.pointer).iter().cloned().collect();
        for source in pointees {
            if source != load.dst {
                edges.push(Edge {
                    dst: load.dst.clone(),
                    src: source,
                });
            }
        }
    }
    edges
}

#[derive(Debug)]
pub struct Options {
    /// Collect counts of solver passes, edges, and sets.
    pub metrics: bool,
}

/// Measures of how much work the solver did and how big the result is.
#[derive(Debug)]
pub struct Metrics {
    /// Passes over the edge set before it stabilized.
    pub iterations: usize,
    /// Subset edges at the fixed point, seeded and derived.
    pub edges: usize,
    /// Names with a non-empty points-to set.
    pub variables: usize,
    /// Locations minted by allocations.
    pub references: usize,
}

#[derive(Debug)]
pub struct Output {
    pub points_to: PointsToEnv,
    pub metrics: Option<Metrics>,
}

/// Flow-insensitive points-to analysis.
///
/// Seeds the environment from allocations and the edge set from moves, then
/// alternates re-deriving store and load edges with propagating along every
/// edge until a full pass changes nothing. Entries whose sets end up empty
/// are dropped from the result.
pub fn analysis(program: &Program, opts: &Options) -> Output {
    let mut env = PointsToEnv::new();
    let mut edges: FxHashSet<Edge> = FxHashSet::default();
    let mut stores: Vec<&Store> = Vec::new();
    let mut loads: Vec<&Load> = Vec::new();
    let mut references = 0;
    {
        let span = trace_span!("init");
        let _span = span.enter();
        for inst in program.insts() {
            // No `_` pattern to ensure this is updated if the type changes
            match &inst.opcode {
                Opcode::Alloca(alloca) => {
                    env.merge(&alloca.name, [Name::reference(inst.id)]);
                    references += 1;
                }
                Opcode::Move(mv) => {
                    edges.insert(Edge {
                        dst: mv.dst.clone(),
                        src: mv.src.clone(),
                    });
                }
                Opcode::Store(store) => stores.push(store),
                Opcode::Load(load) => loads.push(load),
                // Arithmetic and branches never move pointers
                Opcode::Add(_)
                | Opcode::Bt(_)
                | Opcode::Geq(_)
                | Opcode::Lth(_)
                | Opcode::Mul(_) => {}
            }
        }
    }

    let mut iterations = 0;
    loop {
        iterations += 1;
        {
            let span = trace_span!("store_edges");
            let _span = span.enter();
            edges.extend(store_edges(&stores, &mut env));
        }
        {
            let span = trace_span!("load_edges");
            let _span = span.enter();
            edges.extend(load_edges(&loads, &mut env));
        }
        let changed = {
            let span = trace_span!("propagate");
            let _span = span.enter();
            let mut changed = false;
            for edge in &edges {
                changed |= edge.evaluate(&mut env);
            }
            changed
        };
        if !changed {
            break;
        }
    }

    env.prune();

    let metrics = opts.metrics.then(|| Metrics {
        iterations,
        edges: edges.len(),
        variables: env.len(),
        references,
    });
    Output {
        points_to: env,
        metrics,
    }
}
