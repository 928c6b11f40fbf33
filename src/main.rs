// SPDX-License-Identifier: BSD-3-Clause
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use tracing_flame::FlameLayer;
use tracing_subscriber::{fmt, prelude::*};

use tinypta::{alias, interp, parser};

mod cli;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn setup_global_subscriber() -> impl Drop {
    let filter_layer = tracing::level_filters::LevelFilter::TRACE;
    let fmt_layer = fmt::Layer::default();
    let (flame_layer, _guard) = FlameLayer::with_file("./tracing.folded").unwrap();
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(flame_layer)
        .with(tinypta::layers::NanoCountLayer::default())
        .init();
    _guard
}

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let args = cli::Args::parse();

    if args.tracing {
        setup_global_subscriber();
    }

    let program_string = std::fs::read_to_string(&args.program)
        .with_context(|| format!("Couldn't read program at {}", args.program.display()))?;
    let (env, program) = parser::parse(&program_string)
        .with_context(|| format!("Couldn't parse program at {}", args.program.display()))?;

    if args.concrete {
        let (env, storage) = interp::run(&program, env).context("Program evaluation failed")?;
        if !args.quiet {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "bindings")?;
            writeln!(stdout, "--------")?;
            for (var, value) in env.bindings() {
                writeln!(stdout, "{} = {}", var, value)?;
            }
            writeln!(stdout)?;
            writeln!(stdout, "storage")?;
            writeln!(stdout, "-------")?;
            for (location, cell) in storage.cells() {
                match cell {
                    Some(value) => writeln!(stdout, "{} = {}", location, value)?,
                    None => writeln!(stdout, "{} = <uninitialized>", location)?,
                }
            }
        }
        return Ok(());
    }

    let opts = alias::Options {
        metrics: args.metrics,
    };
    let outs = alias::analysis(&program, &opts);

    if !args.quiet {
        let mut stdout = io::stdout().lock();
        if outs.points_to.is_empty() {
            writeln!(stdout, "The program has no memory allocation.")?;
        } else {
            writeln!(stdout, "points_to")?;
            writeln!(stdout, "---------")?;
            let mut entries: Vec<_> = outs.points_to.iter().collect();
            entries.sort_by(|l, r| l.0.cmp(r.0));
            for (var, refs) in entries {
                let mut refs: Vec<_> = refs.iter().collect();
                refs.sort();
                for reference in refs {
                    writeln!(stdout, "{} --> {}", var, reference)?;
                }
            }
        }
    }

    if args.metrics {
        let mut stdout = io::stdout().lock();
        if let Some(m) = outs.metrics {
            writeln!(stdout)?;
            writeln!(stdout, "metrics")?;
            writeln!(stdout, "-------")?;
            writeln!(stdout, "iterations: {}", m.iterations)?;
            writeln!(stdout, "edges: {}", m.edges)?;
            writeln!(stdout, "variables: {}", m.variables)?;
            writeln!(stdout, "references: {}", m.references)?;
        }
    }

    Ok(())
}
