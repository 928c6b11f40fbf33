// SPDX-License-Identifier: BSD-3-Clause
use std::path::PathBuf;

/// Points-to analysis for a tiny pointer language
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Run the program concretely instead of analyzing it
    #[arg(long)]
    pub concrete: bool,

    /// Collect and report solver metrics
    #[arg(long)]
    pub metrics: bool,

    /// Program to analyze
    #[arg()]
    pub program: PathBuf,

    /// Quiet
    #[arg(long)]
    pub quiet: bool,

    /// Tracing
    #[arg(long)]
    pub tracing: bool,
}
