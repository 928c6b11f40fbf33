// SPDX-License-Identifier: BSD-3-Clause
//! Extra [`tracing_subscriber::Layer`]s.

mod nanos;

pub use nanos::*;
