//! CLI subcommand modules.
//!
//! This module contains the implementations for all vigil CLI subcommands.

pub(crate) mod backtest;
pub(crate) mod scores;
pub(crate) mod signal;
pub(crate) mod strategies;
