//! LALR(1) Parser Table-Construction Core
//!
//! A from-scratch Rust implementation of the classical yacc/bison table
//! construction pipeline: a reduced grammar goes in, ACTION/GOTO tables and
//! a conflict report come out.
//!
//! This implementation provides:
//! - Packed bitset utilities and Warshall's transitive-closure algorithm
//! - Epsilon-Free-Firsts, FirstDerives, and the LR(0) closure engine
//! - Canonical LR(0) automaton construction
//! - The DeRemer-Pennello LALR(1) lookahead solver
//! - Conflict resolution and ACTION/GOTO table emission
//! - A pluggable verbose-dump trace sink and a `clap`-driven CLI
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! DeRemer, Frank and Pennello, Thomas. "Efficient Computation of LALR(1)
//! Look-Ahead Sets." ACM TOPLAS 4.4 (1982).
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

pub mod bitset;
pub mod cli;
pub mod closure;
pub mod error;
pub mod grammar;
pub mod lalr;
pub mod lr0;
pub mod nullable;
pub mod symbol;
pub mod table;
pub mod verbose;

// Re-export commonly used types.
pub use error::{GrammarError, Result};
pub use grammar::Grammar;
pub use lalr::Lookaheads;
pub use lr0::Lr0Automaton;
pub use symbol::Symbol;
pub use table::{Conflicts, Tables};

/// Runs the full pipeline on a reduced grammar: nullable set, EFF,
/// FirstDerives, the LR(0) automaton, LALR(1) lookaheads, and finally the
/// ACTION/GOTO tables with their conflict report.
///
/// Mirrors the stage order of `cli::run`, factored out so library callers
/// don't have to re-assemble it themselves.
pub fn compile(grammar: &Grammar) -> (Lr0Automaton, Tables, Conflicts) {
    let eff = closure::compute_eff(grammar);
    let first_derives = closure::compute_first_derives(grammar, &eff);
    drop(eff);
    log::trace!("EFF/FirstDerives computed");

    let automaton = lr0::build(grammar, &first_derives);
    log::debug!("LR(0) automaton stabilized at {} states", automaton.states.len());

    let nullable = nullable::compute_nullable(grammar);
    let lookaheads = lalr::compute(grammar, &automaton, &nullable);
    log::trace!("lookahead closure converged");

    let (tables, conflicts) = table::build(grammar, &automaton, &lookaheads);
    log::debug!(
        "tables emitted: {} shift/reduce, {} reduce/reduce conflicts",
        conflicts.shift_reduce,
        conflicts.reduce_reduce
    );

    (automaton, tables, conflicts)
}
