//! LALR(1) Parser Table-Construction Core
//!
//! A from-scratch Rust implementation of the classical yacc/bison table
//! construction pipeline.
//!
//! This implementation provides:
//! - Epsilon-Free-Firsts, FirstDerives, and the LR(0) closure engine
//! - Canonical LR(0) automaton construction
//! - The DeRemer-Pennello LALR(1) lookahead solver
//! - Conflict resolution and ACTION/GOTO table emission
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! DeRemer, Frank and Pennello, Thomas. "Efficient Computation of LALR(1)
//! Look-Ahead Sets." ACM TOPLAS 4.4 (1982).
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

use std::process;

fn main() {
    env_logger::init();
    if let Err(e) = lalr_core::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
