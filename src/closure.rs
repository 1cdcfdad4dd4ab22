//! Epsilon-Free-Firsts (EFF), FirstDerives, and the kernel→item-set closure
//! engine.

use crate::bitset::{reflexive_transitive_closure, BitMatrix};
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use bit_vec::BitVec;

/// `EFF[A,B] = 1` iff some rule `A -> B gamma` exists with `B` a
/// nonterminal, reflexively-transitively closed: `EFF[A,B] = 1` iff
/// `A =>* B gamma` for some gamma, counting only leftmost-nonterminal
/// derivations. Epsilon productions never contribute a bit — a production
/// whose right-hand side is empty has no leading symbol to set.
pub fn compute_eff(grammar: &Grammar) -> BitMatrix {
    let nvars = grammar.symbols.nvars;
    let mut eff = BitMatrix::new(nvars);
    for (a, rule_ids) in grammar.derives.iter().enumerate() {
        for &r in rule_ids {
            let rule = &grammar.rules[r as usize];
            if rule.rhs_len == 0 {
                continue;
            }
            let first = grammar.ritem[rule.rhs_start];
            if first >= 0 {
                let sym = Symbol(first as u32);
                if grammar.symbols.is_nonterminal(sym) {
                    eff.set(a, grammar.symbols.nonterminal_offset(sym));
                }
            }
        }
    }
    reflexive_transitive_closure(&mut eff);
    eff
}

/// `FirstDerives[A][r] = 1` iff `EFF[A, lhs(r)] = 1`: rule `r`'s
/// left-hand side is reachable as the leftmost-nonterminal descendant of
/// `A`. One row per nonterminal, one bit per rule.
pub fn compute_first_derives(grammar: &Grammar, eff: &BitMatrix) -> Vec<BitVec> {
    let nvars = grammar.symbols.nvars;
    let nrules = grammar.nrules();
    let mut first_derives = vec![BitVec::from_elem(nrules, false); nvars];
    for a in 0..nvars {
        for b in 0..nvars {
            if eff.get(a, b) {
                for &r in &grammar.derives[b] {
                    first_derives[a].set(r as usize, true);
                }
            }
        }
    }
    first_derives
}

/// Expands sorted LR(0) kernels into their full item sets.
///
/// Reuses a scratch rule-bitset across calls, the way the historical
/// closure routine reuses its output buffer: only the bitset is reused
/// here, since the merge-walk output is handed back to the caller for the
/// lifetime of a state and a fresh `Vec` per state is the idiomatic way to
/// do that in safe Rust.
pub struct ClosureBuilder {
    rule_set: BitVec,
}

impl ClosureBuilder {
    pub fn new(nrules: usize) -> Self {
        Self {
            rule_set: BitVec::from_elem(nrules, false),
        }
    }

    /// `kernel` must be sorted ascending (an LR(0) invariant upheld by the
    /// constructor); checked in debug builds only, per the open question on
    /// sortedness.
    pub fn closure(
        &mut self,
        grammar: &Grammar,
        first_derives: &[BitVec],
        kernel: &[usize],
    ) -> Vec<usize> {
        debug_assert!(
            kernel.windows(2).all(|w| w[0] < w[1]),
            "closure kernel must be sorted and duplicate-free"
        );

        let nrules = grammar.nrules();
        self.rule_set = BitVec::from_elem(nrules, false);

        for &item in kernel {
            if let Some(sym) = grammar.item_symbol(item) {
                if grammar.symbols.is_nonterminal(sym) {
                    let off = grammar.symbols.nonterminal_offset(sym);
                    self.rule_set.or(&first_derives[off]);
                }
            }
        }

        let mut derived_positions = Vec::new();
        for r in 0..nrules {
            if self.rule_set.get(r).unwrap_or(false) {
                derived_positions.push(grammar.rules[r].rhs_start);
            }
        }

        let mut out = Vec::with_capacity(kernel.len() + derived_positions.len());
        let (mut i, mut j) = (0usize, 0usize);
        while i < kernel.len() || j < derived_positions.len() {
            let take_kernel = match (kernel.get(i), derived_positions.get(j)) {
                (Some(&a), Some(&b)) => a <= b,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => unreachable!(),
            };
            let v = if take_kernel {
                let a = kernel[i];
                i += 1;
                a
            } else {
                let b = derived_positions[j];
                j += 1;
                b
            };
            if out.last() != Some(&v) {
                out.push(v);
            }
        }
        out
    }
}
