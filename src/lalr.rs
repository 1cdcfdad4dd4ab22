//! The DeRemer-Pennello (1982) LALR(1) lookahead solver: DirectlyReads,
//! Reads, Includes, Follow, and lookback.

use crate::bitset::{transitive_closure, BitMatrix};
use crate::grammar::Grammar;
use crate::lr0::Lr0Automaton;
use crate::symbol::Symbol;
use bit_vec::BitVec;
use std::collections::HashMap;

/// Per-reduction lookahead sets, plus the `Follow` relation they were
/// derived from (kept around for the verbose dump).
pub struct Lookaheads {
    /// `Follow(p)`, indexed by the dense `nt_gotos` index of `p`.
    pub follow: Vec<BitVec>,
    /// Lookahead terminal set for each `(state, rule)` reduction. Absent
    /// for rule 0 (the synthesized accept rule never reduces generically —
    /// its completion is recognized directly as `ACCEPT`, see §4.7).
    pub la: HashMap<(usize, usize), BitVec>,
}

/// Computes the LALR(1) lookahead sets for every reduction in `automaton`.
pub fn compute(grammar: &Grammar, automaton: &Lr0Automaton, nullable: &[bool]) -> Lookaheads {
    let ntokens = grammar.symbols.ntokens;
    let n = automaton.nt_gotos.len();

    let directly_reads = compute_directly_reads(grammar, automaton, ntokens, n);
    let reads = compute_reads(grammar, automaton, nullable, n);
    let read = compute_read(&directly_reads, &reads, ntokens, n);
    let includes = compute_includes(grammar, automaton, nullable, n);
    let follow = compute_follow(&read, &includes, ntokens, n);
    let la = compute_lookback(grammar, automaton, &follow);

    Lookaheads { follow, la }
}

/// `DR(s, A) = { t terminal : s' has a shift on t }` for goto `(s, A, s')`.
fn compute_directly_reads(
    grammar: &Grammar,
    automaton: &Lr0Automaton,
    ntokens: usize,
    n: usize,
) -> Vec<BitVec> {
    let mut dr = vec![BitVec::from_elem(ntokens, false); n];
    for (i, goto) in automaton.nt_gotos.iter().enumerate() {
        let to_state = &automaton.states[goto.to_state];
        for t in &to_state.transitions {
            if grammar.symbols.is_token(t.symbol) {
                dr[i].set(t.symbol.index(), true);
            }
        }
    }
    dr
}

/// `(s, A) reads (s', C)` iff `s' -C-> s''` exists and `C` is nullable.
fn compute_reads(
    grammar: &Grammar,
    automaton: &Lr0Automaton,
    nullable: &[bool],
    n: usize,
) -> BitMatrix {
    let mut reads = BitMatrix::new(n);
    for (i, goto) in automaton.nt_gotos.iter().enumerate() {
        let to_state = &automaton.states[goto.to_state];
        for t in &to_state.transitions {
            if grammar.symbols.is_nonterminal(t.symbol) {
                let c_off = grammar.symbols.nonterminal_offset(t.symbol);
                if nullable[c_off] {
                    if let Some(j) = automaton.goto_index(goto.to_state, c_off) {
                        reads.set(i, j);
                    }
                }
            }
        }
    }
    transitive_closure(&mut reads);
    reads
}

/// `Read(p) = DR(p) ∪ ⋃ { DR(q) : reads*(p, q) }`.
fn compute_read(directly_reads: &[BitVec], reads: &BitMatrix, ntokens: usize, n: usize) -> Vec<BitVec> {
    let mut read = vec![BitVec::from_elem(ntokens, false); n];
    for i in 0..n {
        read[i].or(&directly_reads[i]);
        for j in reads.row_iter(i) {
            let dr_j = directly_reads[j].clone();
            read[i].or(&dr_j);
        }
    }
    read
}

/// `(p, A) includes (p', B)` iff a rule `B -> beta A gamma` exists with
/// `gamma` entirely nullable, and the spine `beta` walked forward from
/// `from(p')` lands on `from(p)`.
fn compute_includes(
    grammar: &Grammar,
    automaton: &Lr0Automaton,
    nullable: &[bool],
    n: usize,
) -> BitMatrix {
    let mut includes = BitMatrix::new(n);

    for rule in &grammar.rules {
        let rhs = &grammar.ritem[rule.rhs_start..rule.rhs_end()];
        for k in 0..rhs.len() {
            let a_sym = Symbol(rhs[k] as u32);
            if !grammar.symbols.is_nonterminal(a_sym) {
                continue;
            }
            let suffix_nullable = rhs[k + 1..].iter().all(|&v| {
                let sym = Symbol(v as u32);
                grammar.symbols.is_nonterminal(sym) && nullable[grammar.symbols.nonterminal_offset(sym)]
            });
            if !suffix_nullable {
                continue;
            }

            let beta: Vec<Symbol> = rhs[..k].iter().map(|&v| Symbol(v as u32)).collect();
            let b_off = grammar.symbols.nonterminal_offset(rule.lhs);
            let a_off = grammar.symbols.nonterminal_offset(a_sym);

            for t in 0..automaton.states.len() {
                if let Some(s) = walk(automaton, t, &beta) {
                    if let (Some(p_idx), Some(pp_idx)) =
                        (automaton.goto_index(s, a_off), automaton.goto_index(t, b_off))
                    {
                        includes.set(p_idx, pp_idx);
                    }
                }
            }
        }
    }

    transitive_closure(&mut includes);
    includes
}

fn walk(automaton: &Lr0Automaton, mut state: usize, symbols: &[Symbol]) -> Option<usize> {
    for &sym in symbols {
        state = automaton.states[state].shift_on(sym)?;
    }
    Some(state)
}

/// `Follow(p) = Read(p) ∪ ⋃ { Read(q) : includes*(p, q) }`.
fn compute_follow(read: &[BitVec], includes: &BitMatrix, ntokens: usize, n: usize) -> Vec<BitVec> {
    let mut follow = vec![BitVec::from_elem(ntokens, false); n];
    for p in 0..n {
        follow[p].or(&read[p]);
        for q in includes.row_iter(p) {
            let read_q = read[q].clone();
            follow[p].or(&read_q);
        }
    }
    follow
}

/// For each reduction `(s, r)`, walks backward `|rhs(r)|` steps along every
/// spine that could have produced `s`, then unions `Follow` over every
/// nonterminal-goto on `lhs(r)` found at the end of a spine.
fn compute_lookback(
    grammar: &Grammar,
    automaton: &Lr0Automaton,
    follow: &[BitVec],
) -> HashMap<(usize, usize), BitVec> {
    let ntokens = grammar.symbols.ntokens;
    let mut la = HashMap::new();

    for state in &automaton.states {
        for &r in &state.reductions {
            if r == 0 {
                // The augmenting rule never reduces generically: its
                // completion is recognized directly as ACCEPT.
                continue;
            }
            let rule = &grammar.rules[r];
            let frontier = predecessors_after(automaton, state.index, rule.rhs_len);
            let lhs_off = grammar.symbols.nonterminal_offset(rule.lhs);

            let mut set = BitVec::from_elem(ntokens, false);
            for &s0 in &frontier {
                if let Some(p_idx) = automaton.goto_index(s0, lhs_off) {
                    set.or(&follow[p_idx]);
                }
            }
            la.insert((state.index, r), set);
        }
    }

    la
}

fn predecessors_after(automaton: &Lr0Automaton, state: usize, steps: usize) -> Vec<usize> {
    let mut frontier = vec![state];
    for _ in 0..steps {
        let mut next = Vec::new();
        for &t in &frontier {
            for &p in &automaton.predecessors[t] {
                if !next.contains(&p) {
                    next.push(p);
                }
            }
        }
        frontier = next;
    }
    frontier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::{compute_eff, compute_first_derives};
    use crate::grammar::reader;
    use crate::lr0;
    use crate::nullable::compute_nullable;

    #[test]
    fn expression_grammar_e_to_t_follow_set() {
        let src = "\
%token id '+' '*' '(' ')'
%left '+'
%left '*'
%%
E : E '+' T | T ;
T : T '*' F | F ;
F : '(' E ')' | id ;
";
        let grammar = reader::parse(src).unwrap();
        let eff = compute_eff(&grammar);
        let first_derives = compute_first_derives(&grammar, &eff);
        let automaton = lr0::build(&grammar, &first_derives);
        let nullable = compute_nullable(&grammar);
        let lookaheads = compute(&grammar, &automaton, &nullable);

        let plus = grammar
            .symbols
            .tokens()
            .find(|t| grammar.symbols.name(*t) == "'+'")
            .unwrap();
        let rparen = grammar
            .symbols
            .tokens()
            .find(|t| grammar.symbols.name(*t) == "')'")
            .unwrap();

        // Find the state/rule pair for "E -> T ." and check its lookahead
        // is exactly { '+', ')', $end }.
        let e_to_t_rule = grammar
            .rules
            .iter()
            .position(|r| {
                r.lhs == grammar.symbols.start_symbol
                    && r.rhs_len == 1
                    && grammar.ritem[r.rhs_start] >= 0
                    && grammar.symbols.is_nonterminal(Symbol(grammar.ritem[r.rhs_start] as u32))
                    && grammar.symbols.name(Symbol(grammar.ritem[r.rhs_start] as u32)) == "T"
            })
            .unwrap();

        let mut found = false;
        for ((_s, r), set) in &lookaheads.la {
            if *r == e_to_t_rule {
                found = true;
                assert!(set.get(plus.index()).unwrap());
                assert!(set.get(rparen.index()).unwrap());
                assert!(set.get(Symbol::END.index()).unwrap());
            }
        }
        assert!(found, "no reduction found for E -> T");
    }
}
