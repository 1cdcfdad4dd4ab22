//! Conflict resolution and ACTION/GOTO table emission.

use crate::grammar::{Grammar, Rule};
use crate::lalr::Lookaheads;
use crate::lr0::Lr0Automaton;
use crate::symbol::{Associativity, Symbol};
use std::collections::HashMap;

/// A single ACTION table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
    /// A `%nonassoc` conflict: neither shift nor reduce is taken: this
    /// terminal is a syntax error at this state.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

#[derive(Debug, Clone)]
pub struct ConflictDetail {
    pub state: usize,
    pub symbol: Symbol,
    pub kind: ConflictKind,
}

/// Conflict counts and per-state detail, gathered during table emission.
/// Never fatal — see `error.rs`'s doc comment on why this isn't a `Result`.
#[derive(Debug, Default)]
pub struct Conflicts {
    pub shift_reduce: usize,
    pub reduce_reduce: usize,
    pub details: Vec<ConflictDetail>,
}

/// The emitted ACTION/GOTO tables.
pub struct Tables {
    /// One row per state, keyed by terminal.
    action: Vec<HashMap<Symbol, Action>>,
    /// Sparse: `(state, nonterminal) -> next state`.
    goto: HashMap<(usize, Symbol), usize>,
    /// The hoisted default reduction per state, if any.
    pub default_reduction: Vec<Option<usize>>,
}

impl Tables {
    pub fn action(&self, state: usize, symbol: Symbol) -> Option<Action> {
        self.action[state].get(&symbol).copied()
    }

    pub fn actions_in_state(&self, state: usize) -> impl Iterator<Item = (Symbol, Action)> + '_ {
        self.action[state].iter().map(|(s, a)| (*s, *a))
    }

    pub fn goto(&self, state: usize, nonterminal: Symbol) -> Option<usize> {
        self.goto.get(&(state, nonterminal)).copied()
    }
}

/// Builds the ACTION/GOTO tables, resolving shift/reduce and
/// reduce/reduce conflicts per §4.7's precedence/associativity rules.
pub fn build(grammar: &Grammar, automaton: &Lr0Automaton, lookaheads: &Lookaheads) -> (Tables, Conflicts) {
    let mut action_rows = Vec::with_capacity(automaton.states.len());
    let mut goto = HashMap::new();
    let mut default_reduction = Vec::with_capacity(automaton.states.len());
    let mut conflicts = Conflicts::default();

    let accept_item = grammar.rules[0].rhs_start + 1;

    for state in &automaton.states {
        let has_accept = state.items.binary_search(&accept_item).is_ok();
        let mut row: HashMap<Symbol, Action> = HashMap::new();

        for t in &state.transitions {
            if grammar.symbols.is_token(t.symbol) {
                if has_accept && t.symbol == Symbol::END {
                    continue;
                }
                row.insert(t.symbol, Action::Shift(t.to_state));
            } else {
                goto.insert((state.index, t.symbol), t.to_state);
            }
        }
        if has_accept {
            row.insert(Symbol::END, Action::Accept);
        }

        for &r in &state.reductions {
            if r == 0 {
                continue;
            }
            let rule = &grammar.rules[r];
            let la = lookaheads
                .la
                .get(&(state.index, r))
                .expect("lookback is computed for every non-accept reduction");
            for t_idx in 0..grammar.symbols.ntokens {
                if !la.get(t_idx).unwrap_or(false) {
                    continue;
                }
                let a = Symbol(t_idx as u32);
                apply_reduce(&mut row, &mut conflicts, grammar, state.index, a, r, rule);
            }
        }

        default_reduction.push(compute_default_reduction(&row));
        action_rows.push(row);
    }

    (
        Tables {
            action: action_rows,
            goto,
            default_reduction,
        },
        conflicts,
    )
}

fn apply_reduce(
    row: &mut HashMap<Symbol, Action>,
    conflicts: &mut Conflicts,
    grammar: &Grammar,
    state: usize,
    a: Symbol,
    r: usize,
    rule: &Rule,
) {
    match row.get(&a).copied() {
        None => {
            row.insert(a, Action::Reduce(r));
        }
        Some(Action::Accept) | Some(Action::Error) => {}
        Some(Action::Shift(s2)) => {
            let resolved = match (grammar.symbols.prec(a), rule.prec) {
                (Some(ap), Some(rp)) if rp > ap => Some(Action::Reduce(r)),
                (Some(ap), Some(rp)) if ap > rp => Some(Action::Shift(s2)),
                (Some(_), Some(_)) => match grammar.symbols.assoc(a) {
                    Associativity::Left => Some(Action::Reduce(r)),
                    Associativity::Right => Some(Action::Shift(s2)),
                    Associativity::NonAssoc => Some(Action::Error),
                    Associativity::None => None,
                },
                _ => None,
            };
            match resolved {
                Some(action) => {
                    row.insert(a, action);
                }
                None => {
                    conflicts.shift_reduce += 1;
                    conflicts.details.push(ConflictDetail {
                        state,
                        symbol: a,
                        kind: ConflictKind::ShiftReduce,
                    });
                    // Unresolved: prefer shift, i.e. leave the existing entry alone.
                }
            }
        }
        Some(Action::Reduce(other_r)) => {
            conflicts.reduce_reduce += 1;
            conflicts.details.push(ConflictDetail {
                state,
                symbol: a,
                kind: ConflictKind::ReduceReduce,
            });
            let winner = other_r.min(r);
            if winner != other_r {
                row.insert(a, Action::Reduce(winner));
            }
        }
    }
}

/// The most frequent reduction in a row is hoisted to the default; a row
/// with only one distinct reduce rule collapses to it trivially. Shifts
/// and `ACCEPT` are never defaulted.
fn compute_default_reduction(row: &HashMap<Symbol, Action>) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for action in row.values() {
        if let Action::Reduce(r) = action {
            *counts.entry(*r).or_insert(0) += 1;
        }
    }
    let mut entries: Vec<(usize, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries.first().map(|(r, _)| *r)
}
