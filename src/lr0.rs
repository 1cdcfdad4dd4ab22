//! Canonical LR(0) state construction: item sets, transitions, kernels.

use crate::closure::ClosureBuilder;
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use bit_vec::BitVec;
use std::collections::{HashMap, VecDeque};

/// An outgoing transition of a state, labeled by the symbol shifted/goto'd.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub symbol: Symbol,
    pub to_state: usize,
}

/// A transition whose label is a nonterminal, given a global dense index
/// matching the order the lookahead solver expects (state-ascending, then
/// symbol-ascending within a state).
#[derive(Debug, Clone, Copy)]
pub struct NonterminalGoto {
    pub from_state: usize,
    pub symbol: Symbol,
    pub to_state: usize,
}

/// A state of the canonical LR(0) collection.
#[derive(Debug, Clone)]
pub struct State {
    pub index: usize,
    /// Sorted, duplicate-free kernel item positions.
    pub kernel: Vec<usize>,
    /// The kernel's closure: kernel plus every derived item.
    pub items: Vec<usize>,
    /// `None` only for state 0; every other state is entered by exactly
    /// one symbol, shared by all its in-edges (invariant I5).
    pub accessing_symbol: Option<Symbol>,
    /// Sorted by symbol; terminal transitions (shifts) precede nonterminal
    /// transitions (gotos) because terminal ids are always numerically
    /// lower than nonterminal ids.
    pub transitions: Vec<Transition>,
    /// Rule indices of every completed item in this state's full item set.
    pub reductions: Vec<usize>,
}

impl State {
    pub fn shift_on(&self, symbol: Symbol) -> Option<usize> {
        self.transitions
            .iter()
            .find(|t| t.symbol == symbol)
            .map(|t| t.to_state)
    }
}

/// The canonical LR(0) collection plus the indices the lookahead solver
/// needs: the flattened nonterminal-goto list and the reverse (predecessor)
/// edge map used to walk lookback spines.
pub struct Lr0Automaton {
    pub states: Vec<State>,
    pub nt_gotos: Vec<NonterminalGoto>,
    /// `predecessors[s]` lists every state with a transition (of any
    /// symbol) into `s`.
    pub predecessors: Vec<Vec<usize>>,
    goto_lookup: HashMap<(usize, usize), usize>,
}

impl Lr0Automaton {
    /// Looks up the dense `nt_gotos` index of the goto from `from_state` on
    /// the nonterminal at offset `nt_offset`, if one exists.
    pub fn goto_index(&self, from_state: usize, nt_offset: usize) -> Option<usize> {
        self.goto_lookup.get(&(from_state, nt_offset)).copied()
    }
}

/// Builds the canonical LR(0) collection.
///
/// State 0's kernel is the single item "dot before the RHS of rule 0"
/// (`$accept -> start_symbol $end`, synthesized by the reader).
pub fn build(grammar: &Grammar, first_derives: &[BitVec]) -> Lr0Automaton {
    let mut builder = ClosureBuilder::new(grammar.nrules());

    let initial_kernel = vec![grammar.rules[0].rhs_start];
    let initial_items = builder.closure(grammar, first_derives, &initial_kernel);

    let mut states = vec![State {
        index: 0,
        kernel: initial_kernel.clone(),
        items: initial_items,
        accessing_symbol: None,
        transitions: Vec::new(),
        reductions: Vec::new(),
    }];
    let mut kernel_index = HashMap::new();
    kernel_index.insert(initial_kernel, 0usize);

    let mut worklist = VecDeque::new();
    worklist.push_back(0usize);

    let mut transitions_raw: Vec<(usize, Symbol, usize)> = Vec::new();

    while let Some(s) = worklist.pop_front() {
        let items = states[s].items.clone();
        let mut buckets: Vec<(Symbol, Vec<usize>)> = Vec::new();

        for &item in &items {
            match grammar.item_symbol(item) {
                Some(sym) => {
                    if let Some(entry) = buckets.iter_mut().find(|(sy, _)| *sy == sym) {
                        entry.1.push(item + 1);
                    } else {
                        buckets.push((sym, vec![item + 1]));
                    }
                }
                None => {
                    states[s].reductions.push(grammar.item_rule(item));
                }
            }
        }

        buckets.sort_by_key(|(sym, _)| sym.0);

        for (sym, mut kernel) in buckets {
            kernel.sort_unstable();
            kernel.dedup();

            let to_state = if let Some(&id) = kernel_index.get(&kernel) {
                id
            } else {
                let id = states.len();
                let full = builder.closure(grammar, first_derives, &kernel);
                states.push(State {
                    index: id,
                    kernel: kernel.clone(),
                    items: full,
                    accessing_symbol: Some(sym),
                    transitions: Vec::new(),
                    reductions: Vec::new(),
                });
                kernel_index.insert(kernel, id);
                worklist.push_back(id);
                id
            };
            transitions_raw.push((s, sym, to_state));
        }
    }

    for &(from, sym, to) in &transitions_raw {
        states[from].transitions.push(Transition {
            symbol: sym,
            to_state: to,
        });
    }
    for state in &mut states {
        state.transitions.sort_by_key(|t| t.symbol.0);
    }

    let mut predecessors = vec![Vec::new(); states.len()];
    for &(from, _, to) in &transitions_raw {
        predecessors[to].push(from);
    }

    let mut nt_gotos = Vec::new();
    let mut goto_lookup = HashMap::new();
    for state in &states {
        for t in &state.transitions {
            if grammar.symbols.is_nonterminal(t.symbol) {
                let idx = nt_gotos.len();
                goto_lookup.insert(
                    (state.index, grammar.symbols.nonterminal_offset(t.symbol)),
                    idx,
                );
                nt_gotos.push(NonterminalGoto {
                    from_state: state.index,
                    symbol: t.symbol,
                    to_state: t.to_state,
                });
            }
        }
    }

    Lr0Automaton {
        states,
        nt_gotos,
        predecessors,
        goto_lookup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::{compute_eff, compute_first_derives};
    use crate::grammar::reader;

    #[test]
    fn classic_expression_grammar_has_twelve_states() {
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
        let automaton = build(&grammar, &first_derives);
        assert_eq!(automaton.states.len(), 12);
    }

    #[test]
    fn kernels_are_pairwise_distinct() {
        let src = "%token a b\n%%\nS : a S | b ;\n";
        let grammar = reader::parse(src).unwrap();
        let eff = compute_eff(&grammar);
        let first_derives = compute_first_derives(&grammar, &eff);
        let automaton = build(&grammar, &first_derives);
        for i in 0..automaton.states.len() {
            for j in (i + 1)..automaton.states.len() {
                assert_ne!(automaton.states[i].kernel, automaton.states[j].kernel);
            }
        }
    }

    #[test]
    fn every_non_start_state_has_one_accessing_symbol() {
        let src = "%token a b\n%%\nS : a S | b ;\n";
        let grammar = reader::parse(src).unwrap();
        let eff = compute_eff(&grammar);
        let first_derives = compute_first_derives(&grammar, &eff);
        let automaton = build(&grammar, &first_derives);
        assert!(automaton.states[0].accessing_symbol.is_none());
        for state in &automaton.states[1..] {
            assert!(state.accessing_symbol.is_some());
        }
    }
}
