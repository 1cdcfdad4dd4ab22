//! The pluggable trace-sink interface for the optional verbose dump.
//!
//! Never conditionally compiled out — a [`NullSink`] simply discards every
//! line when verbose mode is off, so the dump call sites never need a
//! `#[cfg(...)]`.

use crate::grammar::Grammar;
use crate::lr0::Lr0Automaton;
use crate::symbol::Symbol;
use crate::table::{ConflictDetail, ConflictKind, Conflicts, Tables};
use std::io::Write;

/// A destination for verbose-dump text.
pub trait TraceSink {
    fn line(&mut self, text: &str);
}

/// Discards everything. The default sink when verbose mode is off.
pub struct NullSink;

impl TraceSink for NullSink {
    fn line(&mut self, _text: &str) {}
}

/// Writes each line, newline-terminated, to an underlying writer.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> TraceSink for TextSink<W> {
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }
}

/// Dumps item sets per state, conflicts per state with their resolution,
/// unused rules/tokens, and the final ACTION/GOTO tables. State-ascending,
/// then symbol-ascending within a state.
pub fn dump(
    sink: &mut dyn TraceSink,
    grammar: &Grammar,
    automaton: &Lr0Automaton,
    tables: &Tables,
    conflicts: &Conflicts,
) {
    for state in &automaton.states {
        sink.line(&format!("state {}", state.index));

        let mut items = state.items.clone();
        items.sort_unstable();
        for &item in &items {
            sink.line(&format!("    {}", format_item(grammar, item)));
        }

        let mut transitions = state.transitions.clone();
        transitions.sort_by_key(|t| t.symbol.0);
        for t in &transitions {
            let kind = if grammar.symbols.is_token(t.symbol) {
                "shift"
            } else {
                "goto"
            };
            sink.line(&format!(
                "    {} {} -> state {}",
                kind,
                grammar.symbols.name(t.symbol),
                t.to_state
            ));
        }

        let mut state_conflicts: Vec<&ConflictDetail> =
            conflicts.details.iter().filter(|d| d.state == state.index).collect();
        state_conflicts.sort_by_key(|d| d.symbol.0);
        for d in state_conflicts {
            let kind = match d.kind {
                ConflictKind::ShiftReduce => "shift/reduce",
                ConflictKind::ReduceReduce => "reduce/reduce",
            };
            sink.line(&format!(
                "    conflict ({}) on {}: resolved to {:?}",
                kind,
                grammar.symbols.name(d.symbol),
                tables.action(state.index, d.symbol)
            ));
        }

        sink.line("");
    }

    let unused = grammar.unused_terminals();
    if !unused.is_empty() {
        sink.line("unused tokens:");
        for t in unused {
            sink.line(&format!("    {}", grammar.symbols.name(t)));
        }
    }

    let unreachable = grammar.unreachable_nonterminals();
    if !unreachable.is_empty() {
        sink.line("unreachable nonterminals:");
        for nt in unreachable {
            sink.line(&format!("    {}", grammar.symbols.name(nt)));
        }
    }

    sink.line(&format!(
        "{} shift/reduce conflicts, {} reduce/reduce conflicts",
        conflicts.shift_reduce, conflicts.reduce_reduce
    ));

    sink.line("ACTION/GOTO tables:");
    for state in &automaton.states {
        let mut actions: Vec<(Symbol, crate::table::Action)> =
            tables.actions_in_state(state.index).collect();
        actions.sort_by_key(|(s, _)| s.0);
        for (sym, action) in actions {
            sink.line(&format!(
                "    state {} on {}: {:?}",
                state.index,
                grammar.symbols.name(sym),
                action
            ));
        }
        for nt in grammar.symbols.nonterminals() {
            if let Some(to) = tables.goto(state.index, nt) {
                sink.line(&format!(
                    "    state {} goto {}: state {}",
                    state.index,
                    grammar.symbols.name(nt),
                    to
                ));
            }
        }
    }
}

fn format_item(grammar: &Grammar, item: usize) -> String {
    let r = grammar
        .rules
        .iter()
        .position(|rule| item >= rule.rhs_start && item <= rule.rhs_end())
        .expect("item must belong to some rule");
    let rule = &grammar.rules[r];

    let mut s = format!("{} ->", grammar.symbols.name(rule.lhs));
    let mut printed_dot = false;
    for pos in rule.rhs_start..rule.rhs_end() {
        if pos == item {
            s.push_str(" .");
            printed_dot = true;
        }
        let sym = Symbol(grammar.ritem[pos] as u32);
        s.push(' ');
        s.push_str(grammar.symbols.name(sym));
    }
    if !printed_dot {
        s.push_str(" .");
    }
    s
}
