//! End-to-end scenarios straight out of the table-construction design: a
//! grammar source string goes in, ACTION/GOTO tables and a conflict report
//! come out. `simulate` below is a minimal table-driven shift-reduce
//! walker used only to exercise the tables in these tests — generating or
//! running an actual target-language parser is out of scope for the crate.

use lalr_core::error::GrammarError;
use lalr_core::grammar::{reader, Grammar};
use lalr_core::table::Action;
use lalr_core::{compile, Conflicts, Lr0Automaton, Symbol, Tables};

fn build(src: &str) -> (Grammar, Lr0Automaton, Tables, Conflicts) {
    let grammar = reader::parse(src).unwrap();
    let (automaton, tables, conflicts) = compile(&grammar);
    (grammar, automaton, tables, conflicts)
}

fn simulate(grammar: &Grammar, tables: &Tables, input: &[&str]) -> bool {
    let tokens: Vec<Symbol> = input
        .iter()
        .map(|name| grammar.symbols.tokens().find(|t| grammar.symbols.name(*t) == *name).unwrap())
        .collect();

    let mut states = vec![0usize];
    let mut pos = 0;
    loop {
        let state = *states.last().unwrap();
        let lookahead = tokens.get(pos).copied().unwrap_or(Symbol::END);
        match tables.action(state, lookahead) {
            Some(Action::Shift(s)) => {
                states.push(s);
                pos += 1;
            }
            Some(Action::Reduce(r)) => {
                let rule = &grammar.rules[r];
                for _ in 0..rule.rhs_len {
                    states.pop();
                }
                let top = *states.last().unwrap();
                let to = tables
                    .goto(top, rule.lhs)
                    .expect("goto must exist for any state reachable by a real reduction");
                states.push(to);
            }
            Some(Action::Accept) => return true,
            Some(Action::Error) | None => return false,
        }
    }
}

#[test]
fn s1_classic_expression_grammar() {
    let src = "\
%token id '+' '*' '(' ')'
%left '+'
%left '*'
%%
E : E '+' T | T ;
T : T '*' F | F ;
F : '(' E ')' | id ;
";
    let (grammar, automaton, tables, conflicts) = build(src);
    assert_eq!(automaton.states.len(), 12);
    assert_eq!(conflicts.shift_reduce, 0);
    assert_eq!(conflicts.reduce_reduce, 0);

    let id = grammar.symbols.tokens().find(|t| grammar.symbols.name(*t) == "id").unwrap();
    assert!(matches!(tables.action(0, id), Some(Action::Shift(_))));

    assert!(simulate(&grammar, &tables, &["id", "+", "id", "*", "id"]));
    assert!(simulate(&grammar, &tables, &["(", "id", "+", "id", ")", "*", "id"]));
    assert!(!simulate(&grammar, &tables, &["id", "+"]));
}

#[test]
fn s2_dangling_else_shifts() {
    let src = "\
%token 'if' 'then' 'else' other
%%
S : 'if' E 'then' S | 'if' E 'then' S 'else' S | other ;
E : other ;
";
    let (grammar, _automaton, tables, conflicts) = build(src);
    assert_eq!(conflicts.shift_reduce, 1);
    assert_eq!(conflicts.reduce_reduce, 0);

    let detail = &conflicts.details[0];
    assert!(matches!(tables.action(detail.state, detail.symbol), Some(Action::Shift(_))));
    assert_eq!(grammar.symbols.name(detail.symbol), "'else'");
}

#[test]
fn s3_empty_production_is_nullable_and_accepted() {
    let src = "%token x\n%%\nA : /* empty */ | A x ;\n";
    let (grammar, _automaton, tables, _conflicts) = build(src);

    let x = grammar.symbols.tokens().find(|t| grammar.symbols.name(*t) == "x").unwrap();
    let empty_rule = grammar
        .rules
        .iter()
        .position(|r| grammar.symbols.name(r.lhs) == "A" && r.rhs_len == 0)
        .unwrap();
    assert_eq!(tables.action(0, x), Some(Action::Reduce(empty_rule)));

    assert!(simulate(&grammar, &tables, &["x", "x", "x"]));
    assert!(simulate(&grammar, &tables, &[]));
}

#[test]
fn s4_reduce_reduce_by_declaration_order() {
    let src = "%token x\n%%\nS : A | B ;\nA : x ;\nB : x ;\n";
    let (grammar, automaton, tables, conflicts) = build(src);
    assert_eq!(conflicts.reduce_reduce, 1);

    let x = grammar.symbols.tokens().find(|t| grammar.symbols.name(*t) == "x").unwrap();
    let a_rule = grammar.rules.iter().position(|r| grammar.symbols.name(r.lhs) == "A").unwrap();

    let after_shift = automaton.states[0].shift_on(x).expect("x must be shiftable from state 0");
    assert_eq!(tables.action(after_shift, Symbol::END), Some(Action::Reduce(a_rule)));

    assert!(simulate(&grammar, &tables, &["x"]));
}

#[test]
fn s5_precedence_resolves_left_associative() {
    let src = "%token id '+'\n%left '+'\n%%\nE : E '+' E | id ;\n";
    let (grammar, _automaton, tables, conflicts) = build(src);
    assert_eq!(conflicts.shift_reduce, 0, "precedence should resolve the conflict outright");
    assert!(simulate(&grammar, &tables, &["id", "+", "id", "+", "id"]));
}

#[test]
fn running_the_pipeline_twice_is_deterministic() {
    let src = "\
%token id '+' '*' '(' ')'
%left '+'
%left '*'
%%
E : E '+' T | T ;
T : T '*' F | F ;
F : '(' E ')' | id ;
";
    let (grammar1, automaton1, tables1, _c1) = build(src);
    let (grammar2, automaton2, tables2, _c2) = build(src);
    assert_eq!(automaton1.states.len(), automaton2.states.len());

    for s in 0..automaton1.states.len() {
        for t in grammar1.symbols.tokens() {
            assert_eq!(tables1.action(s, t), tables2.action(s, t));
        }
        for nt in grammar2.symbols.nonterminals() {
            assert_eq!(tables1.goto(s, nt), tables2.goto(s, nt));
        }
    }
}

#[test]
fn malformed_input_is_a_syntax_error_not_a_panic() {
    let result = reader::parse("not a grammar at all");
    assert!(matches!(result, Err(GrammarError::Syntax(_))));
}
