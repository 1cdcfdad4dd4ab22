//! Integration tests for the symbol table, exercised through the grammar
//! reader since `SymbolTable` is an output contract, not something built
//! by hand outside the reader.

use lalr_core::grammar::reader;
use lalr_core::Symbol;

#[test]
fn end_marker_is_symbol_zero() {
    let grammar = reader::parse("%token a\n%%\nS : a ;\n").unwrap();
    assert_eq!(Symbol::END.index(), 0);
    assert!(grammar.symbols.is_token(Symbol::END));
}

#[test]
fn tokens_and_nonterminals_partition_the_symbol_space() {
    let grammar = reader::parse("%token a b\n%%\nS : a | S b ;\n").unwrap();
    for t in grammar.symbols.tokens() {
        assert!(grammar.symbols.is_token(t));
        assert!(!grammar.symbols.is_nonterminal(t));
    }
    for nt in grammar.symbols.nonterminals() {
        assert!(grammar.symbols.is_nonterminal(nt));
        assert!(!grammar.symbols.is_token(nt));
    }
}

#[test]
fn accept_is_the_first_nonterminal() {
    let grammar = reader::parse("%token a\n%%\nS : a ;\n").unwrap();
    let accept = grammar.rules[0].lhs;
    assert_eq!(grammar.symbols.nonterminal_offset(accept), 0);
    assert_eq!(grammar.symbols.name(accept), "$accept");
}

#[test]
fn declared_precedence_and_associativity_round_trip() {
    let grammar = reader::parse("%token id '+'\n%left '+'\n%%\nE : E '+' E | id ;\n").unwrap();
    let plus = grammar.symbols.tokens().find(|t| grammar.symbols.name(*t) == "'+'").unwrap();
    assert!(grammar.symbols.prec(plus).is_some());
    assert_eq!(grammar.symbols.assoc(plus), lalr_core::symbol::Associativity::Left);
}

#[test]
fn undeclared_token_has_no_precedence() {
    let grammar = reader::parse("%token a\n%%\nS : a ;\n").unwrap();
    let a = grammar.symbols.tokens().find(|t| grammar.symbols.name(*t) == "a").unwrap();
    assert!(grammar.symbols.prec(a).is_none());
}
