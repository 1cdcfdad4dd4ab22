//! Nullable-set computation: which nonterminals can derive the empty string.

use crate::grammar::Grammar;

/// `nullable[A]` (`A` a nonterminal offset) is `true` iff `A` can derive the
/// empty string.
///
/// Fixed-point iteration: a nonterminal becomes nullable as soon as some
/// rule of its own is entirely composed of already-nullable nonterminals
/// (the empty right-hand side is the base case, trivially "entirely
/// nullable symbols" with zero of them).
pub fn compute_nullable(grammar: &Grammar) -> Vec<bool> {
    let nvars = grammar.symbols.nvars;
    let mut nullable = vec![false; nvars];

    let mut changed = true;
    while changed {
        changed = false;
        for (off, rule_ids) in grammar.derives.iter().enumerate() {
            if nullable[off] {
                continue;
            }
            for &r in rule_ids {
                let rule = &grammar.rules[r as usize];
                let all_nullable = grammar.ritem[rule.rhs_start..rule.rhs_end()]
                    .iter()
                    .all(|&v| {
                        debug_assert!(v >= 0, "rhs slice must not include the sentinel");
                        let sym = crate::symbol::Symbol(v as u32);
                        grammar.symbols.is_nonterminal(sym)
                            && nullable[grammar.symbols.nonterminal_offset(sym)]
                    });
                if all_nullable {
                    nullable[off] = true;
                    changed = true;
                    break;
                }
            }
        }
    }

    nullable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::reader;

    #[test]
    fn empty_production_is_nullable() {
        // A : /* empty */ | A 'x' ;
        let src = "%token x\n%%\nA : /* empty */ | A x ;\n";
        let grammar = reader::parse(src).unwrap();
        let nullable = compute_nullable(&grammar);
        let a = grammar.symbols.start_symbol;
        assert!(nullable[grammar.symbols.nonterminal_offset(a)]);
    }

    #[test]
    fn non_nullable_stays_false() {
        let src = "%token a b\n%%\nS : a b ;\n";
        let grammar = reader::parse(src).unwrap();
        let nullable = compute_nullable(&grammar);
        let s = grammar.symbols.start_symbol;
        assert!(!nullable[grammar.symbols.nonterminal_offset(s)]);
    }
}
