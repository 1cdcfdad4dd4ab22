//! A minimal Yacc-subset grammar-text reader.
//!
//! This is not a claim of full Yacc syntax compatibility. It understands
//! just enough of `%token` / `%left` / `%right` / `%nonassoc` / `%start`
//! and a `%%`-separated rules section (`LHS : alt1 | alt2 ;`, with an
//! optional trailing `%prec SYMBOL` on an alternative) to drive the rest of
//! the crate end to end from a plain text file.
//!
//! `/* empty */` or `ε` as the entire body of an alternative denotes an
//! empty right-hand side. Lines may carry a trailing `// ...` comment.

use crate::error::{GrammarError, Result};
use crate::grammar::{Grammar, Rule};
use crate::symbol::{Associativity, Symbol, SymbolTable};
use std::collections::HashMap;

struct Declared {
    name: String,
    prec: Option<u16>,
    assoc: Associativity,
}

/// Parses a grammar in the internal Yacc-subset text format.
pub fn parse(input: &str) -> Result<Grammar> {
    let (decls_text, rules_text) = split_sections(input)?;
    let (order, index, start_name) = parse_declarations(decls_text)?;
    let productions = parse_rules(rules_text)?;

    if productions.is_empty() {
        return Err(GrammarError::EmptyInput);
    }

    let mut nonterminal_names = Vec::new();
    let mut nonterminal_seen = HashMap::new();
    for (lhs, _, _) in &productions {
        if nonterminal_seen.insert(lhs.clone(), ()).is_none() {
            nonterminal_names.push(lhs.clone());
        }
    }
    for nt in &nonterminal_names {
        if index.contains_key(nt) {
            return Err(GrammarError::Redefined(nt.clone()));
        }
    }

    let start = match start_name {
        Some(s) => {
            if !nonterminal_seen.contains_key(&s) {
                return Err(GrammarError::UndefinedSymbol(s));
            }
            s
        }
        None => nonterminal_names[0].clone(),
    };

    // Terminals: declared order first, then any symbol used in a RHS that
    // is not itself a nonterminal, in first-appearance order.
    let mut terminal_names = Vec::new();
    let mut terminal_seen = HashMap::new();
    for d in &order {
        if terminal_seen.insert(d.name.clone(), ()).is_none() {
            terminal_names.push(d.name.clone());
        }
    }
    for (_, rhs, prec_override) in &productions {
        for sym in rhs {
            if !nonterminal_seen.contains_key(sym) && terminal_seen.insert(sym.clone(), ()).is_none() {
                terminal_names.push(sym.clone());
            }
        }
        if let Some(p) = prec_override {
            if !index.contains_key(p) {
                return Err(GrammarError::UndefinedSymbol(p.clone()));
            }
        }
    }

    let ntokens = terminal_names.len() + 1; // +1 for $end at symbol 0
    let nvars = nonterminal_names.len() + 1; // +1 for synthesized $accept
    let nsyms = ntokens + nvars;

    let mut names = vec![String::new(); nsyms];
    let mut values = vec![0i32; nsyms];
    let mut precs = vec![None; nsyms];
    let mut assocs = vec![Associativity::None; nsyms];
    let mut sym_id: HashMap<String, Symbol> = HashMap::new();

    names[0] = "$end".to_string();
    sym_id.insert("$end".to_string(), Symbol::END);

    for (i, name) in terminal_names.iter().enumerate() {
        let s = Symbol((i + 1) as u32);
        names[s.index()] = name.clone();
        values[s.index()] = s.0 as i32;
        if let Some(d) = order.iter().find(|d| &d.name == name) {
            precs[s.index()] = d.prec;
            assocs[s.index()] = d.assoc;
        }
        sym_id.insert(name.clone(), s);
    }

    let accept_sym = Symbol(ntokens as u32);
    names[accept_sym.index()] = "$accept".to_string();
    sym_id.insert("$accept".to_string(), accept_sym);

    for (i, name) in nonterminal_names.iter().enumerate() {
        let s = Symbol((ntokens + 1 + i) as u32);
        names[s.index()] = name.clone();
        sym_id.insert(name.clone(), s);
    }

    let start_symbol = *sym_id
        .get(&start)
        .ok_or_else(|| GrammarError::UndefinedSymbol(start.clone()))?;

    let symbols = SymbolTable::new(ntokens, nvars, start_symbol, names, values, precs, assocs);

    let mut rules = Vec::with_capacity(productions.len() + 1);
    let mut ritem = Vec::new();

    // Rule 0: the synthesized augmenting rule $accept -> start_symbol $end.
    let rhs_start = ritem.len();
    ritem.push(start_symbol.0 as i32);
    ritem.push(Symbol::END.0 as i32);
    ritem.push(-1);
    rules.push(Rule {
        lhs: accept_sym,
        rhs_start,
        rhs_len: 2,
        prec: None,
        assoc: Associativity::None,
    });

    for (lhs_name, rhs_names, prec_override) in &productions {
        let lhs = *sym_id
            .get(lhs_name)
            .ok_or_else(|| GrammarError::UndefinedSymbol(lhs_name.clone()))?;
        let rhs_start = ritem.len();
        let mut rightmost_terminal = None;
        for name in rhs_names {
            let sym = *sym_id
                .get(name)
                .ok_or_else(|| GrammarError::UndefinedSymbol(name.clone()))?;
            if symbols.is_token(sym) {
                rightmost_terminal = Some(sym);
            }
            ritem.push(sym.0 as i32);
        }
        let r = rules.len();
        ritem.push(-(r as i32) - 1);

        let (prec, assoc) = if let Some(p) = prec_override {
            let sym = sym_id[p];
            (symbols.prec(sym), symbols.assoc(sym))
        } else if let Some(t) = rightmost_terminal {
            (symbols.prec(t), symbols.assoc(t))
        } else {
            (None, Associativity::None)
        };

        rules.push(Rule {
            lhs,
            rhs_start,
            rhs_len: rhs_names.len(),
            prec,
            assoc,
        });
    }

    Ok(Grammar::build(symbols, rules, ritem))
}

fn split_sections(input: &str) -> Result<(&str, &str)> {
    let mut parts = input.splitn(3, "%%");
    let decls = parts.next().unwrap_or("");
    let rules = parts
        .next()
        .ok_or_else(|| GrammarError::Syntax("missing `%%` rules separator".to_string()))?;
    Ok((decls, rules))
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(i) => &line[..i],
        None => line,
    }
}

#[allow(clippy::type_complexity)]
fn parse_declarations(
    text: &str,
) -> Result<(Vec<Declared>, HashMap<String, ()>, Option<String>)> {
    let mut order: Vec<Declared> = Vec::new();
    let mut index: HashMap<String, ()> = HashMap::new();
    let mut start_name = None;
    let mut next_prec: u16 = 0;

    let mut upsert = |order: &mut Vec<Declared>,
                       index: &mut HashMap<String, ()>,
                       name: &str,
                       prec: Option<u16>,
                       assoc: Associativity| {
        index.insert(name.to_string(), ());
        if let Some(existing) = order.iter_mut().find(|d| d.name == name) {
            existing.prec = prec;
            existing.assoc = assoc;
        } else {
            order.push(Declared {
                name: name.to_string(),
                prec,
                assoc,
            });
        }
    };

    for raw_line in text.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let mut words = line.split_whitespace();
        let directive = match words.next() {
            Some(d) => d,
            None => continue,
        };
        match directive {
            "%token" => {
                for w in words {
                    upsert(&mut order, &mut index, w, None, Associativity::None);
                }
            }
            "%left" | "%right" | "%nonassoc" => {
                next_prec += 1;
                let assoc = match directive {
                    "%left" => Associativity::Left,
                    "%right" => Associativity::Right,
                    _ => Associativity::NonAssoc,
                };
                for w in words {
                    upsert(&mut order, &mut index, w, Some(next_prec), assoc);
                }
            }
            "%start" => {
                start_name = words.next().map(|s| s.to_string());
            }
            other => {
                return Err(GrammarError::Syntax(format!(
                    "unknown declaration `{other}`"
                )));
            }
        }
    }

    Ok((order, index, start_name))
}

#[allow(clippy::type_complexity)]
fn parse_rules(text: &str) -> Result<Vec<(String, Vec<String>, Option<String>)>> {
    let body: String = text
        .lines()
        .map(strip_comment)
        .collect::<Vec<_>>()
        .join(" ");

    let mut productions = Vec::new();

    for group in body.split(';') {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }
        let mut parts = group.splitn(2, ':');
        let lhs = parts.next().unwrap().trim().to_string();
        let rhs_part = parts
            .next()
            .ok_or_else(|| GrammarError::Syntax(format!("missing `:` in rule `{group}`")))?;
        if lhs.is_empty() {
            return Err(GrammarError::Syntax("empty left-hand side".to_string()));
        }

        for alt in rhs_part.split('|') {
            let alt = alt.trim();
            let is_empty_rhs = alt.is_empty() || alt == "/* empty */" || alt == "ε";
            let mut tokens: Vec<String> = if is_empty_rhs {
                Vec::new()
            } else {
                alt.split_whitespace().map(|s| s.to_string()).collect()
            };

            let prec_override = if let Some(pos) = tokens.iter().position(|t| t == "%prec") {
                if pos + 1 >= tokens.len() {
                    return Err(GrammarError::Syntax("`%prec` with no symbol".to_string()));
                }
                let sym = tokens[pos + 1].clone();
                tokens.truncate(pos);
                Some(sym)
            } else {
                None
            };

            productions.push((lhs.clone(), tokens, prec_override));
        }
    }

    Ok(productions)
}
