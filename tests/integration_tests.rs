//! Integration tests for the full front-end pipeline.

use llfront::frontend::{tokenize_source, Lexer, TokenKind};
use llfront::parser::{parse_tokens, Grammar, GrammarSymbol, NonTerminal, ParserContext};
use std::io::Cursor;

const GRAMMAR: &str = include_str!("../grammar.txt");

fn full_context() -> ParserContext {
    ParserContext::new(GRAMMAR).expect("shipped grammar must load")
}

fn parse(source: &str, ctx: &ParserContext) -> llfront::parser::ParseOutcome {
    let tokens = tokenize_source(source).unwrap();
    parse_tokens(&tokens, ctx)
}

/// Leaf lexemes in left-to-right order, epsilon leaves skipped.
fn leaf_lexemes(outcome: &llfront::parser::ParseOutcome) -> Vec<String> {
    let mut leaves = Vec::new();
    outcome.tree.traverse(&mut |node, _| {
        if node.is_leaf() && !node.symbol.is_epsilon() {
            if let Some(entry) = &node.entry {
                leaves.push(entry.lexeme.clone());
            }
        }
    });
    leaves
}

#[test]
fn shipped_grammar_loads_without_conflicts() {
    let ctx = full_context();
    assert!(
        ctx.warnings().is_empty(),
        "parse-table conflicts: {:?}",
        ctx.warnings()
    );
    assert!(ctx.grammar().len() > 80);
}

#[test]
fn first_and_follow_of_start_symbol() {
    let ctx = full_context();
    let first = ctx.sets().first(NonTerminal::Program);
    assert!(first.contains(TokenKind::Main));
    assert!(first.contains(TokenKind::FunId));
    assert!(!first.has_epsilon());
    let follow = ctx.sets().follow(NonTerminal::Program);
    assert!(follow.contains(TokenKind::Dollar));
}

#[test]
fn minimal_program_parses_cleanly() {
    let ctx = full_context();
    let outcome = parse("_main\n    return ;\nend\n", &ctx);
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);
}

#[test]
fn assignment_statement_leaves_in_order() {
    let ctx = full_context();
    let outcome = parse("_main\n    b2 <--- 5 ;\n    return ;\nend\n", &ctx);
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);
    assert_eq!(
        leaf_lexemes(&outcome),
        vec!["_main", "b2", "<---", "5", ";", "return", ";", "end"]
    );
}

#[test]
fn full_program_with_records_loops_and_io() {
    let source = "\
_main
    record #point
        type int : x ;
        type real : y ;
    endrecord
    type record #point : b2 ;
    type int : c3 : global ;
    c3 <--- 0 ;
    b2 . x <--- 3 ;
    b2 . y <--- 2.50E01 ;
    while ( c3 < 10 )
        c3 <--- c3 + 1 ;
    endwhile
    if ( c3 == 10 )
    then
        write ( c3 ) ;
    else
        read ( b2 . x ) ;
    endif
    return ;
end
";
    let ctx = full_context();
    let outcome = parse(source, &ctx);
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);

    // Round-trip: leaf lexemes equal the non-comment token lexemes.
    let tokens = tokenize_source(source).unwrap();
    let expected: Vec<String> = tokens
        .iter()
        .filter(|t| !t.is_eof() && t.kind() != TokenKind::Comment)
        .map(|t| t.lexeme().to_string())
        .collect();
    assert_eq!(leaf_lexemes(&outcome), expected);
}

#[test]
fn functions_and_call_statement() {
    let source = "\
_fnone input parameter list [ int d2 ]
       output parameter list [ int b2 ] ;
    b2 <--- d2 + 1 ;
    return [ b2 ] ;
end
_main
    type int : b2 ;
    [ b2 ] <--- call _fnone with parameters [ b2 ] ;
    return ;
end
";
    let ctx = full_context();
    let outcome = parse(source, &ctx);
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);
}

#[test]
fn union_and_definetype() {
    let source = "\
_main
    union #u
        type int : a ;
        type real : b ;
    endunion
    definetype union #u as #v
    type #v : d5 ;
    return ;
end
";
    let ctx = full_context();
    let outcome = parse(source, &ctx);
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);
}

#[test]
fn internal_nodes_expand_to_grammar_rules() {
    let ctx = full_context();
    let outcome = parse(
        "_main\n    type int : b2 ;\n    b2 <--- 1 + 2 * 3 ;\n    return ;\nend\n",
        &ctx,
    );
    assert!(outcome.is_clean());
    let grammar: &Grammar = ctx.grammar();
    let tree = &outcome.tree;
    tree.traverse(&mut |node, _| {
        if node.children.is_empty() {
            return;
        }
        let lhs = match node.symbol {
            GrammarSymbol::NonTerminal(nt) => nt,
            GrammarSymbol::Terminal(_) => panic!("terminal node with children"),
        };
        let child_symbols: Vec<GrammarSymbol> =
            node.children.iter().map(|&c| tree.node(c).symbol).collect();
        assert!(
            grammar
                .rules()
                .iter()
                .any(|r| r.lhs == lhs && r.rhs == child_symbols),
            "children of {} are not a rule body: {:?}",
            lhs.name(),
            child_symbols
        );
    });
}

#[test]
fn arithmetic_fragment_is_rejected_at_top_level() {
    // Scenario: `123 + 4.56` lexes fine but the grammar wants a program.
    let ctx = full_context();
    let tokens = tokenize_source("123 + 4.56").unwrap();
    assert_eq!(tokens[0].kind(), TokenKind::Num);
    assert_eq!(tokens[1].kind(), TokenKind::Plus);
    assert_eq!(tokens[2].kind(), TokenKind::Rnum);
    assert_eq!(tokens[3].kind(), TokenKind::Dollar);

    let outcome = parse_tokens(&tokens, &ctx);
    assert!(outcome.had_syntax_error);
    assert!(outcome.diagnostics.iter().any(|d| d.line == 1));
}

#[test]
fn main_end_with_toy_grammar() {
    // Scenario: a grammar whose start symbol derives "_main end".
    let ctx = ParserContext::new(
        "<program> <mainFunction>\n\
         <mainFunction> MAIN END\n",
    )
    .unwrap();
    let outcome = parse("_main\nend\n", &ctx);
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);

    let mut leaves = Vec::new();
    outcome.tree.traverse(&mut |node, _| {
        if let Some(entry) = &node.entry {
            leaves.push((entry.lexeme.clone(), node.line));
        }
    });
    assert_eq!(
        leaves,
        vec![("_main".to_string(), 1), ("end".to_string(), 2)]
    );
}

#[test]
fn right_leaning_list_grammar() {
    // <S> -> <A> <S> | eps, <A> -> a over input "a a a": three expansions
    // terminated by one epsilon leaf.
    let ctx = ParserContext::new(
        "<program> <function> <program>\n\
         <function> FIELDID\n\
         <program> EPS\n",
    )
    .unwrap();

    let first = ctx.sets().first(NonTerminal::Program);
    assert!(first.contains(TokenKind::FieldId));
    assert!(first.has_epsilon());
    let follow = ctx.sets().follow(NonTerminal::Program);
    assert_eq!(follow.iter().collect::<Vec<_>>(), vec![TokenKind::Dollar]);

    let outcome = parse("a a a", &ctx);
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);

    let mut expansions = 0;
    let mut eps_leaves = 0;
    outcome.tree.traverse(&mut |node, _| {
        if node.symbol == GrammarSymbol::NonTerminal(NonTerminal::Function) {
            expansions += 1;
        }
        if node.symbol.is_epsilon() {
            eps_leaves += 1;
        }
    });
    assert_eq!(expansions, 3);
    assert_eq!(eps_leaves, 1);
}

#[test]
fn lexical_errors_are_reported_and_recovered() {
    let ctx = full_context();
    let outcome = parse(
        "_main\n    b2 <--- 5 @ ;\n    return ;\nend\n",
        &ctx,
    );
    assert!(outcome.had_syntax_error);
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.message == "Unrecognized pattern: \"@\"" && d.line == 2));
    // parsing continued to the end of input
    assert!(leaf_lexemes(&outcome).contains(&"end".to_string()));
}

#[test]
fn over_long_identifier_reported_with_truncated_lexeme() {
    let ctx = full_context();
    let long_id = format!("b{}", "2".repeat(20));
    let source = format!(
        "_main\n    type int : b2 ;\n    {} <--- 1 ;\n    return ;\nend\n",
        long_id
    );
    let outcome = parse(&source, &ctx);
    assert!(outcome.had_syntax_error);
    let expected = format!("Too long identifier: \"b{}...\"", "2".repeat(19));
    assert!(outcome.diagnostics.iter().any(|d| d.message == expected));
}

#[test]
fn multiple_errors_in_one_run() {
    let ctx = full_context();
    let source = "\
_main
    type int : b2
    b2 <--- ;
    return ;
end
";
    let outcome = parse(source, &ctx);
    assert!(outcome.had_syntax_error);
    // missing semicolon and missing expression both reported
    assert!(outcome.diagnostics.len() >= 2);
}

#[test]
fn comments_are_transparent_to_the_parser() {
    let ctx = full_context();
    let outcome = parse(
        "% header comment\n_main\n    return ; % trailing\nend\n",
        &ctx,
    );
    assert!(outcome.is_clean(), "diagnostics: {:?}", outcome.diagnostics);
}

#[test]
fn parse_is_deterministic() {
    let ctx = full_context();
    let source = "_main\n    b2 <--- 5 ;\nend\n";
    let a = parse(source, &ctx);
    let b = parse(source, &ctx);
    assert_eq!(a.had_syntax_error, b.had_syntax_error);
    assert_eq!(a.diagnostics, b.diagnostics);
    assert_eq!(a.tree.len(), b.tree.len());
}

#[test]
fn symbol_table_interns_across_whole_file() {
    let mut lexer = Lexer::new(Cursor::new(
        b"_main b2 <--- b2 + b2 ; b2 <--- b2 ; end".to_vec(),
    ));
    while !lexer.next_token().unwrap().is_eof() {}
    let symbols = lexer.symbols();
    let b2_count = symbols.iter().filter(|e| e.lexeme == "b2").count();
    assert_eq!(b2_count, 1);
}

#[test]
fn tree_listing_has_expected_columns() {
    let ctx = full_context();
    let outcome = parse("_main\n    b2 <--- 42 ;\n    return ;\nend\n", &ctx);
    assert!(outcome.is_clean());
    let mut out = Vec::new();
    outcome.tree.write_listing(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("lexeme"));
    assert!(text.contains("ROOT"));
    assert!(text.contains("TK_ASSIGNOP"));
    assert!(text.contains("EPSILON"));
    // the NUM leaf prints its integer value
    let num_row = text
        .lines()
        .find(|l| l.contains("TK_NUM"))
        .expect("NUM row present");
    assert!(num_row.contains("42"));
    assert!(num_row.contains("YES"));
}

#[test]
fn context_construction_is_idempotent() {
    let a = full_context();
    let b = full_context();
    assert_eq!(a.grammar(), b.grammar());
    assert_eq!(a.sets(), b.sets());
    assert_eq!(a.table(), b.table());
}
