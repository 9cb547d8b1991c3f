//! Command-line driver for the front end.
//!
//! Takes a source file and an output path, then offers the classic menu:
//! strip comments, dump the token stream, parse and emit the tree, or time a
//! full run. The grammar and its derived tables are built once per process
//! and shared read-only across menu actions.

use anyhow::{Context, Result};
use clap::Parser;
use llfront::frontend::{strip_comments, Lexer, Token};
use llfront::parser::{parse_tokens, ParseOutcome, ParserContext};
use once_cell::sync::OnceCell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "llfront")]
#[command(version)]
#[command(about = "Compiler front end: DFA lexer and LL(1) predictive parser")]
#[command(long_about = r#"
Turns source text into a labeled parse tree. The lexer runs an explicit
automaton over a twin-buffer stream; the parser derives its LL(1) table from
the grammar file at startup and recovers from errors using FOLLOW sets, so a
single run reports many of them.

Example usage:
  llfront program.txt parse_out.txt
  llfront program.txt parse_out.txt --grammar grammar.txt
"#)]
struct Cli {
    /// Input source file
    input: PathBuf,

    /// Output file for the parse-tree listing
    output: PathBuf,

    /// Grammar file the parse table is derived from
    #[arg(long, default_value = "grammar.txt")]
    grammar: PathBuf,
}

static CONTEXT: OnceCell<ParserContext> = OnceCell::new();

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(-1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Fail early when the input cannot be opened at all.
    File::open(&cli.input)
        .with_context(|| format!("Unable to open input file '{}'", cli.input.display()))?;

    loop {
        println!();
        println!("0 : exit");
        println!("1 : remove comments and print the cleaned source");
        println!("2 : lex and print the token stream");
        println!("3 : parse and write the parse tree to '{}'", cli.output.display());
        println!("4 : time a full lex + parse run");
        print!("choice> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(());
        }
        match line.trim() {
            "0" => return Ok(()),
            "1" => cmd_strip_comments(cli)?,
            "2" => cmd_token_listing(cli)?,
            "3" => cmd_parse(cli)?,
            "4" => cmd_timed_run(cli)?,
            other => println!("Unknown option '{}'", other),
        }
    }
}

fn context(cli: &Cli) -> Result<&'static ParserContext> {
    CONTEXT.get_or_try_init(|| {
        ParserContext::from_path(&cli.grammar)
            .with_context(|| format!("Unable to load grammar '{}'", cli.grammar.display()))
    })
}

fn lex_input(cli: &Cli) -> Result<Vec<Token>> {
    let file = File::open(&cli.input)
        .with_context(|| format!("Unable to open input file '{}'", cli.input.display()))?;
    Ok(Lexer::new(file).tokenize()?)
}

fn cmd_strip_comments(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Unable to read '{}'", cli.input.display()))?;
    print!("{}", strip_comments(&source));
    Ok(())
}

fn cmd_token_listing(cli: &Cli) -> Result<()> {
    let tokens = lex_input(cli)?;
    for token in &tokens {
        println!(
            "Line No: {:>5} \t Lexeme: {:>35} \t Token: {:>35}",
            token.line,
            token.lexeme(),
            token.kind().listing_name()
        );
    }
    Ok(())
}

fn cmd_parse(cli: &Cli) -> Result<()> {
    let ctx = context(cli)?;
    for warning in ctx.warnings() {
        println!("{}", warning);
    }
    let tokens = lex_input(cli)?;
    let outcome = parse_tokens(&tokens, ctx);
    report(&outcome, cli)?;
    Ok(())
}

fn report(outcome: &ParseOutcome, cli: &Cli) -> Result<()> {
    for diagnostic in &outcome.diagnostics {
        println!("{}", diagnostic);
    }
    let file = File::create(&cli.output)
        .with_context(|| format!("Unable to create output file '{}'", cli.output.display()))?;
    let mut out = BufWriter::new(file);
    if outcome.is_clean() {
        println!("Parsing successful. The input is syntactically correct.");
        outcome.tree.write_listing(&mut out)?;
        println!("Parse tree written to '{}'", cli.output.display());
    } else {
        println!("The input file has syntactic errors.");
        writeln!(
            out,
            "There were syntax errors in the input file. Not printing the parse tree.\n\
             Check the console for error details."
        )?;
    }
    Ok(())
}

fn cmd_timed_run(cli: &Cli) -> Result<()> {
    let ctx = context(cli)?;
    let start = Instant::now();
    let tokens = lex_input(cli)?;
    let outcome = parse_tokens(&tokens, ctx);
    let elapsed = start.elapsed();
    println!(
        "Lexed {} tokens, parsed {} tree nodes in {:.6} s ({} error(s))",
        tokens.len(),
        outcome.tree.len(),
        elapsed.as_secs_f64(),
        outcome.diagnostics.len()
    );
    Ok(())
}
