//! mailstyle CLI
//!
//! Shows how a style sheet (or an inline `style` attribute) is read: the
//! consumed-block tree, the extracted selectors and their declarations.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use mailstyle_css::parser::extract_rules;
use mailstyle_css::{CSSParser, DeclarationBlock, ParserOptions, StyleSheet, parse_css_declaration};
use owo_colors::OwoColorize;
use tracing::Level;

/// mailstyle - inspect how a style sheet from a message is understood
#[derive(Parser, Debug)]
#[command(name = "mailstyle")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Extract rules from a file
    mailstyle message.css

    # Parse CSS text directly and dump the block tree
    mailstyle --css 'p { color: red }' --tree

    # Inline style attribute, as JSON
    mailstyle --declaration --css 'color: #f00; font-size: 0' --json
"#)]
struct Cli {
    /// Path to a CSS file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this CSS text instead of a file
    #[arg(long, value_name = "TEXT")]
    css: Option<String>,

    /// Treat the input as the contents of a `style` attribute
    #[arg(short, long)]
    declaration: bool,

    /// Print the consumed-block tree
    #[arg(long)]
    tree: bool,

    /// Print the extracted rules as JSON
    #[arg(long)]
    json: bool,

    /// Nesting ceiling for the block consumers
    #[arg(long, default_value_t = mailstyle_css::MAX_NESTING)]
    max_nesting: usize,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let input = load_input(&cli)?;

    if cli.declaration {
        let block = parse_css_declaration(&input).unwrap_or_default();
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&block)?);
        } else {
            print_declarations(&block, "");
        }
        return Ok(());
    }

    let mut parser = CSSParser::with_options(ParserOptions {
        max_nesting: cli.max_nesting,
    });
    let top = parser.consume_css_blocks(&input);

    if cli.tree {
        println!("{}", "=== Block Tree ===".bold());
        println!("{{{}}}", top.debug_str());
        println!();
    }

    if let Some(err) = parser.error() {
        eprintln!("{} {err}", "error:".red().bold());
    }

    let Some(sheet) = extract_rules(&top) else {
        bail!("no style sheet produced");
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&sheet)?);
    } else {
        print_sheet(&sheet);
    }
    Ok(())
}

/// Read the CSS text from `--css` or the file argument
fn load_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref css) = cli.css {
        Ok(css.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
    } else {
        bail!("a file path or --css is required")
    }
}

fn print_sheet(sheet: &StyleSheet) {
    println!("{}", "=== Rules ===".bold());
    println!("{} selectors", sheet.len());

    for (selector, declarations) in sheet.iter() {
        println!("\n{} {}", selector.to_string().cyan(), "{".dimmed());
        print_declarations(&declarations.borrow(), "  ");
        println!("{}", "}".dimmed());
    }
}

fn print_declarations(block: &DeclarationBlock, indent: &str) {
    for rule in block {
        let values: Vec<String> = rule.values.iter().map(|v| format!("{v:?}")).collect();
        let important = if rule.important { " !important" } else { "" };
        println!(
            "{indent}{}: {}{}",
            rule.property.green(),
            values.join(" "),
            important.yellow()
        );
    }
}
