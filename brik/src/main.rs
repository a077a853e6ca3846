use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brik::BrikError;
use brik::driver::{emit_document, load_source};
use brik::emit::Format;
use brik::options::{DEFAULT_MAX_DEPTH, ParseOptions};
use brik::parser;

#[derive(Parser)]
#[command(name = "brik")]
#[command(about = "Reader for the BRIK configuration language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a source file and write the document
    Convert {
        /// Source file
        input: String,

        /// Output file, defaults to the input with an .ast extension
        #[arg(short, long)]
        output: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Print the document before writing it
        #[arg(long)]
        show_ast: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Print the tokens and document of a source file without writing anything
    Parse {
        /// Source file
        input: String,

        /// Print tokens as a JSON array instead of one per line
        #[arg(long)]
        json_tokens: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// List supported output formats
    Formats,
}

#[derive(Args)]
struct ParseArgs {
    /// Reject blocks and lists left open at end of input
    #[arg(long)]
    strict: bool,

    /// Maximum nesting of blocks and lists
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        ParseOptions {
            strict_delimiters: self.strict,
            max_depth: self.max_depth,
        }
    }
}

/// Reports the error and aborts without producing output.
fn or_exit<T>(result: Result<T, BrikError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { input, output, format, show_ast, parse } => {
            let Some(format) = Format::from_name(&format) else {
                eprintln!("Unknown format: {}", format);
                std::process::exit(2);
            };

            println!("Converting {} to {}...", input, format.name());

            let source = or_exit(load_source(&input));
            let document = or_exit(parser::parse(&source, &parse.options()));

            if show_ast {
                println!("=== AST ===");
                print!("{}", String::from_utf8_lossy(&Format::Json.create().emit(&document)?));
            }

            let output_path = match output {
                Some(path) => path,
                None => format!("{}.ast", input.trim_end_matches(".brik")),
            };

            let written = or_exit(emit_document(&document, format, &output_path));
            println!("Written to: {}", output_path);
            println!("Output size: {} bytes", written);
        }
        Commands::Parse { input, json_tokens, parse } => {
            println!("Parsing {}...", input);

            let source = or_exit(load_source(&input));

            println!("=== SOURCE ===");
            println!("{}", source);
            println!("=== TOKENS ===");

            let tokens = parser::lexer::tokenize(&source);
            if json_tokens {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!(
                        "{:>4}:{:<3} {:?}",
                        token.span.line, token.span.column, token.kind
                    );
                }
            }

            println!("=== AST ===");
            let document = or_exit(parser::parser::parse_tokens(tokens, &parse.options()));
            print!("{}", String::from_utf8_lossy(&Format::Json.create().emit(&document)?));
        }
        Commands::Formats => {
            println!("Supported formats:");
            for format in Format::all() {
                println!("  {:13} - {}", format.name(), format.description());
            }
        }
    }

    Ok(())
}
