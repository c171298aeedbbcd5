use clap::{Parser as ClapParser, Subcommand};
use objfilter::ImplementationProfile;
use objfilter::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "objfilter")]
#[command(about = "objfilter - Select JSON records with boolean attribute queries")]
#[command(version)]
struct Cli {
    /// Log parsing and compilation steps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query and print the records it matches
    Check {
        /// The filter query
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't read input
        #[arg(long)]
        syntax_only: bool,

        /// Match attribute names exactly
        #[arg(long)]
        case_sensitive: bool,
    },

    /// List the operator keywords
    Operators,

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'objfilter docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    let result = match cli.command {
        Commands::Check {
            query,
            input,
            pretty,
            syntax_only,
            case_sensitive,
        } => run_check(query, input, pretty, syntax_only, case_sensitive),
        Commands::Operators => {
            print!("{}", cli::operator_table(&ImplementationProfile::default()));
            Ok(())
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    query: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
    case_sensitive: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        query,
        input,
        case_sensitive,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Matches(records) => {
            for record in &records {
                let json = if pretty {
                    serde_json::to_string_pretty(record)
                } else {
                    serde_json::to_string(record)
                }?;
                println!("{}", json);
            }
        }
    }
    Ok(())
}
