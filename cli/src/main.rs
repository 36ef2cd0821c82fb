use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gfbson::{BsonError, JsonOptions, JsonStyle};

#[derive(Parser)]
#[command(name = "gfbson")]
#[command(about = "Decode GF BSON game asset files to JSON", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a GF BSON file to JSON
    Json {
        /// Input GF BSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.json` file (printed to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,

        /// Emit JSON on a single line
        #[arg(long, conflicts_with = "indent")]
        compact: bool,

        /// Fail on unknown top-level records instead of leaving them out
        #[arg(long)]
        strict: bool,
    },

    /// Print the record tree as indented text
    Dump {
        /// Input GF BSON file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the raw record tree (tags, sizes, indices) as JSON
    Nodes {
        /// Input GF BSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.json` file (printed to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit JSON on a single line
        #[arg(long)]
        compact: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), BsonError> {
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", text))?;
            info!(path = %path.display(), bytes = text.len() + 1, "wrote output");
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), BsonError> {
    match cli.command {
        Commands::Json { input, output, indent, compact, strict } => {
            let document = gfbson::decode_file(&input)?;
            let options = JsonOptions {
                style: if compact { JsonStyle::Compact } else { JsonStyle::Pretty { indent } },
                strict,
            };
            let json = gfbson::to_json_string(&document, &options)?;
            write_output(output.as_deref(), &json)
        }

        Commands::Dump { input } => {
            let document = gfbson::decode_file(&input)?;
            print!("{}", gfbson::dump(&document));
            Ok(())
        }

        Commands::Nodes { input, output, compact } => {
            let document = gfbson::decode_file(&input)?;
            let style = if compact { JsonStyle::Compact } else { JsonStyle::default() };
            let json = gfbson::nodes_to_json(&document, style)?;
            write_output(output.as_deref(), &json)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
