use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use srcref_showcase::config::ShowcaseConfig;
use srcref_showcase::display::{render_source, DisplayTree, Tokenize};
use srcref_showcase::logging::init_tracing;
use srcref_showcase::showcase::{run_interactive_mode, run_stdio_mode, Showcase};

/// Highlights traced source references in a rendered code panel.
#[derive(Parser, Debug)]
#[command(name = "srcref-showcase", version, about)]
struct Args {
    /// Serve Content-Length framed JSON messages on stdin/stdout
    #[arg(long)]
    stdio: bool,

    /// Source file rendered into the code panel at startup
    #[arg(long)]
    code: Option<PathBuf>,

    /// Wrap identifier and number tokens in inline containers
    #[arg(long)]
    tokens: bool,

    /// JSON config file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_tracing(args.log_file.as_deref()) {
        eprintln!("cannot open log file: {err}");
        return ExitCode::FAILURE;
    }
    info!(?args, "starting");

    let config = match &args.config {
        Some(path) => match ShowcaseConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, "bad config");
                return ExitCode::FAILURE;
            }
        },
        None => ShowcaseConfig::default(),
    };

    let source = match &args.code {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                error!(path = %path.display(), %err, "cannot read code file");
                return ExitCode::FAILURE;
            }
        },
        None => String::new(),
    };
    let mode = if args.tokens {
        Tokenize::Words
    } else {
        Tokenize::Plain
    };
    let tree = match render_source(&source, &config.code_root_id, &config.wrapper_tag, mode) {
        Ok(tree) => tree,
        Err(err) => {
            error!(%err, "cannot render code panel");
            DisplayTree::new("div")
        }
    };

    let mut showcase = Showcase::new(config, tree);
    let result = if args.stdio {
        run_stdio_mode(&mut showcase).map_err(|e| e.to_string())
    } else {
        run_interactive_mode(&mut showcase).map_err(|e| e.to_string())
    };

    match result {
        Ok(()) => {
            info!("exiting");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "session ended with an error");
            ExitCode::FAILURE
        }
    }
}
