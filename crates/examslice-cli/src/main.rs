mod autocrop_cmd;
mod cli;
mod detect_cmd;
mod index_cmd;
mod render_cmd;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Detect {
            ref doc_key,
            ref root,
            ref format,
            dpi,
        } => detect_cmd::run(doc_key, root, format, dpi),
        cli::Commands::Autocrop {
            ref doc_key,
            ref root,
            ref format,
            dpi,
            save,
            reset,
        } => autocrop_cmd::run(doc_key, root, format, dpi, save, reset),
        cli::Commands::Render {
            ref doc_key,
            ref root,
            dpi,
            question,
            all,
        } => render_cmd::run(doc_key, root, dpi, question, all),
        cli::Commands::Index {
            ref root,
            force,
            ref texts,
            dpi,
        } => index_cmd::run(root, force, texts.as_deref(), dpi),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
