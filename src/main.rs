use anyhow::Result;
use clap::Parser;

use autosales::cli::handlers::{
    CommandContext, handle_chat, handle_init, handle_intents, handle_serve,
};
use autosales::cli::{Cli, Commands};
use autosales::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.clone());

    match cli.command {
        Commands::Init { force } => handle_init(force),
        Commands::Intents { json } => handle_intents(json),
        Commands::Serve { host, port } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            handle_serve(ctx, host, port)
        }
        Commands::Chat {
            prompt,
            payload,
            classifier,
        } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            handle_chat(ctx, prompt, payload, classifier)
        }
    }
}
