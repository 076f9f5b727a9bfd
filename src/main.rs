use canopy::cli::commands::Cli;
use canopy::cli::handlers;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    let store = cli.store.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = canopy::tui::run(store.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
