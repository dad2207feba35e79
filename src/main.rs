use clap::Parser;

use routegen::Settings;
use routegen::cli::commands::{generate, init, link, routes};
use routegen::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        // init must still be able to replace a broken settings file
        Err(e) if matches!(cli.command, Commands::Init { .. }) => {
            eprintln!("Configuration error: {e}");
            Settings::default()
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    routegen::logging::init_with_config(&settings.logging);

    let result = match cli.command {
        Commands::Init { force } => init::run_init(force),
        Commands::Config => init::run_config(&settings),
        Commands::Generate { watch, app_dir } => {
            generate::run(generate::GenerateArgs { watch, app_dir }, settings).await
        }
        Commands::Routes { app_dir, json } => routes::run(settings, app_dir, json).await,
        Commands::Link {
            route,
            params,
            query,
            hash,
            app_dir,
        } => {
            let args = link::LinkArgs {
                route,
                params,
                query,
                hash,
                app_dir,
            };
            link::run(args, settings).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Load settings from `-c` or the discovered `.routegen/settings.toml`.
///
/// An explicit `-c` path must exist; a malformed file is an error either way.
fn load_settings(cli: &Cli) -> Result<Settings, String> {
    match &cli.config {
        Some(path) if !path.is_file() => Err(format!(
            "settings file {} does not exist",
            path.display()
        )),
        Some(path) => Settings::load_from(path).map_err(|e| e.to_string()),
        None => Settings::load().map_err(|e| e.to_string()),
    }
}
