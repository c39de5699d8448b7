use clap::Parser;
use ocr_router::cli::{
    backends, handle_completions, handle_config_init, health, BackendsCommands, Cli, Commands,
    ConfigCommands,
};
use ocr_router::config::OrchestratorConfig;
use std::path::Path;
use std::sync::Arc;

/// Load the config file if present, otherwise fall back to defaults.
fn load_config_or_default(path: &Path) -> Result<OrchestratorConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        OrchestratorConfig::load(Some(path))?
    } else {
        OrchestratorConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve(args) => ocr_router::cli::serve::run_serve(args).await,
        Commands::Backends(cmd) => match cmd {
            BackendsCommands::List(args) => {
                let config = load_config_or_default(&args.config)?;
                let registry = config.build_registry()?;
                println!("{}", backends::handle_backends_list(&args, &registry)?);
                Ok(())
            }
        },
        Commands::Health(args) => {
            let config = load_config_or_default(&args.config)?;
            let registry = Arc::new(config.build_registry()?);
            let transport = ocr_router::cli::serve::build_transport(&config)?;
            let output =
                health::handle_health(&args, registry, &config.health_check, transport).await?;
            println!("{}", output);
            Ok(())
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
