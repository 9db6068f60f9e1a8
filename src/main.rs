use clap::Parser;
use colored::Colorize;
use tracing::info;

use tinylink::cli::{Cli, Commands, ConfigCommands, config_generate};
use tinylink::config::init_config;
use tinylink::errors::TinylinkError;
use tinylink::runtime::run_server;
use tinylink::system::init_logging;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        match e.downcast_ref::<TinylinkError>() {
            Some(err) => eprintln!("{}\n  {:#}", err.format_colored(), e),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force),
        Commands::Serve => {
            let config = init_config(&cli.config)
                .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

            // guard 必须活到进程结束
            let _guard = init_logging(&config.logging)?;
            info!("tinylink v{} starting", env!("CARGO_PKG_VERSION"));

            run_server(&config).await
        }
    }
}
