use clap::Parser;
use deploy_scripts::{cli::Cli, config::ScriptConfig, errors::ScriptError, logging::init_logging};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();
    let config = ScriptConfig::from_cli(&cli);

    init_logging(&config.log);

    cli.command.run(&config).await
}
