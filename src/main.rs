use art_valuer::core::render::render_text;
use art_valuer::utils::error::ErrorSeverity;
use art_valuer::utils::{logger, validation::Validate};
use art_valuer::{CliConfig, GeminiValuationClient, Session, ValuationError};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting art-valuer");

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Valuation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), ValuationError> {
    let config = cli.load_config()?;
    config.validate()?;
    let market = config.market.clone();

    let client = GeminiValuationClient::new(config)?;
    let mut session = Session::new(client);
    for (field, value) in cli.field_updates()? {
        session.set_field(field, value);
    }

    let result = session.submit().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_text(&result, &market));
    }

    Ok(())
}
