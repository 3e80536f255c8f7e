use clap::Parser;
use memory_stream::utils::{logger, validation::Validate};
use memory_stream::{
    resolve_client, CliConfig, LogFormat, MemoryStreamReader, Settings, StreamError,
};

async fn run(settings: &Settings) -> Result<String, StreamError> {
    settings.validate()?;
    let client = resolve_client(settings)?;
    MemoryStreamReader::from_config(client, settings).read().await
}

fn report(e: &StreamError) -> ! {
    tracing::error!(
        "❌ Failed to read memory stream: {} (Category: {:?})",
        e,
        e.category()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => report(&e),
    };

    match run(&settings).await {
        Ok(decoded) => println!("{}", decoded),
        Err(e) => report(&e),
    }
}
