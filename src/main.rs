// memcli - command-line front end for course teaching
use memcli::cli::args::{Invocation, ParsedArguments};
use memcli::cli::commands::{route, run_command, Route};
use memcli::cli::options::{CONFIG, VERBOSE};
use memcli::cli::output::ConsoleWriter;
use memcli::infrastructure::config::ConfigManager;
use memcli::infrastructure::http::HttpClientFactory;
use memcli::infrastructure::logging::init_logging;
use memcli::{MemCliConfig, MemCliResult, Outcome};
use std::path::Path;

/// `--config` when given (the file must exist), otherwise the default location.
fn load_config(args: &ParsedArguments) -> MemCliResult<MemCliConfig> {
    match args.get(&CONFIG) {
        Some(path) => ConfigManager::load_config_from_path(Path::new(path)),
        None => ConfigManager::new()?.load_config(),
    }
}

async fn run() -> MemCliResult<Outcome> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let invocation = Invocation::parse(&argv);
    let mut writer = ConsoleWriter::stdio();

    // help and unknown commands never touch the config file
    let entry = match route(&invocation, &mut writer)? {
        Route::Command(entry) => entry,
        Route::Done(outcome) => return Ok(outcome),
    };

    let args = invocation.arguments();
    let config = load_config(&args)?;
    if let Err(e) = init_logging(&config.global.log_level, args.has(&VERBOSE)) {
        eprintln!("Warning: {}", e);
    }

    run_command(entry, &invocation, &config, &HttpClientFactory, &mut writer).await
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(outcome) => tracing::debug!(?outcome, "done"),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
