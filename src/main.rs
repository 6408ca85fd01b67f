use clap::Parser;
use incident_catalog::{cli, errors};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let result = cli::export::handle_export(cli.export, cli.quiet).await;

    if let Err(e) = result {
        let class = e.classify();
        match class.tier {
            errors::ErrorTier::Fatal => {
                tracing::error!(error_type = class.error_type, "Run aborted");
                eprintln!("Error: {}", e);
            }
            errors::ErrorTier::Recoverable => {
                tracing::warn!(error_type = class.error_type, error = %e, "Run finished with errors");
            }
        }
        std::process::exit(e.exit_code());
    }
}
