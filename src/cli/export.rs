use std::time::Instant;

use chrono::Local;
use console::style;
use tracing::info;

use crate::auth::DeviceCodeAuthenticator;
use crate::cli::commands::ExportArgs;
use crate::errors::CatalogError;
use crate::graph::GraphClient;
use crate::pipeline::run_catalog;
use crate::utils::formatting::format_duration;

pub async fn handle_export(args: ExportArgs, quiet: bool) -> Result<(), CatalogError> {
    let config = args.to_config();
    let started = Instant::now();
    info!(days = config.lookback_days, page_size = config.page_size, "Starting incident catalog export");

    let authenticator = DeviceCodeAuthenticator::new(&config.tenant, &config.client_id);
    let session = authenticator
        .establish_session(|code| {
            println!("\n{} {}", style("🔑").yellow(), style(code.prompt()).yellow().bold());
        })
        .await?;

    if !quiet {
        println!(
            "{} Connected as {} (tenant {})",
            style("✓").green(),
            style(&session.account).cyan(),
            style(&session.tenant_id).cyan(),
        );
        if !session.scopes.is_empty() {
            println!("  Scopes: {}", style(session.scopes.join(", ")).dim());
        }
    }

    let outcome = {
        let client = GraphClient::new(&session);
        run_catalog(&client, &config, Local::now(), Local::now, quiet).await
    };
    session.close();

    let report = outcome?;
    if !quiet {
        println!(
            "\n{} Done in {} ({} exported, {} skipped)",
            style("✓").green().bold(),
            format_duration(started.elapsed().as_millis() as u64),
            report.records.len(),
            report.skipped.len(),
        );
    }
    Ok(())
}
