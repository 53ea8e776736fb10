pub mod worker;

use clap::Parser;
use color_eyre::eyre;

use sr_service::ScholarService;

#[derive(Debug, Parser)]
#[command(
	version = sr_cli::VERSION,
	rename_all = "kebab",
	styles = sr_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub config: sr_cli::ConfigArgs,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = args.config.load()?;
	sr_cli::init_tracing(&config.service.log_level);

	let service = ScholarService::from_config(config)?;
	let summary = worker::sync_all(&service).await;

	if !summary.failed.is_empty() {
		return Err(eyre::eyre!("Failed to sync collections: {}.", summary.failed.join(", ")));
	}

	tracing::info!(collections = summary.reports.len(), "Startup sync complete.");

	Ok(())
}
