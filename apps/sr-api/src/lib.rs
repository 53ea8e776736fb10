pub mod routes;
pub mod state;

use std::net::SocketAddr;

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;

use crate::state::AppState;

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

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let admin_addr: SocketAddr = config.service.admin_bind.parse()?;

	if !admin_addr.ip().is_loopback() {
		return Err(eyre::eyre!("admin_bind must be a loopback address."));
	}

	let state = AppState::new(config)?;
	let app = routes::router(state.clone());
	let admin_app = routes::admin_router(state);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	let http_server = axum::serve(http_listener, app);
	let admin_listener = TcpListener::bind(admin_addr).await?;

	tracing::info!(%admin_addr, "Admin server listening.");

	let admin_server = axum::serve(admin_listener, admin_app);

	tokio::try_join!(http_server, admin_server)?;

	Ok(())
}
