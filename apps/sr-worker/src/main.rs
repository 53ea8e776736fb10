use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sr_worker::Args::parse();

	sr_worker::run(args).await
}
