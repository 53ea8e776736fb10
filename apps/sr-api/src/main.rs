use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sr_api::Args::parse();

	sr_api::run(args).await
}
