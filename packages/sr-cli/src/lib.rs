use std::path::PathBuf;

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file flag shared by the service binaries.
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}
impl ConfigArgs {
	pub fn load(&self) -> sr_config::Result<sr_config::Config> {
		sr_config::load(&self.config)
	}
}

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Green.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
}

/// Installs the global fmt subscriber for the service binaries.
pub fn init_tracing(log_level: &str) {
	tracing_subscriber::fmt().with_env_filter(log_filter(log_level)).init();
}

/// An unparseable `log_level` falls back to `info`.
fn log_filter(log_level: &str) -> EnvFilter {
	EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::*;

	#[derive(Debug, Parser)]
	struct Cli {
		#[command(flatten)]
		config: ConfigArgs,
	}

	#[test]
	fn parses_short_config_flag() {
		let cli = Cli::try_parse_from(["sr", "-c", "sr.toml"]).expect("parse");

		assert_eq!(cli.config.config, PathBuf::from("sr.toml"));
	}

	#[test]
	fn malformed_log_level_falls_back_to_info() {
		assert_eq!(log_filter("sr_service=debug").to_string(), "sr_service=debug");
		assert_eq!(log_filter("sr_service=[").to_string(), "info");
	}
}
