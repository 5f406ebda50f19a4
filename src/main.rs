//! Olist Geo Dashboard - command-line entry point.

use anyhow::Context;
use clap::Parser;
use olist_geo_dashboard::config::Cli;
use olist_geo_dashboard::dashboard::{Dashboard, HtmlDashboard};
use olist_geo_dashboard::data::HttpTransport;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = cli.load_config()?;
    let output = config.output.clone();

    let transport = HttpTransport::new()?;
    let mut dashboard = Dashboard::new(config, transport);
    let mut page = HtmlDashboard::new();

    dashboard.run(&mut page)?;
    page.write_to(&output)
        .with_context(|| format!("writing {}", output.display()))?;

    if cli.open {
        open::that(&output).with_context(|| format!("opening {}", output.display()))?;
    }
    Ok(())
}
