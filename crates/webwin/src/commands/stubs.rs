use anyhow::Result;
use clap::Parser;
use tracing::debug;
use webwin_config::Config;

use crate::commands::load_app;

#[derive(Debug, Clone, Parser)]
pub struct StubsCmd {
    /// Print the exposed names instead of the bundle
    #[arg(long)]
    pub names: bool,
}

impl StubsCmd {
    pub(crate) fn handle(&self, cfg: Config) -> Result<()> {
        let bridge = load_app(cfg)?.bridge()?;
        debug!(names =? bridge.dispatcher().names(), "Built bridge");

        if self.names {
            for name in bridge.dispatcher().names() {
                println!("{name}");
            }
        } else {
            print!("{}", bridge.bundle());
        }

        Ok(())
    }
}
