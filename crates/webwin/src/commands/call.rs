use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use webwin_config::Config;
use webwin_runtime::CallResponse;

use crate::{commands::load_app, utils::styles::fmt_error};

#[derive(Debug, Clone, Parser)]
pub struct CallCmd {
    /// Exposed name, `<alias>.<method>` for object methods
    pub name: String,

    /// JSON array of positional arguments
    #[arg(default_value = "")]
    pub payload: String,
}

impl CallCmd {
    pub(crate) fn handle(&self, cfg: Config) -> Result<()> {
        let bridge = load_app(cfg)?.bridge()?;
        let res = bridge
            .dispatch(&self.name, &self.payload)
            .context(format!("Failed calling {}", self.name))?;

        match CallResponse::decode(&res) {
            Ok(CallResponse::Failure { msg }) => error!("{}", fmt_error(&msg)),
            Ok(CallResponse::Success { .. }) => info!("{} succeeded", self.name),
            Err(e) => error!("Unexpected response: {e}"),
        }
        println!("{res}");

        Ok(())
    }
}
