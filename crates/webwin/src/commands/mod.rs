pub mod call;
pub mod prepare;
pub mod stubs;

use anyhow::Result;
use webwin_config::{Config, paths::ProgramPaths};

use crate::app::WebWinApp;

/// App built from the loaded config for the running program
pub(crate) fn load_app(cfg: Config) -> Result<WebWinApp> {
    let paths = ProgramPaths::current()?;
    Ok(WebWinApp::new(cfg, paths))
}
