use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser};
use tracing::info;
use webwin_config::Config;
use webwin_runtime::MemoryChannel;

use crate::{
    Cli,
    app::LaunchStatus,
    commands::load_app,
    utils::styles::{fmt_bold, fmt_dimmed, fmt_success},
};

#[derive(Debug, Clone, Parser)]
pub struct PrepareCmd {
    /// Output file, the prepared page is printed to stdout when omitted
    #[arg(long, short = 'o')]
    pub out: Option<Utf8PathBuf>,
}

impl PrepareCmd {
    pub(crate) fn handle(&self, cfg: Config) -> Result<()> {
        let help = Cli::command().render_long_help().to_string();
        let app = load_app(cfg)?.with_help(&help);

        let launched = app.run(MemoryChannel::new())?;
        if launched.status != LaunchStatus::MainPage {
            bail!("Cannot prepare the main page: {}", launched.status);
        }
        let Some(document) = launched.window.channel().last_document() else {
            bail!("No document was shown");
        };

        match &self.out {
            Some(out) => {
                std::fs::write(out, document).context(format!("Failed writing {out}"))?;
                info!(
                    "{}",
                    fmt_success(&format!(
                        "{name} main page prepared in {path}",
                        name = fmt_bold(app.name()),
                        path = fmt_dimmed(out.as_str()),
                    ))
                );
            }
            None => println!("{document}"),
        }

        Ok(())
    }
}
