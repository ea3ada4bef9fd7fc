pub mod app;
pub mod commands;
pub mod fs;
pub mod utils;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use webwin_config::{BrowserKind, Config, WindowSize};

pub use webwin_codegen as codegen;
pub use webwin_config as config;
pub use webwin_runtime::{
    Bridge, BridgeBuilder, BridgeError, Channel, Exposable, Function, MemoryChannel,
    ShowOptions, Window,
};

use crate::{
    commands::{call::CallCmd, prepare::PrepareCmd, stubs::StubsCmd},
    utils::logger::init_cli_logger,
};

#[derive(Debug, Parser)]
#[command(name = "webwin")]
#[command(version)]
#[command(args_override_self = true)]
#[command(about = "WebWin - web front ends for Rust backends")]
#[command(
    long_about = "WebWin shows a web page in a browser window and lets its scripts call backend \
functions as if they were local async functions.\n\n\
Arguments are also read from <program>.args next to the executable, the command line wins over \
the args file."
)]
#[command(after_help = "EXAMPLES:\n  \
    webwin --webroot ./ui prepare --out prepared.html\n  \
    webwin stubs\n  \
    webwin call fs.ls '[\".\", \"*.html\"]'\n\
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub app: AppArgs,

    /// Config file path, defaults to ./webwin.json
    #[arg(long, short = 'c', global = true, default_value_t = Config::default_path())]
    pub config: Utf8PathBuf,

    /// No logging except for warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Verbose logging (-v) or trace logging (-vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Window settings overriding the config file
#[derive(Debug, Clone, Default, Args)]
pub struct AppArgs {
    /// Document root (relative or absolute) [default: current directory]
    #[arg(long)]
    pub webroot: Option<Utf8PathBuf>,

    /// Main page of the app, relative to the webroot [default: index.html]
    #[arg(long, value_name = "HTML_FILE")]
    pub mainpage: Option<String>,

    /// Port to serve on, required for pages using browser storage [default: random]
    #[arg(long)]
    pub port: Option<u16>,

    /// Browser to use, must be installed [default: system default]
    #[arg(long)]
    pub browser: Option<BrowserKind>,

    /// Window size
    #[arg(long, value_name = "WIDTH,HEIGHT")]
    pub size: Option<WindowSize>,

    /// Script files the main page must not load
    #[arg(long = "del-js", value_name = "DEL.JS", value_delimiter = ',')]
    pub del_js: Vec<String>,

    /// Script files to run once the main page is shown (relative or absolute)
    #[arg(long = "run-js", value_name = "PATH/RUN.JS", value_delimiter = ',')]
    pub run_js: Vec<Utf8PathBuf>,
}

impl AppArgs {
    /// Applies the given arguments on top of `cfg`
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(webroot) = &self.webroot {
            cfg.window.webroot.clone_from(webroot);
        }
        if let Some(mainpage) = &self.mainpage {
            cfg.window.mainpage.clone_from(mainpage);
        }
        if let Some(port) = self.port {
            cfg.window.port = port;
        }
        if let Some(browser) = self.browser {
            cfg.window.browser = browser;
        }
        if let Some(size) = self.size {
            cfg.window.size = size;
        }
        if !self.del_js.is_empty() {
            cfg.del_js.clone_from(&self.del_js);
        }
        if !self.run_js.is_empty() {
            cfg.run_js.clone_from(&self.run_js);
        }
    }
}

impl Cli {
    #[allow(clippy::missing_errors_doc)]
    pub fn handle(&self) -> anyhow::Result<()> {
        let cfg = Config::load_or_default(&self.config);
        let logger = cfg
            .as_ref()
            .map(|c| c.logger.clone())
            .unwrap_or_default();
        init_cli_logger(&logger, self.verbose, self.quiet);

        let mut cfg = cfg?;
        self.app.apply(&mut cfg);

        match &self.command {
            Commands::Prepare(cmd) => cmd.handle(cfg),
            Commands::Stubs(cmd) => cmd.handle(cfg),
            Commands::Call(cmd) => cmd.handle(cfg),
        }
    }
}

#[derive(Debug, Subcommand)]
#[command(styles=utils::styles::get_styles())]
pub enum Commands {
    /// Prepare the main page the way it would be shown
    #[command(
        long_about = "Reads the main page, comments out the --del-js scripts and injects the \
charset meta tag, the transport loader and the webwin stub bundle. The result is written to \
stdout or to --out."
    )]
    Prepare(PrepareCmd),

    /// Print the webwin stub bundle
    #[command(long_about = "Prints the webwin.js bundle generated for the built-in objects.")]
    Stubs(StubsCmd),

    /// Call an exposed function and print the response
    #[command(
        long_about = "Dispatches one call through the built-in bridge, as the front end would, \
and prints the JSON response envelope."
    )]
    Call(CallCmd),
}
