use std::io::Write;

use webwin_config::logger::{LogLevel, LoggerConfig, LoggerFormat};

const WHITELISTED_CRATES: &[&str] = &[
    "webwin",
    "webwin_runtime",
    "webwin_codegen",
    "webwin_config",
];

pub(crate) fn default_env_filter(level: &str) -> String {
    let mut filters: Vec<String> = WHITELISTED_CRATES
        .iter()
        .map(|crate_name| format!("{crate_name}={level}"))
        .collect();

    // Set default level for all other crates to warn
    filters.insert(0, "warn".to_string());

    filters.join(",")
}

/// Level picked by the `-v`/`-q` flags, or by the config when neither is given
pub(crate) fn resolve_level(cfg: &LoggerConfig, verbose: u8, quiet: bool) -> LogLevel {
    if quiet || verbose > 0 {
        LogLevel::from_flags(verbose, quiet)
    } else {
        cfg.level
    }
}

pub fn init_cli_logger(cfg: &LoggerConfig, verbose: u8, quiet: bool) {
    if !cfg.enabled && verbose == 0 {
        return;
    }
    let level_str = resolve_level(cfg, verbose, quiet).as_str();

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_env_filter(level_str)),
    );

    if !cfg.colors {
        builder.write_style(env_logger::WriteStyle::Never);
    }

    if let Some(path) = &cfg.file {
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("webwin: Failed opening log file {path}: {e}"),
        }
    }

    if cfg.format == LoggerFormat::Full {
        builder.format_timestamp_secs().format_module_path(true);
    } else if ["info", "warn", "error"].contains(&level_str) {
        // info lines stay bare, only warnings and errors get a level tag
        builder.format(|buf, record| {
            if record.level() == tracing::log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                let log_style = buf.default_level_style(record.level());
                writeln!(
                    buf,
                    "{log_style}[{}]{log_style:#} {}",
                    record.level(),
                    record.args()
                )
            }
        });
    }

    if let Err(e) = builder.try_init() {
        eprintln!("webwin: Failed initializing env_logger: {e:?}");
    }
}
