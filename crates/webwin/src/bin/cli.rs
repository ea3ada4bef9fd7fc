use clap::Parser;
use tracing::error;
use webwin::Cli;
use webwin_config::{
    args_file::{merge_args, read_args_file},
    paths::ProgramPaths,
};

fn main() {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "webwin".into());

    let from_file = match ProgramPaths::current().and_then(|p| read_args_file(&p.args_file)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("webwin: Failed reading args file: {e:#}");
            vec![]
        }
    };

    let cli = Cli::parse_from(merge_args(program, from_file, argv));

    if let Err(e) = cli.handle() {
        error!("{e:#}");
        std::process::exit(1);
    }
}
