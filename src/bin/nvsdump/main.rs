use anyhow::Result;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod util;
mod cmd_detect;
mod cmd_parse;
mod cmd_pages;
mod cmd_entries;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт: info.
    // Пример: RUST_LOG=debug nvsdump parse --path nvs.bin
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        // Логируем ошибку и выходим с кодом 1.
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Detect { path, json } =>
            cmd_detect::exec(path, json),

        cli::Cmd::Parse { path, json, format_version } =>
            cmd_parse::exec(path, json, format_version),

        cli::Cmd::Pages { path, json, format_version } =>
            cmd_pages::exec(path, json, format_version),

        cli::Cmd::Entries { path, namespace, json, format_version } =>
            cmd_entries::exec(path, namespace, json, format_version),
    }
}
