//! Clap command definition and flag overrides.

use crate::config::ServerConfig;
use crate::error::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Build the `metadir` command.
pub fn build_cli() -> Command {
    Command::new("metadir")
        .about("Serve versioned cluster metadata over HTTP")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Config file (default: none, built-in defaults)"),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .value_name("ADDR")
                .help("Public listen address (default: :80)"),
        )
        .arg(
            Arg::new("listen-reload")
                .long("listen-reload")
                .value_name("ADDR")
                .help("Reload listen address (default: 127.0.0.1:8112)"),
        )
        .arg(
            Arg::new("xff")
                .long("xff")
                .help("Use X-Forwarded-For header as the client address")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .help("Debug logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILE")
                .help("Append logs to this file"),
        )
        .arg(
            Arg::new("answers")
                .long("answers")
                .value_name("FILE")
                .help("Snapshot file to load on start and reload"),
        )
        .arg(
            Arg::new("print-config")
                .long("print-config")
                .help("Print the default config file and exit")
                .action(ArgAction::SetTrue),
        )
}

/// Load the config file (if given) and apply flag overrides.
pub fn resolve_config(matches: &ArgMatches) -> Result<ServerConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ServerConfig::from_file(&PathBuf::from(path))?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = matches.get_one::<String>("listen") {
        config.listen = listen.clone();
    }
    if let Some(listen) = matches.get_one::<String>("listen-reload") {
        config.listen_reload = listen.clone();
    }
    if matches.get_flag("xff") {
        config.enable_xff = true;
    }
    if matches.get_flag("debug") {
        config.debug = true;
    }
    if let Some(log) = matches.get_one::<String>("log") {
        config.log_file = Some(PathBuf::from(log));
    }
    if let Some(answers) = matches.get_one::<String>("answers") {
        config.source.path = Some(PathBuf::from(answers));
    }
    config.listen_addr()?;
    config.reload_addr()?;
    Ok(config)
}
