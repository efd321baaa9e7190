use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use activity_signup::config::{AppState, Config};
use activity_signup::logger;
use activity_signup::server::{self, SignalHandler};

const DEFAULT_CONFIG: &str = "config";

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run { config_path: String },
    Help,
    Version,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut config_path = DEFAULT_CONFIG.to_string();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => {
                config_path = args
                    .next()
                    .ok_or_else(|| format!("{arg} requires a path argument"))?;
            }
            other => match other.strip_prefix("--config=") {
                Some(path) => config_path = path.to_string(),
                None => return Err(format!("Unknown argument: {other}")),
            },
        }
    }

    Ok(Command::Run { config_path })
}

fn usage() -> String {
    format!(
        "Usage: {name} [OPTIONS]\n\n\
         Options:\n  \
         -c, --config <PATH>  Config file without extension (default: {DEFAULT_CONFIG})\n  \
         -h, --help           Print help\n  \
         -V, --version        Print version\n\n\
         Environment overrides use the SIGNUP_ prefix, e.g. SIGNUP_SERVER__PORT=9000",
        name = env!("CARGO_PKG_NAME")
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run { config_path }) => config_path,
        Ok(Command::Help) => {
            println!("{}", usage());
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage());
            std::process::exit(2);
        }
    };

    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let state = AppState::from_config(cfg)?;

    // Tokio runtime sized by the `workers` setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(state.shared()))
}

async fn async_main(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    logger::log_catalog_loaded(
        state.catalog.activity_count().await,
        state.config.catalog.seed_file.as_deref(),
    );

    let addr = state.config.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &state.config);

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let active_connections = Arc::new(AtomicUsize::new(0));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            state,
            active_connections,
            Arc::clone(&signals.shutdown),
        ))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse_args(args(&[])),
            Ok(Command::Run { config_path: "config".to_string() })
        );
        assert_eq!(
            parse_args(args(&["-c", "deploy/prod"])),
            Ok(Command::Run { config_path: "deploy/prod".to_string() })
        );
        assert_eq!(
            parse_args(args(&["--config=local"])),
            Ok(Command::Run { config_path: "local".to_string() })
        );
        assert_eq!(parse_args(args(&["--help"])), Ok(Command::Help));
        assert_eq!(parse_args(args(&["-c", "x", "-V"])), Ok(Command::Version));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--port", "80"])).is_err());
    }
}
