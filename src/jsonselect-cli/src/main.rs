use std::io::{self, Write};
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::CommandFactory;
use clap_complete::generate;

use jsonselect_cli::cli::{parse_args, Cli, CliConfig, Commands, OutputMode};
use jsonselect_cli::config::Config;
use jsonselect_cli::executor::Executor;

fn main() {
    #[cfg(feature = "profiling")]
    coz::thread_init();

    // Piping into `head` closes stdout early; treat that as a clean exit
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
            if payload.contains("Broken pipe") {
                process::exit(0);
            }
        } else if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
            if payload.contains("Broken pipe") {
                process::exit(0);
            }
        }
        default_panic(panic_info);
    }));

    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        print_version();
        return;
    }

    match run() {
        Ok(code) => process::exit(code),
        Err(e) if is_broken_pipe(&e) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("BUILD_DATE").unwrap_or("unknown");
    let rustc_version = option_env!("RUSTC_VERSION").unwrap_or("unknown");

    println!("jsel {}", version);
    println!("Library: jsonselect {}", jsonselect::VERSION);
    println!("Commit: {}", git_hash);
    println!("Built: {}", build_date);
    println!("Rustc: {}", rustc_version);

    #[cfg(feature = "profiling")]
    println!("Features: profiling");
}

/// Run the command line and return the process exit code
fn run() -> Result<i32> {
    let args = parse_args();
    let cli_config = CliConfig::from(&args);

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(config_path) = &cli_config.config_file {
        config
            .merge_file(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
    }
    config.apply_cli(&cli_config);

    setup_logging(&config);

    if let Some(command) = args.command {
        return handle_command(command, config);
    }

    let selector = cli_config
        .selector
        .as_deref()
        .ok_or_else(|| anyhow!("No selector given, see `jsel --help`"))?;

    let mut executor = Executor::new(config);
    let documents = match cli_config.mode {
        OutputMode::Ast => Vec::new(),
        _ => executor.load_documents(&cli_config.input_files)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let count = executor.execute(selector, cli_config.mode, &documents, &mut out)?;
    out.flush()?;

    log::debug!("{} match(es) from {} document(s)", count, documents.len());
    if cli_config.exit_status && count == 0 && !documents.is_empty() {
        return Ok(1);
    }
    Ok(0)
}

fn handle_command(command: Commands, config: Config) -> Result<i32> {
    match command {
        Commands::Validate { selector } => {
            let executor = Executor::new(config);
            match executor.validate_selector(&selector) {
                Ok(()) => {
                    println!("Selector is valid: {}", selector);
                    Ok(0)
                }
                Err(e) => {
                    eprintln!("Selector is invalid: {}", e);
                    Ok(1)
                }
            }
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(0)
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn setup_logging(config: &Config) {
    let log_level = match config.debug.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}
