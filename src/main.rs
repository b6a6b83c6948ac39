//! rulewatch - rule engine and resource monitor
//!
//! A command-line tool for managing condition/action rules, submitting
//! events against them, and alerting on host CPU and memory usage.

use clap::Parser;
use rulewatch::cli::args::{generate_completions, Cli, Commands};
use rulewatch::commands::{run_event, run_monitor, run_rules, run_stats, run_thresholds};
use rulewatch::config::ConfigBuilder;
use rulewatch::error::{AppError, ConfigError, RegistryError, SampleError};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let monitor_interval = match &cli.command {
        Commands::Monitor(args) => args.interval,
        _ => None,
    };

    let builder = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose.then_some(true))
        .with_store_path(cli.store.clone())
        .with_memory_store(cli.in_memory)
        .with_interval_ms(monitor_interval);
    let settings_path = builder.settings_path();
    let config = builder.build();

    if config.general.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    match &cli.command {
        Commands::Rules(args) => run_rules(&args.command, &config, cli.format),

        Commands::Event(args) => run_event(args, &config, cli.format),

        Commands::Stats => run_stats(&config, cli.format),

        Commands::Thresholds(args) => {
            run_thresholds(&args.command, &config, &settings_path, cli.format)
        }

        Commands::Monitor(args) => run_monitor(args, &config, &settings_path, cli.format),

        Commands::Completions { .. } => Ok(()),
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Registry(RegistryError::NotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Run 'rulewatch rules list' to see registered rules.");
        }
        AppError::Registry(RegistryError::Persistence(_)) => {
            eprintln!();
            eprintln!("Hint: Check that the rule store path is writable,");
            eprintln!("      or pass --in-memory to skip persistence.");
        }
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Check the --config path or the RULEWATCH_CONFIG variable.");
        }
        AppError::Sample(SampleError::Unavailable(_)) => {
            eprintln!();
            eprintln!("Hint: Host CPU and memory metrics are not available on this system.");
        }
        _ => {}
    }
}
