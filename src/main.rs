use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use prpost::cli::{self, Cli};
use prpost::config::Config;

fn init_tracing(verbose: bool) {
    let default = if verbose { "prpost=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PRPOST_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help / --version are not errors
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };
    init_tracing(args.verbose);

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    match cli::run(args.command, &config).await {
        Ok(submitted) => {
            if submitted.downgraded {
                eprintln!(
                    "Notice: you cannot request changes on your own pull request; posted as a comment instead."
                );
            }
            println!("{}", cli::describe(&submitted));
            ExitCode::SUCCESS
        }
        Err(prpost::error::PostError::Interrupted) => {
            eprintln!("\nInterrupted by user");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
