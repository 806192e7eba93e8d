//! plan-check CLI entry point
//!
//! Automated checks for radiotherapy treatment plans.

use clap::Parser;
use plan_check::checks::catalog;
use plan_check::cli::args::{Args, CheckArgs, Command};
use plan_check::cli::session::{run_session, EXIT_FATAL};
use plan_check::config::ConfigFile;
use plan_check::engine::orchestrator::panic_message;
use plan_check::host::snapshot::SnapshotHost;
use plan_check::version::get_build_info;
use plan_check::{logging, PlanCheckConfig, PlanCheckError};

use std::error::Error;
use std::io::{self, IsTerminal};
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    match args.command {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::List => {
            print_rule_list();
            ExitCode::SUCCESS
        }
        Command::Check(check) => run_check(&check),
    }
}

fn print_rule_list() {
    let rules = catalog();
    let mut current = None;

    println!("Rule catalog:");
    for rule in &rules {
        if current != Some(rule.group) {
            println!();
            println!("{}:", rule.group.name().to_uppercase());
            current = Some(rule.group);
        }
        println!("  {:<20} {:<28} {}", rule.category.name(), rule.item, rule.on_failure.name());
    }
}

fn run_check(args: &CheckArgs) -> ExitCode {
    let file = match ConfigFile::discover(args.config.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            // No config means no configured log dir; stderr only
            let _guard = logging::init(args.log_dir.as_deref());
            let chain = error_chain(&e);
            tracing::error!(error = %chain, "failed to load configuration");
            eprintln!("Error: {}", chain);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let log_dir = args.log_dir.clone().or_else(|| file.log_dir.clone());
    let _guard = logging::init(log_dir.as_deref());

    let mut config = PlanCheckConfig::from_args(args, &file);
    config.wait_for_user = config.wait_for_user && io::stdin().is_terminal();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let host = SnapshotHost::load(&args.snapshot).map_err(PlanCheckError::HostUnavailable)?;
        let stdout = io::stdout();
        let stdin = io::stdin();
        run_session(&host, &config, &mut stdout.lock(), &mut stdin.lock())
    }))
    .unwrap_or_else(|payload| Err(PlanCheckError::Aborted(panic_message(payload.as_ref()))));

    match outcome {
        Ok(session) => ExitCode::from(session.exit_code()),
        Err(e) => {
            let chain = error_chain(&e);
            tracing::error!(error = %chain, "plan check aborted");
            eprintln!("Error: {}", chain);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// `error: cause: cause` for display
fn error_chain(e: &dyn Error) -> String {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
