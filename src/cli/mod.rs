//! The harness command-line interface.
//!
//! This module is the entry point for the binary and orchestrates the library:
//! build the registry, discover the suite, run it, and print the report.

use std::fs;
use std::time::Duration;

use termcolor::{ColorChoice, StandardStream};
use tracing::info;

use crate::case::render_detail;
use crate::cli::args::{OutputFormat, TesterArgs};
use crate::config::{FailurePolicy, HarnessConfig};
use crate::diagnostics::{HarnessError, HarnessResult};
use crate::executor::{HttpExecutor, QueryExecutor, StaticExecutor};
use crate::registry::build_default_validator_registry;
use crate::report::ReportBuilder;
use crate::suite::{DirectoryLister, TestSuite};

pub mod args;
pub mod output;

/// Builds the harness configuration from parsed arguments.
pub fn config_from_args(args: &TesterArgs) -> HarnessResult<HarnessConfig> {
    let mut config = HarnessConfig {
        endpoint: args.endpoint.clone(),
        user_agent: args.user_agent.clone(),
        viewer_base: args.viewer_base.clone(),
        extension: args.extension.clone(),
        timeout: Duration::from_secs(args.timeout),
        failure_policy: if args.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Isolate
        },
        ..HarnessConfig::default()
    };
    if let Some(path) = &args.prefix_file {
        let prefix = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        config.prefix = prefix;
    }
    Ok(config)
}

/// Runs the harness. Returns `true` when every test passed.
pub fn run(args: &TesterArgs) -> HarnessResult<bool> {
    let registry = build_default_validator_registry();
    let config = config_from_args(args)?;
    let choice = if config.use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    if args.list_validators {
        for name in registry.names() {
            if let Some(resolved) = registry.get(&name) {
                println!("{:<20} {}", name, resolved.validator.description());
            }
        }
        return Ok(true);
    }

    let lister = DirectoryLister::new(config.extension.clone());
    let suite = TestSuite::discover(&args.dir, &lister, &registry, &config)?;
    info!(count = suite.len(), "suite ready");

    let executor: Box<dyn QueryExecutor> = if args.offline {
        Box::new(StaticExecutor::sample())
    } else {
        Box::new(HttpExecutor::new(&config)?)
    };
    let outcomes = suite.run(executor.as_ref())?;

    if args.details {
        for (case, outcome) in suite.cases().iter().zip(&outcomes) {
            if let Some(result) = outcome.result() {
                write_or_log(output::write_detail(&mut stdout, &render_detail(case, result)));
            }
        }
    }

    let table = ReportBuilder::build(&outcomes);
    match args.format {
        OutputFormat::Text => write_or_log(output::write_report(&mut stdout, &table)),
        OutputFormat::Json => print_json(table.to_json()),
        OutputFormat::Publish => print_json(serde_json::to_string_pretty(&table.publish_rows())),
    }

    Ok(!table.summary().has_failures())
}

fn print_json(rendered: serde_json::Result<String>) {
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("failed to serialise report: {}", e),
    }
}

fn write_or_log(result: std::io::Result<()>) {
    if let Err(e) = result {
        tracing::error!("failed to write output: {}", e);
    }
}
