//! Nibbler CLI binary entry point.
//! Parses options, runs the engine, then drives the presentation pipeline.

use anyhow::{Context, Result};
use nibbler::cli::{self, Invocation};
use nibbler::config;
use nibbler::interactive::spawn_line_reader;
use nibbler::lint::{Engine, EngineOptions, LineEngine};
use nibbler::output::FormatterRegistry;
use nibbler::pipeline::{Pipeline, EXIT_FAILURE, EXIT_OK};
use nibbler::utils;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NIBBLER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", utils::error_prefix(), e);
            EXIT_FAILURE
        }
    };
    // Exit explicitly: the stdin reader may still be parked on a read.
    std::process::exit(code);
}

async fn run() -> Result<i32> {
    let args = match cli::parse_invocation(std::env::args_os()) {
        Ok(Invocation::Version(v)) => {
            println!("{v}");
            return Ok(EXIT_OK);
        }
        Ok(Invocation::Help(h)) => {
            println!("{h}");
            return Ok(EXIT_OK);
        }
        Ok(Invocation::Lint(args)) => args,
        Err(e) => {
            eprintln!("{e}");
            return Ok(EXIT_FAILURE);
        }
    };

    let color = utils::use_colors(args.no_color);
    let registry = Arc::new(FormatterRegistry::with_builtins(color));
    if let Some(name) = args.format.as_deref() {
        if registry.get(name).is_none() {
            eprintln!(
                "{} unknown formatter '{}' (available: {})",
                utils::error_prefix(),
                name,
                registry.names().join(", ")
            );
            return Ok(EXIT_FAILURE);
        }
    }

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config_file = match args.config.as_deref() {
        Some(path) => Some(cwd.join(path)),
        None => config::discover_config(&cwd),
    };
    if config_file.is_none() {
        tracing::info!("no nibbler config found; using defaults");
    }

    let mut engine = LineEngine::new(&cwd);
    engine.configure(EngineOptions {
        extensions: args.ext.clone(),
        config_file,
    });
    let report = engine.run(&args.files);

    let pipeline = Pipeline::new(registry, color);
    if let Some(name) = args.format.as_deref() {
        return pipeline
            .render_with(&report, name, &mut io::stdout().lock())
            .context("failed to render report");
    }
    let decision = pipeline
        .run(report, &mut io::stdout().lock(), &mut io::stderr().lock())
        .context("failed to render report")?;

    // The exit code is settled here, before any interactive input.
    let exit_code = decision.exit_code;
    if let Some(drill_down) = decision.drill_down {
        let mut input = spawn_line_reader(tokio::io::stdin());
        if let Err(e) = drill_down.resolve(&mut input, &mut io::stdout()).await {
            eprintln!("{} failed to render rule detail: {}", utils::error_prefix(), e);
        }
    }
    Ok(exit_code)
}
