// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use sightline::backends::{LoggingInjector, StillImageController};
use sightline::config::{load_graph, load_settings, EngineSettings, RuntimeBuilder};
use sightline::engine::RunOutcome;
use sightline::vision::TemplateLibrary;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage:
  sightline validate <graph> [--settings <toml>]
  sightline run <graph> <start-task> --screenshot <png> [--templates <dir>] [--settings <toml>]

Graph documents may be JSON (.json) or YAML (.yaml, .yml).
`run` is a dry run: the screenshot stands in for the device and taps are logged.";

/// Options shared by both commands, plus the positional arguments.
struct Invocation {
    positional: Vec<String>,
    settings: Option<String>,
    screenshot: Option<String>,
    templates: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut invocation = Invocation {
        positional: Vec::new(),
        settings: None,
        screenshot: None,
        templates: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--settings" => &mut invocation.settings,
            "--screenshot" => &mut invocation.screenshot,
            "--templates" => &mut invocation.templates,
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            _ => {
                invocation.positional.push(arg.clone());
                continue;
            }
        };
        let value = iter
            .next()
            .with_context(|| format!("option '{}' needs a value", arg))?;
        *slot = Some(value.clone());
    }

    Ok(invocation)
}

fn settings_for(invocation: &Invocation) -> Result<EngineSettings> {
    match &invocation.settings {
        Some(path) => load_settings(path).with_context(|| format!("loading settings '{}'", path)),
        None => Ok(EngineSettings::default()),
    }
}

fn validate(invocation: &Invocation) -> Result<bool> {
    let [graph_path] = invocation.positional.as_slice() else {
        bail!("validate takes exactly one graph document\n\n{}", USAGE);
    };
    let settings = settings_for(invocation)?;
    let graph = load_graph(graph_path, settings.reference_resolution())
        .with_context(|| format!("loading graph '{}'", graph_path))?;

    println!(
        "{}: {} tasks (reference resolution {})",
        graph_path,
        graph.len(),
        graph.reference_resolution()
    );
    for node in graph.nodes() {
        println!(
            "  {:<24} {:<10} roi={} next={:?} onErrorNext={:?}",
            node.name, node.action, node.roi, node.on_success, node.on_failure
        );
    }

    if !graph.warnings().is_empty() {
        println!("{} warning(s), logged above", graph.warnings().len());
    }
    Ok(true)
}

async fn run(invocation: &Invocation) -> Result<bool> {
    let [graph_path, start] = invocation.positional.as_slice() else {
        bail!("run takes a graph document and a start task\n\n{}", USAGE);
    };
    let Some(screenshot) = &invocation.screenshot else {
        bail!("run needs --screenshot <png>\n\n{}", USAGE);
    };

    let settings = settings_for(invocation)?;
    let graph = load_graph(graph_path, settings.reference_resolution())
        .with_context(|| format!("loading graph '{}'", graph_path))?;
    let templates = match &invocation.templates {
        Some(dir) => TemplateLibrary::load_dir(dir)
            .with_context(|| format!("loading templates from '{}'", dir))?,
        None => TemplateLibrary::new(),
    };

    let mut runner = RuntimeBuilder::build(
        &settings,
        Arc::new(graph),
        Arc::new(templates),
        Arc::new(StillImageController::new(screenshot)),
        Arc::new(LoggingInjector::new()),
    );

    match runner.run(start).await {
        RunOutcome::Success => {
            println!("{}: success", start);
            Ok(true)
        }
        RunOutcome::Failure(failure) => {
            println!("{}: {}", start, failure);
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let result = match parse_args(rest) {
        Ok(invocation) => match command.as_str() {
            "validate" => validate(&invocation),
            "run" => run(&invocation).await,
            "-h" | "--help" | "help" => {
                println!("{}", USAGE);
                return ExitCode::SUCCESS;
            }
            other => Err(anyhow::anyhow!("unknown command '{}'\n\n{}", other, USAGE)),
        },
        Err(error) => Err(error),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::from(2)
        }
    }
}
