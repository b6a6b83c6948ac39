//! Event submission command
//!
//! Parses one event and runs it through the rule pipeline.

use crate::cli::args::{EventArgs, OutputFormat};
use crate::cli::output::print_output;
use crate::config::Config;
use crate::domain::Event;
use crate::engine::ActionDispatcher;
use crate::error::Result;
use crate::services::EventPipeline;

use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

/// Evaluate an event against every registered rule
pub fn run_event(args: &EventArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let body = read_event_body(args)?;
    let event = Event::from_json(&body)?;
    log::debug!("Received event {}", event);

    let registry = Arc::new(config.store.open_registry()?);
    let pipeline = EventPipeline::new(registry, Arc::new(ActionDispatcher::default()));
    let report = pipeline.process(&event);

    print_output(&report, format)?;
    Ok(())
}

/// Read the raw event body from the argument, a file, or stdin
fn read_event_body(args: &EventArgs) -> Result<String> {
    if let Some(json) = &args.json {
        return Ok(json.clone());
    }

    match args.file.as_deref() {
        Some("-") | None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
    }
}
