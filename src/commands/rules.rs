//! Rule management commands
//!
//! Create, inspect, replace and delete registered rules.

use crate::cli::args::{OutputFormat, RulesCommands};
use crate::cli::output::{print_output, RuleList, StatusMessage};
use crate::config::Config;
use crate::domain::Rule;
use crate::error::{RegistryError, Result};
use crate::registry::RuleRegistry;

/// Execute rule subcommands
pub fn run_rules(command: &RulesCommands, config: &Config, format: OutputFormat) -> Result<()> {
    let registry = config.store.open_registry()?;
    log::debug!("Using {} rule store", registry.store_name());

    match command {
        RulesCommands::Add {
            condition,
            action,
            id,
        } => {
            let rule = add_rule(&registry, id.as_deref(), condition, action)?;
            print_output(&rule, format)?;
        }
        RulesCommands::List => {
            print_output(&RuleList { rules: registry.list() }, format)?;
        }
        RulesCommands::Get { id } => {
            let rule = registry
                .get_by_id(id)
                .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
            print_output(&rule, format)?;
        }
        RulesCommands::Update {
            id,
            condition,
            action,
        } => {
            let rule = update_rule(&registry, id, condition, action)?;
            print_output(&rule, format)?;
        }
        RulesCommands::Delete { id } => {
            registry.delete(id)?;
            print_output(&StatusMessage::ok(format!("Rule {} deleted", id)), format)?;
        }
    }

    Ok(())
}

/// Register a new rule, generating an id when none is given
pub fn add_rule(
    registry: &RuleRegistry,
    id: Option<&str>,
    condition: &str,
    action: &str,
) -> Result<Rule> {
    let rule = match id {
        Some(id) => Rule::new(id, condition, action),
        None => Rule::with_generated_id(condition, action),
    };

    registry.add(rule.clone())?;
    log::info!("Added rule {}", rule.id);
    Ok(rule)
}

/// Replace an existing rule's condition and action
pub fn update_rule(
    registry: &RuleRegistry,
    id: &str,
    condition: &str,
    action: &str,
) -> Result<Rule> {
    if registry.get_by_id(id).is_none() {
        return Err(RegistryError::NotFound(id.to_string()).into());
    }

    let rule = Rule::new(id, condition, action);
    registry.update(rule.clone())?;
    log::info!("Updated rule {}", rule.id);
    Ok(rule)
}
