//! ArgMatches → Action conversion.

use clap::ArgMatches;
use serde_json::Value;

use crate::value::parse_value;

/// One store operation requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Set { key: String, value: Value },
    Get { key: String },
    Type { key: String },
    Add { key: String, amount: Value },
    Subtract { key: String, amount: Value },
    Push { key: String, values: Vec<Value> },
    Unpush { key: String, value: Value },
    Delete { key: String },
    Has { key: String },
    Clear,
    StartsWith { prefix: String },
    EndsWith { suffix: String },
    Includes { text: String },
    Dump,
    Entries,
    Keys,
    Backup { name: String },
    Restore { name: String },
}

/// Translate the selected subcommand into an `Action`.
pub fn matches_to_action(matches: &ArgMatches) -> Result<Action, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "no command given".to_string())?;

    let action = match name {
        "set" => Action::Set {
            key: string(sub, "key")?,
            value: parse_value(&string(sub, "value")?),
        },
        "get" => Action::Get {
            key: string(sub, "key")?,
        },
        "type" => Action::Type {
            key: string(sub, "key")?,
        },
        "add" => Action::Add {
            key: string(sub, "key")?,
            amount: parse_value(&string(sub, "amount")?),
        },
        "subtract" => Action::Subtract {
            key: string(sub, "key")?,
            amount: parse_value(&string(sub, "amount")?),
        },
        "push" => Action::Push {
            key: string(sub, "key")?,
            values: sub
                .get_many::<String>("values")
                .map(|vals| vals.map(|v| parse_value(v)).collect())
                .unwrap_or_default(),
        },
        "unpush" => Action::Unpush {
            key: string(sub, "key")?,
            value: parse_value(&string(sub, "value")?),
        },
        "delete" => Action::Delete {
            key: string(sub, "key")?,
        },
        "has" => Action::Has {
            key: string(sub, "key")?,
        },
        "clear" => Action::Clear,
        "starts-with" => Action::StartsWith {
            prefix: string(sub, "prefix")?,
        },
        "ends-with" => Action::EndsWith {
            suffix: string(sub, "suffix")?,
        },
        "includes" => Action::Includes {
            text: string(sub, "text")?,
        },
        "dump" => Action::Dump,
        "entries" => Action::Entries,
        "keys" => Action::Keys,
        "backup" => Action::Backup {
            name: string(sub, "name")?,
        },
        "restore" => Action::Restore {
            name: string(sub, "name")?,
        },
        other => return Err(format!("unknown command: {}", other)),
    };
    Ok(action)
}

fn string(matches: &ArgMatches, id: &str) -> Result<String, String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| format!("missing argument: {}", id))
}
