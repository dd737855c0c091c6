//! Action → store call.

use jsonkv_core::{Document, Entry, Result, Value, ValueKind};
use jsonkv_engine::{Database, SnapshotInfo};

use crate::parse::Action;

/// Result of one executed action, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Mutation succeeded with nothing to report
    Unit,
    /// A stored or computed value
    Value(Value),
    /// A value kind
    Kind(ValueKind),
    /// A yes/no answer
    Bool(bool),
    /// A count (array length, removed elements, restored entries)
    Count(usize),
    /// Search or `entries` results
    Entries(Vec<Entry>),
    /// The whole document
    Document(Document),
    /// Key listing
    Keys(Vec<String>),
    /// A written snapshot
    Snapshot(SnapshotInfo),
}

/// Run `action` against `db`.
pub fn execute(db: &Database, action: Action) -> Result<Output> {
    let output = match action {
        Action::Set { key, value } => {
            db.set(&key, value)?;
            Output::Unit
        }
        Action::Get { key } => Output::Value(db.get(&key)?),
        Action::Type { key } => Output::Kind(db.type_of(&key)?),
        Action::Add { key, amount } => Output::Value(db.add(&key, amount)?),
        Action::Subtract { key, amount } => Output::Value(db.subtract(&key, amount)?),
        Action::Push { key, values } => Output::Count(db.push(&key, values)?),
        Action::Unpush { key, value } => Output::Count(db.unpush(&key, value)?),
        Action::Delete { key } => {
            db.delete(&key)?;
            Output::Unit
        }
        Action::Has { key } => Output::Bool(db.has(&key)?),
        Action::Clear => {
            db.clear()?;
            Output::Unit
        }
        Action::StartsWith { prefix } => Output::Entries(db.starts_with(&prefix)?),
        Action::EndsWith { suffix } => Output::Entries(db.ends_with(&suffix)?),
        Action::Includes { text } => Output::Entries(db.includes(&text)?),
        Action::Dump => Output::Document(db.to_json()?),
        Action::Entries => Output::Entries(db.to_array()?),
        Action::Keys => Output::Keys(db.keys()?),
        Action::Backup { name } => Output::Snapshot(db.backup(&name)?),
        Action::Restore { name } => Output::Count(db.restore(&name)?),
    };
    Ok(output)
}
