//! Clap command tree definition.
//!
//! One subcommand per store operation; global flags select the document,
//! output mode and log verbosity.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("jsonkv")
        .about("Single-file JSON document key-value store")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("PATH")
                .help("Backing document (default: db.json)")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Read settings from a jsonkv.toml file")
                .global(true),
        )
        .arg(
            Arg::new("timeout-ms")
                .long("timeout-ms")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .help("Max time to wait for the store lock")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log store activity to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            keyed("set", "Set a value").arg(value_arg("value", "Value (JSON or plain text)")),
        )
        .subcommand(keyed("get", "Get a value"))
        .subcommand(keyed("type", "Show the kind of a value"))
        .subcommand(
            keyed("add", "Add a number to a value").arg(value_arg("amount", "Number to add")),
        )
        .subcommand(
            keyed("subtract", "Subtract a number from a value")
                .arg(value_arg("amount", "Number to subtract")),
        )
        .subcommand(
            keyed("push", "Append values to an array").arg(
                Arg::new("values")
                    .required(true)
                    .num_args(1..)
                    .value_name("VALUE")
                    .help("Values to append"),
            ),
        )
        .subcommand(
            keyed("unpush", "Remove every matching element from an array")
                .arg(value_arg("value", "Element to remove")),
        )
        .subcommand(keyed("delete", "Delete a key"))
        .subcommand(keyed("has", "Check whether a key exists"))
        .subcommand(Command::new("clear").about("Remove every key"))
        .subcommand(search("starts-with", "prefix", "List entries whose key starts with PREFIX"))
        .subcommand(search("ends-with", "suffix", "List entries whose key ends with SUFFIX"))
        .subcommand(search("includes", "text", "List entries whose key contains TEXT"))
        .subcommand(Command::new("dump").about("Print the whole document"))
        .subcommand(Command::new("entries").about("Print the document as key/value pairs"))
        .subcommand(Command::new("keys").about("List keys"))
        .subcommand(named("backup", "Write the document to a new snapshot file"))
        .subcommand(named("restore", "Replace the document with a snapshot"))
}

fn keyed(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new("key").required(true).value_name("KEY").help("Key name"))
}

fn value_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .required(true)
        .allow_hyphen_values(true)
        .value_name("VALUE")
        .help(help)
}

fn search(name: &'static str, id: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new(id).required(true).help("Text to match against keys"))
}

fn named(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new("name")
            .required(true)
            .value_name("NAME")
            .help("Snapshot name; \".json\" is added if missing"),
    )
}
