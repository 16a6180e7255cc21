//! Shared helpers for the behaviour scenarios.

use crate::parsers::{Arguments, ValueType, mult_values};
use crate::registry::Registry;

/// Registry with the commands the scenarios exercise: `add` takes two
/// integers, `echo` returns its argument string and `explode` always fails.
pub(super) fn demo_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_with_parser(
            "add",
            |arguments: Arguments| -> anyhow::Result<i64> {
                Ok(arguments.int(0)? + arguments.int(1)?)
            },
            mult_values([ValueType::Int, ValueType::Int]),
        )
        .register("echo", |arguments: Arguments| -> anyhow::Result<String> {
            Ok(arguments.text(0)?.to_owned())
        })
        .register("explode", |_: Arguments| -> anyhow::Result<String> {
            anyhow::bail!("the fuse was lit")
        });
    registry
}

pub(super) fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}
