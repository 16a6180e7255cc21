//! Calculator serving arithmetic to a SiMTeX document.
//!
//! `addNumbers` sums two integers separated by a space; `vsum` sums any
//! number of comma-separated floats.

use std::process::ExitCode;

use anyhow::anyhow;
use simtex::parsers::{Arguments, ValueType, mult_values};
use simtex::registry::Registry;

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_with_parser(
            "addNumbers",
            |arguments: Arguments| -> anyhow::Result<String> {
                let (a, b) = (arguments.int(0)?, arguments.int(1)?);
                let sum = a
                    .checked_add(b)
                    .ok_or_else(|| anyhow!("{a} + {b} overflows a 64-bit integer"))?;
                Ok(format!("Numbers are: {sum}"))
            },
            mult_values([ValueType::Int, ValueType::Int]),
        )
        .register_with_parser(
            "vsum",
            |arguments: Arguments| -> anyhow::Result<f64> { Ok(arguments.floats()?.iter().sum()) },
            mult_values(ValueType::Float).separator(','),
        );
    registry
}

fn main() -> ExitCode {
    simtex::run(registry())
}
