//! Behaviour-driven scenarios for the dispatch loop and bootstrap.

mod support;
