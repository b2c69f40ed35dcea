//! Command construction for the external tool.
//!
//! This module turns a layer job, output target, and option snapshot
//! into the ordered token list handed to the process runner.
//!
//! # Architecture
//!
//! - **builder**: Per-variant token builders plus display quoting

mod builder;

pub use builder::{
    build_tokens, format_command_line, quote_token, EnhancerOptionsBuilder, ScriptOptionsBuilder,
};
