//! CLI domain: parse, route, replay, and output only.
//! The store does the work; this layer feeds it and formats results.

mod output;
mod parse;
mod replay;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use replay::{replay, ReplayReport, ReplayStep};
pub use route::RunContext;
