//! Library side of the `chd` command line tool.

pub mod logging;
pub mod pipeline;
