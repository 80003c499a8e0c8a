//! Library side of the `icubias` command-line tool.

pub mod logging;
pub mod tables;
