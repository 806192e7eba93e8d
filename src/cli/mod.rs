//! Command line front end: argument parsing, the interactive result grid,
//! the persisted report, and the session that sequences them.

pub mod args;
pub mod output;
pub mod report;
pub mod session;
