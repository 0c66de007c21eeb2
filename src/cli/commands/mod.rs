//! Command implementations, one module per subcommand.

pub mod retrieve;
pub mod session;
pub mod stats;
pub mod store;
