//! CLI command implementations

mod convert;
mod list;
mod query;

pub use convert::cmd_convert;
pub use list::{cmd_list, cmd_types};
pub use query::cmd_query;
