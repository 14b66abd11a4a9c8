mod db;
mod error;
mod input;
mod mutation;
mod pdf;
mod query;
mod totals;
mod util;

pub use db::*;
pub use error::*;
pub use input::*;
pub use mutation::*;
pub use pdf::*;
pub use query::*;
pub use totals::*;
pub use util::*;

pub use sea_orm;
