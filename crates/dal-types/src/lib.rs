#[macro_use]
mod macros;

pub mod id;
pub mod prelude;
pub mod scope;
pub mod tenant;
pub mod time;
pub mod validate;
