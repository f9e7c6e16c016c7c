//! Loading and validation of squad files and sheet configuration.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
