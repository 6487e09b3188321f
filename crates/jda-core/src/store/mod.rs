//! Entity stores

mod snowflake_store;

pub use snowflake_store::{SnowflakeStore, SortOrder};
