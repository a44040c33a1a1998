//! Data store modules for the SQLite products database

pub mod products;
pub mod sqlite;

pub use products::{Product, ProductStore, SortKey};
pub use sqlite::{connect, StoreError};
