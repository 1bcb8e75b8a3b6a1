//! Row structs for the pricing tables.
//!
//! Each submodule holds a `FromRow` entity matching the table and the
//! conversion into the corresponding `tradein-core` type.

pub mod brand;
pub mod device_model;
pub mod price_table;
