//! Domain types and pure logic for the trade-in pricing service.
//!
//! Nothing in this crate talks to the database directly. Persistence is
//! reached through the store traits in [`store`], implemented on PostgreSQL by
//! `tradein-db` and in memory by the test helpers.

pub mod catalog;
pub mod classification;
pub mod condition;
pub mod device;
pub mod error;
pub mod grade;
pub mod import;
pub mod price_table;
pub mod pricing;
pub mod questionnaire;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
