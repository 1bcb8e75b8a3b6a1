//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async functions
//! that accept `&PgPool` as the first argument.

pub mod brand_repo;
pub mod condition_grade_repo;
pub mod device_model_repo;
pub mod price_table_repo;

pub use brand_repo::BrandRepo;
pub use condition_grade_repo::ConditionGradeRepo;
pub use device_model_repo::DeviceModelRepo;
pub use price_table_repo::PriceTableRepo;
