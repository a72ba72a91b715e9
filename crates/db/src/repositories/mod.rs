//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod feature_repo;
pub mod prd_repo;
pub mod prd_role_repo;
pub mod reference_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use feature_repo::FeatureRepo;
pub use prd_repo::PrdRepo;
pub use prd_role_repo::PrdRoleRepo;
pub use reference_repo::ReferenceRepo;
pub use user_repo::UserRepo;
