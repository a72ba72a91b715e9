pub mod error;
pub mod extract;
pub mod html;
pub mod pagination;
pub mod prd;
pub mod types;
