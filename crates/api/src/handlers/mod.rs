pub mod auth;
pub mod category;
pub mod feature;
pub mod prd;
pub mod reference;
pub mod review;
pub mod role;
pub mod users;
