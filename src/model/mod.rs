pub mod datetime;
pub mod leave;
pub mod user;
