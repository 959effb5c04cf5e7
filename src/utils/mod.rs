pub mod user_lock;
