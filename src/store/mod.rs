//! Persistence seam. Handlers only see `dyn Store`; the backend is picked at
//! startup.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AppResult,
    model::{
        leave::{LeaveRecord, NewLeave},
        user::User,
    },
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn get_leave(&self, id: u64) -> AppResult<Option<LeaveRecord>>;

    /// Every leave, ordered by id.
    async fn list_leaves(&self) -> AppResult<Vec<LeaveRecord>>;

    /// Leaves of `user_id` overlapping the days `[from, until)`.
    async fn user_leaves_between(
        &self,
        user_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<LeaveRecord>>;

    /// Leaves of `user_id` starting or ending on or after `from`, ordered by
    /// start date.
    async fn user_leaves_from(&self, user_id: u64, from: NaiveDate) -> AppResult<Vec<LeaveRecord>>;

    async fn insert_leave(&self, leave: &NewLeave) -> AppResult<LeaveRecord>;

    /// Rewrites the dates of `leave`. `false` if the id is unknown.
    async fn update_leave(&self, leave: &LeaveRecord) -> AppResult<bool>;

    async fn delete_leave(&self, id: u64) -> AppResult<bool>;

    async fn delete_all_leaves(&self) -> AppResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: u64) -> AppResult<Option<User>>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// `false` when the id is already taken.
    async fn insert_user(&self, id: u64) -> AppResult<bool>;

    /// Also removes the user's leaves.
    async fn delete_user(&self, id: u64) -> AppResult<bool>;

    async fn delete_all_users(&self) -> AppResult<u64>;
}

pub trait Store: LeaveStore + UserStore {}

impl<T: LeaveStore + UserStore + ?Sized> Store for T {}
