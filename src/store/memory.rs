use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{LeaveStore, UserStore};
use crate::{
    error::AppResult,
    model::{
        leave::{LeaveRecord, NewLeave},
        user::User,
    },
};

/// Process-local store, used when no `DATABASE_URL` is configured and in
/// tests. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeSet<u64>,
    leaves: BTreeMap<u64, LeaveRecord>,
    last_leave_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn get_leave(&self, id: u64) -> AppResult<Option<LeaveRecord>> {
        Ok(self.read().leaves.get(&id).cloned())
    }

    async fn list_leaves(&self) -> AppResult<Vec<LeaveRecord>> {
        Ok(self.read().leaves.values().cloned().collect())
    }

    async fn user_leaves_between(
        &self,
        user_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<LeaveRecord>> {
        let mut leaves: Vec<LeaveRecord> = self
            .read()
            .leaves
            .values()
            .filter(|l| l.user_id == user_id && l.end_day() >= from && l.start_day() < until)
            .cloned()
            .collect();
        leaves.sort_by_key(|l| (l.start_date, l.id));
        Ok(leaves)
    }

    async fn user_leaves_from(&self, user_id: u64, from: NaiveDate) -> AppResult<Vec<LeaveRecord>> {
        let mut leaves: Vec<LeaveRecord> = self
            .read()
            .leaves
            .values()
            .filter(|l| l.user_id == user_id && (l.start_day() >= from || l.end_day() >= from))
            .cloned()
            .collect();
        leaves.sort_by_key(|l| (l.start_date, l.id));
        Ok(leaves)
    }

    async fn insert_leave(&self, leave: &NewLeave) -> AppResult<LeaveRecord> {
        let mut state = self.write();
        state.last_leave_id += 1;

        let record = LeaveRecord {
            id: state.last_leave_id,
            user_id: leave.user_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
        };
        state.leaves.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_leave(&self, leave: &LeaveRecord) -> AppResult<bool> {
        let mut state = self.write();
        match state.leaves.get_mut(&leave.id) {
            Some(stored) => {
                stored.start_date = leave.start_date;
                stored.end_date = leave.end_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_leave(&self, id: u64) -> AppResult<bool> {
        Ok(self.write().leaves.remove(&id).is_some())
    }

    async fn delete_all_leaves(&self) -> AppResult<u64> {
        let mut state = self.write();
        let deleted = state.leaves.len() as u64;
        state.leaves.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: u64) -> AppResult<Option<User>> {
        Ok(self.read().users.contains(&id).then_some(User { id }))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.read().users.iter().map(|&id| User { id }).collect())
    }

    async fn insert_user(&self, id: u64) -> AppResult<bool> {
        Ok(self.write().users.insert(id))
    }

    async fn delete_user(&self, id: u64) -> AppResult<bool> {
        let mut state = self.write();
        if !state.users.remove(&id) {
            return Ok(false);
        }
        state.leaves.retain(|_, l| l.user_id != id);
        Ok(true)
    }

    async fn delete_all_users(&self) -> AppResult<u64> {
        let mut state = self.write();
        let deleted = state.users.len() as u64;
        state.users.clear();
        state.leaves.clear();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::datetime::parse;

    fn new_leave(user_id: u64, start: &str, end: &str) -> NewLeave {
        NewLeave {
            user_id,
            start_date: parse(start).unwrap(),
            end_date: parse(end).unwrap(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[actix_web::test]
    async fn ids_are_assigned_in_order() {
        let store = MemoryStore::new();
        let a = store
            .insert_leave(&new_leave(1, "2021-01-01T00:00:00", "2021-01-02T00:00:00"))
            .await
            .unwrap();
        let b = store
            .insert_leave(&new_leave(1, "2021-02-01T00:00:00", "2021-02-02T00:00:00"))
            .await
            .unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        store.delete_leave(b.id).await.unwrap();
        let c = store
            .insert_leave(&new_leave(1, "2021-03-01T00:00:00", "2021-03-02T00:00:00"))
            .await
            .unwrap();
        assert_eq!(c.id, 3);
    }

    #[actix_web::test]
    async fn window_includes_leaves_crossing_its_edges() {
        let store = MemoryStore::new();
        for (start, end) in [
            ("2020-12-20T00:00:00", "2021-01-05T00:00:00"),
            ("2021-06-01T00:00:00", "2021-06-05T00:00:00"),
            ("2021-12-30T00:00:00", "2022-01-02T00:00:00"),
            ("2020-06-01T00:00:00", "2020-06-05T00:00:00"),
            ("2022-01-01T00:00:00", "2022-01-05T00:00:00"),
        ] {
            store.insert_leave(&new_leave(1, start, end)).await.unwrap();
        }
        store
            .insert_leave(&new_leave(2, "2021-06-01T00:00:00", "2021-06-05T00:00:00"))
            .await
            .unwrap();

        let ids: Vec<u64> = store
            .user_leaves_between(1, day(2021, 1, 1), day(2022, 1, 1))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[actix_web::test]
    async fn from_date_keeps_straddling_leaves_sorted_by_start() {
        let store = MemoryStore::new();
        store
            .insert_leave(&new_leave(1, "2021-07-01T00:00:00", "2021-07-03T00:00:00"))
            .await
            .unwrap();
        store
            .insert_leave(&new_leave(1, "2021-05-28T00:00:00", "2021-06-02T00:00:00"))
            .await
            .unwrap();
        store
            .insert_leave(&new_leave(1, "2021-05-01T00:00:00", "2021-05-03T00:00:00"))
            .await
            .unwrap();

        let scheduled = store.user_leaves_from(1, day(2021, 6, 1)).await.unwrap();
        let ids: Vec<u64> = scheduled.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[actix_web::test]
    async fn deleting_a_user_drops_their_leaves() {
        let store = MemoryStore::new();
        assert!(store.insert_user(1).await.unwrap());
        assert!(!store.insert_user(1).await.unwrap());
        assert!(store.insert_user(2).await.unwrap());
        store
            .insert_leave(&new_leave(1, "2021-01-01T00:00:00", "2021-01-02T00:00:00"))
            .await
            .unwrap();
        store
            .insert_leave(&new_leave(2, "2021-01-01T00:00:00", "2021-01-02T00:00:00"))
            .await
            .unwrap();

        assert!(store.delete_user(1).await.unwrap());
        assert!(!store.delete_user(1).await.unwrap());

        let left = store.list_leaves().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].user_id, 2);
        assert_eq!(store.delete_all_users().await.unwrap(), 1);
        assert!(store.list_leaves().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn update_of_unknown_leave_reports_false() {
        let store = MemoryStore::new();
        let mut record = store
            .insert_leave(&new_leave(1, "2021-01-01T00:00:00", "2021-01-02T00:00:00"))
            .await
            .unwrap();
        record.end_date = parse("2021-01-04T00:00:00").unwrap();
        assert!(store.update_leave(&record).await.unwrap());
        assert_eq!(store.get_leave(record.id).await.unwrap(), Some(record.clone()));

        record.id = 99;
        assert!(!store.update_leave(&record).await.unwrap());
    }
}
