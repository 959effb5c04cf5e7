use crate::api::leave::{CreateLeave, UpdateLeave};
use crate::model::leave::LeaveRecord;
use crate::model::user::User;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Tracker API",
        version = "0.1.0",
        description = r#"
## Leave Tracker

Tracks employee leave against a yearly allowance (84 days by default).

- **Leave**: create, update, delete and list leave entries, query the
  remaining days of a user in a calendar year, and list leave scheduled from
  a date onwards.
- **User**: register, fetch and remove users. Removing a user removes their
  leave.

Leave crossing New Year is charged to both years, split at Jan 1.
Dates are exchanged as `YYYY-MM-DDTHH:MM:SS`.
"#,
    ),
    paths(
        crate::api::leave::get_leave,
        crate::api::leave::update_leave,
        crate::api::leave::delete_leave,
        crate::api::leave::create_leave,
        crate::api::leave::remaining_leave,
        crate::api::leave::scheduled_leave,
        crate::api::leave::leave_list,
        crate::api::leave::delete_leave_list,

        crate::api::user::add_user,
        crate::api::user::get_user,
        crate::api::user::delete_user,
        crate::api::user::user_list,
        crate::api::user::delete_user_list
    ),
    components(
        schemas(
            LeaveRecord,
            CreateLeave,
            UpdateLeave,
            User
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
        (name = "User", description = "User management APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/leave/{leave_id}",
            "/leave/create",
            "/leave/remaining/{user_id}/{year}",
            "/leave/scheduled/{user_id}/{date_from}",
            "/leave/list",
            "/user/{user_id}",
            "/user/list",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
