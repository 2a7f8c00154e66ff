//! The backend seam: one async method per `/planner/*` endpoint.

use async_trait::async_trait;
use chrono::NaiveDate;
use planner_shared::{ApiReply, CategoryRecord, TaskDto, TaskForm, TaskPatch};

use crate::error::ApiError;

/// Date format used on the wire and in every path.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn wire_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The planner REST surface as seen by the client.
///
/// Implementations decide how a reply maps onto `Ok`/`Err`, but they must keep
/// the three outcomes apart: a transport failure is one of the transport
/// variants of [`ApiError`], a reply carrying `error` is
/// [`ApiError::Application`], anything else is `Ok`.
///
/// Futures are not required to be `Send`: the controllers run on a single
/// thread (the browser's UI thread, or a current-thread runtime in the CLI).
#[async_trait(?Send)]
pub trait PlannerApi {
    /// `GET /planner/get_tasks/{date}`. The list keeps the backend's order.
    async fn get_tasks(&self, date: NaiveDate) -> Result<Vec<TaskDto>, ApiError>;

    /// `POST /planner/add_task` with the form fields plus `date`.
    async fn add_task(&self, form: &TaskForm, date: NaiveDate) -> Result<(), ApiError>;

    /// `POST /planner/edit_task/{id}` with a JSON patch.
    async fn edit_task(&self, id: &str, patch: &TaskPatch) -> Result<ApiReply, ApiError>;

    /// `POST /planner/toggle_task/{id}`.
    async fn toggle_task(&self, id: &str) -> Result<ApiReply, ApiError>;

    /// `POST /planner/delete_task/{id}`.
    async fn delete_task(&self, id: &str) -> Result<ApiReply, ApiError>;

    /// `POST /planner/move_task/{id}` with `{new_date}`.
    async fn move_task(&self, id: &str, new_date: NaiveDate) -> Result<(), ApiError>;

    /// `POST /planner/add_sticker` with `{date, sticker}`.
    async fn add_sticker(&self, date: NaiveDate, sticker: &str) -> Result<(), ApiError>;

    /// `GET /planner/get_stickers/{date}`.
    async fn get_stickers(&self, date: NaiveDate) -> Result<Vec<String>, ApiError>;

    /// `POST /planner/set_day_color` with `{date, color}`.
    async fn set_day_color(&self, date: NaiveDate, color: &str) -> Result<(), ApiError>;

    /// `GET /planner/get_categories`.
    async fn get_categories(&self) -> Result<Vec<CategoryRecord>, ApiError>;
}

macro_rules! forward_planner_api {
    ($($ty:ty),+) => {$(
        #[async_trait(?Send)]
        impl<T: PlannerApi + ?Sized> PlannerApi for $ty {
            async fn get_tasks(&self, date: NaiveDate) -> Result<Vec<TaskDto>, ApiError> {
                (**self).get_tasks(date).await
            }
            async fn add_task(&self, form: &TaskForm, date: NaiveDate) -> Result<(), ApiError> {
                (**self).add_task(form, date).await
            }
            async fn edit_task(&self, id: &str, patch: &TaskPatch) -> Result<ApiReply, ApiError> {
                (**self).edit_task(id, patch).await
            }
            async fn toggle_task(&self, id: &str) -> Result<ApiReply, ApiError> {
                (**self).toggle_task(id).await
            }
            async fn delete_task(&self, id: &str) -> Result<ApiReply, ApiError> {
                (**self).delete_task(id).await
            }
            async fn move_task(&self, id: &str, new_date: NaiveDate) -> Result<(), ApiError> {
                (**self).move_task(id, new_date).await
            }
            async fn add_sticker(&self, date: NaiveDate, sticker: &str) -> Result<(), ApiError> {
                (**self).add_sticker(date, sticker).await
            }
            async fn get_stickers(&self, date: NaiveDate) -> Result<Vec<String>, ApiError> {
                (**self).get_stickers(date).await
            }
            async fn set_day_color(&self, date: NaiveDate, color: &str) -> Result<(), ApiError> {
                (**self).set_day_color(date, color).await
            }
            async fn get_categories(&self) -> Result<Vec<CategoryRecord>, ApiError> {
                (**self).get_categories().await
            }
        }
    )+};
}

forward_planner_api!(&T, std::rc::Rc<T>);
