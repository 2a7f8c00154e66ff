//! [`PlannerApi`] over HTTP, talking to the real backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use planner_shared::{
    ApiReply, CategoryRecord, DayColorArgs, MoveTaskArgs, StickerArgs, TaskDto, TaskForm,
    TaskPatch, TasksReply,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::api::{PlannerApi, wire_date};
use crate::error::ApiError;

/// A backend reached through `reqwest`. Works natively and on `wasm32`, where
/// reqwest goes through the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct HttpPlanner {
    base: String,
    client: reqwest::Client,
}

impl HttpPlanner {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Url::parse(base_url).map(Self::from_url)
    }

    pub fn from_url(base_url: Url) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self {
            base: base_url.as_str().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/planner/{}", self.base, path)
    }

    fn task_endpoint(&self, action: &str, id: &str) -> String {
        self.endpoint(&format!("{action}/{}", urlencoding::encode(id)))
    }

    fn post_json<T: Serialize>(&self, url: &str, payload: &T) -> Result<RequestBuilder, ApiError> {
        let body = serde_json::to_string(payload)?;
        Ok(self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body))
    }
}

/// Reads a reply whose body must be JSON. An `error` field wins over the status.
async fn read_reply(response: Response) -> Result<ApiReply, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<ApiReply>(&body) {
        Ok(reply) => match reply.error {
            Some(error) => Err(ApiError::Application(error)),
            None if status.is_success() => Ok(reply),
            None => Err(ApiError::Status(status.as_u16())),
        },
        Err(err) if status.is_success() => Err(ApiError::Decode(err.to_string())),
        Err(_) => Err(ApiError::Status(status.as_u16())),
    }
}

/// Reads a reply where only the status matters, still surfacing an `error` body.
async fn read_status(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if let Ok(ApiReply {
        error: Some(error), ..
    }) = serde_json::from_str::<ApiReply>(&body)
    {
        return Err(ApiError::Application(error));
    }
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}

#[async_trait(?Send)]
impl PlannerApi for HttpPlanner {
    #[tracing::instrument(skip(self), fields(base = %self.base))]
    async fn get_tasks(&self, date: NaiveDate) -> Result<Vec<TaskDto>, ApiError> {
        let url = self.endpoint(&format!("get_tasks/{}", wire_date(date)));
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "get_tasks responded");
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        match serde_json::from_str::<TasksReply>(&body)? {
            TasksReply::Tasks(tasks) => Ok(tasks),
            TasksReply::Null => Ok(Vec::new()),
            TasksReply::Failure { error } => {
                warn!(%error, "backend reported an error for get_tasks");
                Err(ApiError::Application(error))
            }
        }
    }

    #[tracing::instrument(skip(self, form), fields(update = form.is_update()))]
    async fn add_task(&self, form: &TaskForm, date: NaiveDate) -> Result<(), ApiError> {
        let fields = form.create_fields(&wire_date(date));
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&fields)
            .finish();
        let response = self
            .client
            .post(self.endpoint("add_task"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;
        read_status(response).await
    }

    #[tracing::instrument(skip(self, patch))]
    async fn edit_task(&self, id: &str, patch: &TaskPatch) -> Result<ApiReply, ApiError> {
        let url = self.task_endpoint("edit_task", id);
        let response = self.post_json(&url, patch)?.send().await?;
        read_reply(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_task(&self, id: &str) -> Result<ApiReply, ApiError> {
        let url = self.task_endpoint("toggle_task", id);
        let response = self.client.post(&url).send().await?;
        read_reply(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<ApiReply, ApiError> {
        let url = self.task_endpoint("delete_task", id);
        let response = self.client.post(&url).send().await?;
        read_reply(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn move_task(&self, id: &str, new_date: NaiveDate) -> Result<(), ApiError> {
        let url = self.task_endpoint("move_task", id);
        let args = MoveTaskArgs {
            new_date: wire_date(new_date),
        };
        let response = self.post_json(&url, &args)?.send().await?;
        read_status(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn add_sticker(&self, date: NaiveDate, sticker: &str) -> Result<(), ApiError> {
        let args = StickerArgs {
            date: wire_date(date),
            sticker: sticker.to_string(),
        };
        let response = self
            .post_json(&self.endpoint("add_sticker"), &args)?
            .send()
            .await?;
        read_status(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_stickers(&self, date: NaiveDate) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&format!("get_stickers/{}", wire_date(date)));
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[tracing::instrument(skip(self))]
    async fn set_day_color(&self, date: NaiveDate, color: &str) -> Result<(), ApiError> {
        let args = DayColorArgs {
            date: wire_date(date),
            color: color.to_string(),
        };
        let response = self
            .post_json(&self.endpoint("set_day_color"), &args)?
            .send()
            .await?;
        read_status(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_categories(&self) -> Result<Vec<CategoryRecord>, ApiError> {
        let response = self.client.get(self.endpoint("get_categories")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
