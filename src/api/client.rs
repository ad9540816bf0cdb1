//! Authenticated REST client for the school backend.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{extract_backend_message, ApiError};
use crate::session::Session;
use crate::settings::Api;
use crate::weightings::{
    Course, CourseCriterion, CourseId, Criterion, CriterionPayload, EvaluationTemplate, ItemId,
    ItemKind, WeightingBackend,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(api: &Api, session: &Session) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth_value =
            HeaderValue::from_str(&format!("{} {}", api.auth_scheme, session.token))
                .map_err(|_| ApiError::config("invalid session token format"))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::config(format!("failed to create HTTP client: {e}")))?;

        let base_url = api.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::config("api base URL is empty"));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            method,
            path: path.to_string(),
            status: status.as_u16(),
            message: extract_backend_message(&body),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send("GET", path, builder).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send("POST", path, builder).await?;
        Ok(response.json().await?)
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.send("PUT", path, builder).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path);
        self.send("DELETE", path, builder).await?;
        Ok(())
    }

    pub async fn fetch_course(&self, course: CourseId) -> Result<Course, ApiError> {
        self.get_json(&format!("/courses/{course}/"), &[]).await
    }

    pub async fn fetch_template(&self, template: i64) -> Result<EvaluationTemplate, ApiError> {
        self.get_json(&format!("/evaluation-templates/{template}"), &[])
            .await
    }
}

fn collection_path(kind: ItemKind) -> String {
    format!("/{}/", kind.resource())
}

fn item_path(kind: ItemKind, id: ItemId) -> String {
    format!("/{}/{}/", kind.resource(), id)
}

#[async_trait]
impl WeightingBackend for ApiClient {
    async fn fetch_criteria(&self, course: CourseId) -> Result<Vec<Criterion>, ApiError> {
        let course = self.fetch_course(course).await?;
        let template = self.fetch_template(course.evaluation_template).await?;
        Ok(template.criteria)
    }

    async fn list_items(
        &self,
        kind: ItemKind,
        course: CourseId,
    ) -> Result<Vec<CourseCriterion>, ApiError> {
        self.get_json(&collection_path(kind), &[("course", course.to_string())])
            .await
    }

    async fn create_item(
        &self,
        kind: ItemKind,
        payload: &CriterionPayload,
    ) -> Result<CourseCriterion, ApiError> {
        self.post_json(&collection_path(kind), payload).await
    }

    async fn update_item(
        &self,
        kind: ItemKind,
        id: ItemId,
        payload: &CriterionPayload,
    ) -> Result<CourseCriterion, ApiError> {
        self.put_json(&item_path(kind, id), payload).await
    }

    async fn delete_item(&self, kind: ItemKind, id: ItemId) -> Result<(), ApiError> {
        self.delete(&item_path(kind, id)).await
    }
}
