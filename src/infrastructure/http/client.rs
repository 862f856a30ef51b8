use crate::core::client::{ClientFactory, CourseClient};
use crate::domain::columns::ColumnMap;
use crate::domain::config::MemCliConfig;
use crate::domain::error::{MemCliError, MemCliResult};
use crate::infrastructure::credentials::Credentials;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

const ERROR_BODY_LIMIT: usize = 300;

/// JSON-over-HTTP adapter for the teaching API.
///
/// One request per operation, basic auth on every request, no retries.
#[derive(Clone)]
pub struct HttpCourseClient {
    http: reqwest::Client,
    api_base: String,
    credentials: Credentials,
}

impl HttpCourseClient {
    pub fn new(api_base: &str, timeout_ms: u64, credentials: Credentials) -> MemCliResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!("memcli/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(client_id) = &credentials.client_id {
            let value = reqwest::header::HeaderValue::from_str(client_id).map_err(|e| {
                MemCliError::Config {
                    message: format!("Invalid client id: {}", e),
                }
            })?;
            headers.insert("x-client-id", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(timeout_ms.max(1)))
            .build()
            .map_err(|e| MemCliError::Config {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn request(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> MemCliResult<Value> {
        let url = format!("{}{}", self.api_base, path);
        tracing::debug!(operation, %method, %url, "sending request");

        let mut request = self
            .http
            .request(method, &url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MemCliError::client(operation, e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MemCliError::client(operation, e.to_string()))?;

        if !status.is_success() {
            return Err(MemCliError::client(
                operation,
                format!("HTTP {}: {}", status, truncate_for_error(&text)),
            ));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| MemCliError::client(operation, format!("invalid JSON response: {}", e)))
    }

    async fn get(&self, operation: &str, path: &str, query: &[(&str, String)]) -> MemCliResult<Value> {
        self.request(operation, Method::GET, path, query, None).await
    }
}

fn truncate_for_error(text: &str) -> String {
    if text.chars().count() <= ERROR_BODY_LIMIT {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(ERROR_BODY_LIMIT).collect();
    truncated.push_str("...");
    truncated
}

fn limit_query(limit: Option<u64>) -> Vec<(&'static str, String)> {
    limit.map(|l| ("limit", l.to_string())).into_iter().collect()
}

#[async_trait]
impl CourseClient for HttpCourseClient {
    async fn list_my_courses(&self, limit: u64, offset: u64) -> MemCliResult<Value> {
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        self.get("list courses", "/courses/teaching", &query).await
    }

    async fn get_course_by_id(&self, course_id: &str) -> MemCliResult<Value> {
        self.get("get course", &format!("/courses/{}", course_id), &[]).await
    }

    async fn get_course_by_slug(&self, slug: &str) -> MemCliResult<Value> {
        self.get("get course", &format!("/courses/slug/{}", slug), &[]).await
    }

    async fn list_course_levels(&self, course_id: &str, include_empty: bool) -> MemCliResult<Value> {
        let query = [("include_empty", include_empty.to_string())];
        self.get("list levels", &format!("/courses/{}/levels", course_id), &query)
            .await
    }

    async fn list_course_levels_with_items(
        &self,
        course_id: &str,
        level_index: Option<u64>,
    ) -> MemCliResult<Value> {
        let query: Vec<_> = level_index
            .map(|i| ("level_index", i.to_string()))
            .into_iter()
            .collect();
        self.get(
            "list levels with items",
            &format!("/courses/{}/levels/items", course_id),
            &query,
        )
        .await
    }

    async fn get_course_columns(&self, course_id: &str) -> MemCliResult<Value> {
        self.get("get columns", &format!("/courses/{}/columns", course_id), &[])
            .await
    }

    async fn list_course_items(&self, course_id: &str, limit: Option<u64>) -> MemCliResult<Value> {
        self.get(
            "list items",
            &format!("/courses/{}/items", course_id),
            &limit_query(limit),
        )
        .await
    }

    async fn list_level_items(
        &self,
        course_id: &str,
        level_index: u64,
        limit: Option<u64>,
    ) -> MemCliResult<Value> {
        self.get(
            "list level items",
            &format!("/courses/{}/levels/{}/items", course_id, level_index),
            &limit_query(limit),
        )
        .await
    }

    async fn get_learnable(&self, learnable_id: &str) -> MemCliResult<Value> {
        self.get("get learnable", &format!("/learnables/{}", learnable_id), &[])
            .await
    }

    async fn get_pool(&self, pool_id: &str) -> MemCliResult<Value> {
        self.get("get pool", &format!("/pools/{}", pool_id), &[]).await
    }

    async fn search_pool(
        &self,
        pool_id: &str,
        columns: &ColumnMap,
        exclude_ids: &[String],
        original_only: bool,
    ) -> MemCliResult<Value> {
        let body = json!({
            "columns": columns,
            "exclude_ids": exclude_ids,
            "original_only": original_only,
        });
        self.request(
            "search pool",
            Method::POST,
            &format!("/pools/{}/search", pool_id),
            &[],
            Some(body),
        )
        .await
    }

    async fn add_thing_to_course(
        &self,
        course_id: &str,
        columns: &ColumnMap,
        level_index: u64,
    ) -> MemCliResult<Value> {
        let body = json!({ "columns": columns, "level_index": level_index });
        self.request(
            "add thing",
            Method::POST,
            &format!("/courses/{}/things", course_id),
            &[],
            Some(body),
        )
        .await
    }

    async fn add_thing_to_level(&self, level_id: &str, columns: &ColumnMap) -> MemCliResult<Value> {
        let body = json!({ "columns": columns });
        self.request(
            "add thing",
            Method::POST,
            &format!("/levels/{}/things", level_id),
            &[],
            Some(body),
        )
        .await
    }

    async fn add_level_to_course(
        &self,
        course_id: &str,
        pool_id: Option<&str>,
        kind: Option<&str>,
    ) -> MemCliResult<Value> {
        let body = json!({ "pool_id": pool_id, "kind": kind });
        self.request(
            "add level",
            Method::POST,
            &format!("/courses/{}/levels", course_id),
            &[],
            Some(body),
        )
        .await
    }

    async fn delete_level(&self, level_id: &str) -> MemCliResult<Value> {
        self.request(
            "delete level",
            Method::DELETE,
            &format!("/levels/{}", level_id),
            &[],
            None,
        )
        .await
    }

    async fn set_level_title(&self, level_id: &str, title: &str) -> MemCliResult<Value> {
        self.request(
            "rename level",
            Method::PATCH,
            &format!("/levels/{}", level_id),
            &[],
            Some(json!({ "title": title })),
        )
        .await
    }
}

/// Factory for [`HttpCourseClient`] using `[global].api_url` and `timeout_ms`
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    fn connect(
        &self,
        credentials: &Credentials,
        config: &MemCliConfig,
    ) -> MemCliResult<Box<dyn CourseClient>> {
        let client = HttpCourseClient::new(
            &config.global.api_url,
            config.global.timeout_ms,
            credentials.clone(),
        )?;
        Ok(Box::new(client))
    }
}
