//! Shared test doubles: a client that records every call it receives.
#![allow(dead_code)]

use async_trait::async_trait;
use memcli::domain::columns::ColumnMap;
use memcli::infrastructure::credentials::Credentials;
use memcli::{ClientFactory, CourseClient, MemCliConfig, MemCliError, MemCliResult};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// One recorded client call: operation name plus its arguments as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: &'static str,
    pub arguments: Value,
}

#[derive(Clone, Default)]
pub struct RecordingClient {
    calls: Arc<Mutex<Vec<Call>>>,
    response: Value,
    failure: Option<String>,
}

impl RecordingClient {
    pub fn returning(response: Value) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, arguments: Value) -> MemCliResult<Value> {
        self.calls.lock().unwrap().push(Call {
            operation,
            arguments,
        });
        match &self.failure {
            Some(message) => Err(MemCliError::Client {
                operation: operation.to_string(),
                message: message.clone(),
            }),
            None => Ok(self.response.clone()),
        }
    }
}

#[async_trait]
impl CourseClient for RecordingClient {
    async fn list_my_courses(&self, limit: u64, offset: u64) -> MemCliResult<Value> {
        self.record("list_my_courses", json!([limit, offset]))
    }

    async fn get_course_by_id(&self, course_id: &str) -> MemCliResult<Value> {
        self.record("get_course_by_id", json!([course_id]))
    }

    async fn get_course_by_slug(&self, slug: &str) -> MemCliResult<Value> {
        self.record("get_course_by_slug", json!([slug]))
    }

    async fn list_course_levels(&self, course_id: &str, include_empty: bool) -> MemCliResult<Value> {
        self.record("list_course_levels", json!([course_id, include_empty]))
    }

    async fn list_course_levels_with_items(
        &self,
        course_id: &str,
        level_index: Option<u64>,
    ) -> MemCliResult<Value> {
        self.record("list_course_levels_with_items", json!([course_id, level_index]))
    }

    async fn get_course_columns(&self, course_id: &str) -> MemCliResult<Value> {
        self.record("get_course_columns", json!([course_id]))
    }

    async fn list_course_items(&self, course_id: &str, limit: Option<u64>) -> MemCliResult<Value> {
        self.record("list_course_items", json!([course_id, limit]))
    }

    async fn list_level_items(
        &self,
        course_id: &str,
        level_index: u64,
        limit: Option<u64>,
    ) -> MemCliResult<Value> {
        self.record("list_level_items", json!([course_id, level_index, limit]))
    }

    async fn get_learnable(&self, learnable_id: &str) -> MemCliResult<Value> {
        self.record("get_learnable", json!([learnable_id]))
    }

    async fn get_pool(&self, pool_id: &str) -> MemCliResult<Value> {
        self.record("get_pool", json!([pool_id]))
    }

    async fn search_pool(
        &self,
        pool_id: &str,
        columns: &ColumnMap,
        exclude_ids: &[String],
        original_only: bool,
    ) -> MemCliResult<Value> {
        self.record(
            "search_pool",
            json!([pool_id, columns, exclude_ids, original_only]),
        )
    }

    async fn add_thing_to_course(
        &self,
        course_id: &str,
        columns: &ColumnMap,
        level_index: u64,
    ) -> MemCliResult<Value> {
        self.record("add_thing_to_course", json!([course_id, columns, level_index]))
    }

    async fn add_thing_to_level(&self, level_id: &str, columns: &ColumnMap) -> MemCliResult<Value> {
        self.record("add_thing_to_level", json!([level_id, columns]))
    }

    async fn add_level_to_course(
        &self,
        course_id: &str,
        pool_id: Option<&str>,
        kind: Option<&str>,
    ) -> MemCliResult<Value> {
        self.record("add_level_to_course", json!([course_id, pool_id, kind]))
    }

    async fn delete_level(&self, level_id: &str) -> MemCliResult<Value> {
        self.record("delete_level", json!([level_id]))
    }

    async fn set_level_title(&self, level_id: &str, title: &str) -> MemCliResult<Value> {
        self.record("set_level_title", json!([level_id, title]))
    }
}

/// Hands out clones of one recording client and remembers the credentials.
#[derive(Default)]
pub struct RecordingFactory {
    pub client: RecordingClient,
    pub connected_with: Mutex<Option<Credentials>>,
}

impl RecordingFactory {
    pub fn new(client: RecordingClient) -> Self {
        Self {
            client,
            connected_with: Mutex::new(None),
        }
    }
}

impl ClientFactory for RecordingFactory {
    fn connect(
        &self,
        credentials: &Credentials,
        _config: &MemCliConfig,
    ) -> MemCliResult<Box<dyn CourseClient>> {
        *self.connected_with.lock().unwrap() = Some(credentials.clone());
        Ok(Box::new(self.client.clone()))
    }
}
