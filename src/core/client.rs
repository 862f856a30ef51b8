use crate::domain::columns::ColumnMap;
use crate::domain::config::MemCliConfig;
use crate::domain::error::MemCliResult;
use crate::infrastructure::credentials::Credentials;
use async_trait::async_trait;
use serde_json::Value;

/// Remote teaching API operations.
///
/// Responses are passed through as untyped JSON; the renderer decides how
/// much structure to trust.
#[async_trait]
pub trait CourseClient: Send + Sync {
    /// List the courses the user teaches
    async fn list_my_courses(&self, limit: u64, offset: u64) -> MemCliResult<Value>;

    async fn get_course_by_id(&self, course_id: &str) -> MemCliResult<Value>;

    async fn get_course_by_slug(&self, slug: &str) -> MemCliResult<Value>;

    async fn list_course_levels(&self, course_id: &str, include_empty: bool) -> MemCliResult<Value>;

    /// Levels with their items, optionally narrowed to one 0-based level index
    async fn list_course_levels_with_items(
        &self,
        course_id: &str,
        level_index: Option<u64>,
    ) -> MemCliResult<Value>;

    async fn get_course_columns(&self, course_id: &str) -> MemCliResult<Value>;

    async fn list_course_items(&self, course_id: &str, limit: Option<u64>) -> MemCliResult<Value>;

    /// Items of one level, `level_index` is 0-based
    async fn list_level_items(
        &self,
        course_id: &str,
        level_index: u64,
        limit: Option<u64>,
    ) -> MemCliResult<Value>;

    async fn get_learnable(&self, learnable_id: &str) -> MemCliResult<Value>;

    async fn get_pool(&self, pool_id: &str) -> MemCliResult<Value>;

    async fn search_pool(
        &self,
        pool_id: &str,
        columns: &ColumnMap,
        exclude_ids: &[String],
        original_only: bool,
    ) -> MemCliResult<Value>;

    async fn add_thing_to_course(
        &self,
        course_id: &str,
        columns: &ColumnMap,
        level_index: u64,
    ) -> MemCliResult<Value>;

    async fn add_thing_to_level(&self, level_id: &str, columns: &ColumnMap) -> MemCliResult<Value>;

    async fn add_level_to_course(
        &self,
        course_id: &str,
        pool_id: Option<&str>,
        kind: Option<&str>,
    ) -> MemCliResult<Value>;

    async fn delete_level(&self, level_id: &str) -> MemCliResult<Value>;

    async fn set_level_title(&self, level_id: &str, title: &str) -> MemCliResult<Value>;
}

/// Builds a client once credentials are resolved.
pub trait ClientFactory {
    fn connect(
        &self,
        credentials: &Credentials,
        config: &MemCliConfig,
    ) -> MemCliResult<Box<dyn CourseClient>>;
}
