#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, Statement, Value};

    use crate::cache::InMemoryCache;
    use crate::database::PersistentManager;
    use crate::database::entity::post;
    use crate::manager::CachedManager;
    use microblog_core::error::ManagerError;
    use microblog_core::ports::Manager;

    fn base_time() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    /// Row `id` of author `abc123`, created `id` minutes after the base time.
    fn row(id: i64) -> post::Model {
        post::Model {
            id,
            author_id: "abc123".to_owned(),
            text: format!("post {id}"),
            created_at: (base_time() + Duration::minutes(id)).into(),
            last_modified_at: None,
        }
    }

    fn rows(ids: &[i64]) -> Vec<post::Model> {
        ids.iter().copied().map(row).collect()
    }

    fn mock(results: Vec<Vec<post::Model>>) -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(results)
            .into_connection()
    }

    fn logged_statements(manager: PersistentManager) -> Vec<Statement> {
        manager
            .into_db()
            .into_transaction_log()
            .iter()
            .flat_map(|tx| tx.statements().to_vec())
            .collect()
    }

    fn logged_sql(manager: PersistentManager) -> Vec<String> {
        logged_statements(manager)
            .into_iter()
            .map(|stmt| stmt.sql)
            .collect()
    }

    fn page_ids(page: &microblog_core::PostPage) -> Vec<&str> {
        page.posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_post_returns_assigned_id() {
        let db = mock(vec![vec![row(1)]]);
        let manager = PersistentManager::new(db);

        let created = manager.add_post("abc123", "post 1").await.unwrap();

        assert_eq!(created.id, "1");
        assert_eq!(created.author_id, "abc123");
        assert_eq!(created.text, "post 1");
        assert!(created.last_modified_at.is_none());

        let sql = logged_sql(manager);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with(r#"INSERT INTO "posts""#));
        assert!(sql[0].contains("RETURNING"));
    }

    #[tokio::test]
    async fn test_get_post_by_id() {
        let db = mock(vec![vec![row(7)]]);
        let manager = PersistentManager::new(db);

        let post = manager.get_post("7").await.unwrap();
        assert_eq!(post.id, "7");
        assert_eq!(post.text, "post 7");
        assert_eq!(post.created_at, base_time() + Duration::minutes(7));
    }

    #[tokio::test]
    async fn test_get_missing_post_is_not_found() {
        let db = mock(vec![vec![]]);
        let manager = PersistentManager::new(db);

        let err = manager.get_post("99").await.unwrap_err();
        assert!(matches!(err, ManagerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found_without_query() {
        let db = mock(vec![]);
        let manager = PersistentManager::new(db);

        let err = manager.get_post("post4").await.unwrap_err();
        assert!(matches!(err, ManagerError::NotFound(_)));
        assert!(logged_sql(manager).is_empty());
    }

    #[tokio::test]
    async fn test_pages_follow_anchored_ids() {
        // Five posts, page size 2.
        let db = mock(vec![rows(&[5, 4]), rows(&[3, 2]), rows(&[1])]);
        let manager = PersistentManager::new(db);

        let first = manager.get_posts_in_page("abc123", None, 2).await.unwrap();
        assert_eq!(page_ids(&first), ["5", "4"]);
        assert_eq!(first.next_token.as_deref(), Some("4"));

        let second = manager
            .get_posts_in_page("abc123", first.next_token.as_deref(), 2)
            .await
            .unwrap();
        assert_eq!(page_ids(&second), ["3", "2"]);
        assert_eq!(second.next_token.as_deref(), Some("2"));

        let third = manager
            .get_posts_in_page("abc123", second.next_token.as_deref(), 2)
            .await
            .unwrap();
        assert_eq!(third.posts.len(), 1);
        assert_eq!(third.posts[0].text, "post 1");
        assert!(third.is_last());

        let sql = logged_sql(manager);
        assert_eq!(sql.len(), 3);
        assert!(!sql[0].contains(r#""id" <"#));
        assert!(sql[1].contains(r#""id" <"#));
        assert!(sql.iter().all(|s| s.contains(r#"ORDER BY "posts"."id" DESC"#)));
    }

    #[tokio::test]
    async fn test_full_page_always_carries_token() {
        // Four posts, page size 2: the second page is full and also the last.
        let db = mock(vec![rows(&[4, 3]), rows(&[2, 1]), vec![]]);
        let manager = PersistentManager::new(db);

        let first = manager.get_posts_in_page("abc123", None, 2).await.unwrap();
        let second = manager
            .get_posts_in_page("abc123", first.next_token.as_deref(), 2)
            .await
            .unwrap();
        assert_eq!(page_ids(&second), ["2", "1"]);
        assert_eq!(second.next_token.as_deref(), Some("1"));

        // Following it lands exactly on the end.
        let end = manager
            .get_posts_in_page("abc123", second.next_token.as_deref(), 2)
            .await
            .unwrap();
        assert!(end.posts.is_empty());
        assert!(end.is_last());
    }

    #[tokio::test]
    async fn test_insert_between_pages_keeps_anchor() {
        let db = mock(vec![rows(&[5, 4]), rows(&[6]), rows(&[3, 2])]);
        let manager = PersistentManager::new(db);

        let first = manager.get_posts_in_page("abc123", None, 2).await.unwrap();
        manager.add_post("abc123", "post 6").await.unwrap();
        let second = manager
            .get_posts_in_page("abc123", first.next_token.as_deref(), 2)
            .await
            .unwrap();

        assert_eq!(page_ids(&second), ["3", "2"]);

        let statements = logged_statements(manager);
        assert_eq!(statements.len(), 3);
        let anchor = first.next_token.as_deref().unwrap().parse::<i64>().unwrap();
        let values = statements[2].values.as_ref().unwrap();
        assert!(values.0.contains(&Value::BigInt(Some(anchor))));
        assert!(values.0.contains(&Value::String(Some(Box::new("abc123".to_owned())))));
    }

    #[tokio::test]
    async fn test_author_without_posts_is_not_found() {
        let db = mock(vec![vec![]]);
        let manager = PersistentManager::new(db);

        let err = manager
            .get_posts_in_page("nobody", None, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_anchor_on_oldest_post_is_empty_last_page() {
        let db = mock(vec![vec![]]);
        let manager = PersistentManager::new(db);

        let page = manager
            .get_posts_in_page("abc123", Some("1"), 5)
            .await
            .unwrap();
        assert!(page.posts.is_empty());
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_malformed_token_and_zero_size_are_rejected() {
        let db = mock(vec![]);
        let manager = PersistentManager::new(db);

        let err = manager
            .get_posts_in_page("abc123", Some("MTA="), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::InvalidCursor(_)));

        let err = manager.get_posts_in_page("abc123", None, 0).await.unwrap_err();
        assert!(matches!(err, ManagerError::InvalidPageSize(0)));

        assert!(logged_sql(manager).is_empty());
    }

    #[tokio::test]
    async fn test_modify_post_returns_updated_row() {
        let edited_at = base_time() + Duration::hours(1);
        let mut updated = row(3);
        updated.text = "Updated message".to_owned();
        updated.last_modified_at = Some(edited_at.into());

        let db = mock(vec![vec![updated]]);
        let manager = PersistentManager::new(db);

        let post = manager.modify_post("3", "Updated message").await.unwrap();
        assert_eq!(post.id, "3");
        assert_eq!(post.text, "Updated message");
        assert_eq!(post.last_modified_at, Some(edited_at));
        assert!(post.last_modified_at.unwrap() > post.created_at);

        let sql = logged_sql(manager);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with(r#"UPDATE "posts""#));
        assert!(sql[0].contains("RETURNING"));
    }

    #[tokio::test]
    async fn test_modify_missing_post_is_not_found() {
        let db = mock(vec![vec![]]);
        let manager = PersistentManager::new(db);

        let err = manager.modify_post("42", "text").await.unwrap_err();
        assert!(matches!(err, ManagerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_driver_failure_is_storage_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_owned())])
            .into_connection();
        let manager = PersistentManager::new(db);

        let err = manager.get_post("1").await.unwrap_err();
        assert!(matches!(err, ManagerError::Storage(_)));
    }

    #[tokio::test]
    async fn test_is_ready_pings_database() {
        let manager = PersistentManager::new(mock(vec![]));
        assert!(manager.is_ready().await);
    }

    #[tokio::test]
    async fn test_cached_get_after_add_skips_database() {
        let db = mock(vec![vec![row(1)]]);
        let manager =
            CachedManager::new(PersistentManager::new(db), Arc::new(InMemoryCache::new()));

        let created = manager.add_post("abc123", "post 1").await.unwrap();
        let fetched = manager.get_post(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        // Only the INSERT reached the database.
        assert_eq!(logged_sql(manager.into_inner()).len(), 1);
    }
}
