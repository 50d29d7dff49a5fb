use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

use crate::models::{Comment, Post};

// Async blog store over a SQLx connection pool. One pool is shared
// process-wide; writes that touch more than one statement run inside a
// scoped transaction so a mid-write failure leaves no partial state.
pub struct BlogDatabase {
    pub pool: SqlitePool,
}

fn post_from_row(row: &SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
    }
}

fn comment_from_row(row: &SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        content: row.get("content"),
        post_id: row.get("post_id"),
    }
}

impl BlogDatabase {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // A single connection: the service is a demo-scale store and the
        // contract is one shared persistence session (last-write-wins).
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(BlogDatabase { pool })
    }

    /// Idempotent schema creation. Runs on every startup.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS post (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(100),
                content TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS comment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT,
                post_id INTEGER REFERENCES post(id)
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop and recreate both tables. Destroys all prior rows; only the
    /// opt-in seed path calls this.
    pub async fn reset(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS comment")
            .execute(&self.pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS post")
            .execute(&self.pool)
            .await?;
        self.init().await
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<Post> {
        let result = sqlx::query("INSERT INTO post (title, content) VALUES (?, ?)")
            .bind(title)
            .bind(content)
            .execute(&self.pool)
            .await?;

        Ok(Post {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT id, title, content FROM post WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT id, title, content FROM post ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Full-field overwrite of an existing post. Returns `None` when the id
    /// does not exist; nothing is committed in that case.
    pub async fn update_post(&self, id: i64, title: &str, content: &str) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE post SET title = ?, content = ? WHERE id = ?")
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;

        Ok(Some(Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
        }))
    }

    /// Delete a post and return its last known state, or `None` when the id
    /// does not exist. Comments referencing the post are left in place.
    pub async fn delete_post(&self, id: i64) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, title, content FROM post WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let post = post_from_row(&row);

        sqlx::query("DELETE FROM post WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(post))
    }

    pub async fn create_comment(&self, content: &str, post_id: Option<i64>) -> Result<Comment> {
        let result = sqlx::query("INSERT INTO comment (content, post_id) VALUES (?, ?)")
            .bind(content)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            content: content.to_string(),
            post_id,
        })
    }

    pub async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT id, content, post_id FROM comment WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    pub async fn list_comments(&self) -> Result<Vec<Comment>> {
        let rows = sqlx::query("SELECT id, content, post_id FROM comment ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    pub async fn list_comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let rows =
            sqlx::query("SELECT id, content, post_id FROM comment WHERE post_id = ? ORDER BY id")
                .bind(post_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    pub async fn update_comment(&self, id: i64, content: &str) -> Result<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, content, post_id FROM comment WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let post_id: Option<i64> = row.get("post_id");

        sqlx::query("UPDATE comment SET content = ? WHERE id = ?")
            .bind(content)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(Comment {
            id,
            content: content.to_string(),
            post_id,
        }))
    }

    pub async fn delete_comment(&self, id: i64) -> Result<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, content, post_id FROM comment WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let comment = comment_from_row(&row);

        sqlx::query("DELETE FROM comment WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> BlogDatabase {
        let db = BlogDatabase::new("sqlite::memory:").await.unwrap();
        db.init().await.unwrap();
        db
    }

    #[tokio::test]
    async fn post_crud_round_trip() {
        let db = memory_db().await;

        let created = db.create_post("T", "C").await.unwrap();
        let fetched = db.get_post(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let updated = db.update_post(created.id, "X", "Y").await.unwrap().unwrap();
        assert_eq!(updated.title, "X");
        assert_eq!(updated.content, "Y");
        assert_eq!(db.get_post(created.id).await.unwrap().unwrap(), updated);

        let deleted = db.delete_post(created.id).await.unwrap().unwrap();
        assert_eq!(deleted, updated);
        assert!(db.get_post(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn post_ids_are_never_reused() {
        let db = memory_db().await;

        let first = db.create_post("a", "a").await.unwrap();
        let second = db.create_post("b", "b").await.unwrap();
        assert_ne!(first.id, second.id);

        // AUTOINCREMENT keeps deleted ids retired.
        db.delete_post(second.id).await.unwrap();
        let third = db.create_post("c", "c").await.unwrap();
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn missing_rows_return_none() {
        let db = memory_db().await;

        assert!(db.get_post(42).await.unwrap().is_none());
        assert!(db.update_post(42, "t", "c").await.unwrap().is_none());
        assert!(db.delete_post(42).await.unwrap().is_none());
        assert!(db.get_comment(42).await.unwrap().is_none());
        assert!(db.update_comment(42, "c").await.unwrap().is_none());
        assert!(db.delete_comment(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comments_attach_to_posts() {
        let db = memory_db().await;

        let post = db.create_post("p", "c").await.unwrap();
        let other = db.create_post("q", "d").await.unwrap();
        let c1 = db.create_comment("one", Some(post.id)).await.unwrap();
        let c2 = db.create_comment("two", Some(post.id)).await.unwrap();
        db.create_comment("elsewhere", Some(other.id)).await.unwrap();
        let orphan = db.create_comment("floating", None).await.unwrap();
        assert_eq!(orphan.post_id, None);

        let attached = db.list_comments_for_post(post.id).await.unwrap();
        assert_eq!(attached, vec![c1.clone(), c2]);

        // Update keeps the comment on its post.
        let updated = db.update_comment(c1.id, "edited").await.unwrap().unwrap();
        assert_eq!(updated.post_id, Some(post.id));

        assert_eq!(db.list_comments().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn reset_wipes_all_rows() {
        let db = memory_db().await;

        db.create_post("p", "c").await.unwrap();
        db.create_comment("x", None).await.unwrap();
        db.reset().await.unwrap();

        assert!(db.list_posts().await.unwrap().is_empty());
        assert!(db.list_comments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_backed_store_persists_across_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}/blog.db", dir.path().display());

        let id = {
            let db = BlogDatabase::new(&url).await.unwrap();
            db.init().await.unwrap();
            let post = db.create_post("durable", "rows").await.unwrap();
            db.pool.close().await;
            post.id
        };

        let db = BlogDatabase::new(&url).await.unwrap();
        db.init().await.unwrap();
        let post = db.get_post(id).await.unwrap().unwrap();
        assert_eq!(post.title, "durable");
    }
}
