// Entity types persisted by the blog service.
//
// The serialized JSON shape of each entity is exactly the declared fields;
// relationship data is never embedded in an entity payload. A post's comments
// are reached through `GET /posts/{id}/comments` instead.

use serde::{Deserialize, Serialize};

/// A blog post. Owns zero or more comments (one-to-many via `Comment.post_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// A comment attached to a post. `post_id` is nullable and the schema does not
/// enforce referential integrity beyond engine defaults, so deleting a post
/// may orphan its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub post_id: Option<i64>,
}
