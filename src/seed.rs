use anyhow::Result;

use crate::database::BlogDatabase;

/// Wipe the schema and insert the demo fixture: three posts and four
/// comments, two of which land on the second post. Destroys any prior rows,
/// which is why startup only runs this behind the `SEED_DEMO_DATA` flag.
pub async fn seed_demo_data(db: &BlogDatabase) -> Result<()> {
    db.reset().await?;

    let post1 = db
        .create_post("Post The First", "Content for the first post")
        .await?;
    let post2 = db
        .create_post("Post The Second", "Content for the Second post")
        .await?;
    db.create_post("Post The Third", "Content for the third post")
        .await?;

    db.create_comment("Comment for the first post", Some(post1.id))
        .await?;
    db.create_comment("Comment for the second post", Some(post2.id))
        .await?;
    db.create_comment("Another comment for the second post", Some(post2.id))
        .await?;
    db.create_comment("Another comment for the first post", Some(post1.id))
        .await?;

    tracing::info!("seeded demo data: 3 posts, 4 comments");
    Ok(())
}
