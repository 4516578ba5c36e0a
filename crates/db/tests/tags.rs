//! Integration tests for tags and the `project_tag` pivot.

use std::sync::Arc;

use folio_core::image::{ImageCodec, DEFAULT_DESTINATION};
use folio_core::lifecycle::StandardProjectHooks;
use folio_core::storage::LocalDisk;
use folio_core::translation::Translations;
use folio_db::models::category::CreateCategory;
use folio_db::models::project::CreateProject;
use folio_db::models::status::ProjectStatus;
use folio_db::models::tag::{CreateTag, UpdateTag};
use folio_db::repositories::{CategoryRepo, ProjectRepo, ProjectTags, TagRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn project(pool: &PgPool) -> i64 {
    let dir = tempfile::tempdir().unwrap();
    let codec = ImageCodec::new(Arc::new(LocalDisk::new(dir.path())), DEFAULT_DESTINATION);
    let hooks = StandardProjectHooks::new(codec);
    let category = CategoryRepo::create(
        pool,
        &CreateCategory {
            title: "Tools".to_string(),
            active: Some(true),
        },
    )
    .await
    .unwrap();
    let input = CreateProject {
        title: Translations::single("en", "Tagged Project"),
        description: Translations::default(),
        category_id: category.id,
        image: None,
        status: ProjectStatus::default(),
        active: true,
        order: 0,
        links: None,
        tag_ids: None,
    };
    ProjectRepo::create(pool, &hooks, &input).await.unwrap().id
}

fn new_tag(title: &str) -> CreateTag {
    CreateTag {
        title: Translations::single("en", title),
        color: "#00ff00".to_string(),
    }
}

async fn pivot_rows(pool: &PgPool, project_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM project_tag WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Attach / detach / has_tag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attach_twice_keeps_one_row(pool: PgPool) {
    let project_id = project(&pool).await;
    let tag = TagRepo::create(&pool, &new_tag("Rust")).await.unwrap();

    assert!(TagRepo::attach(&pool, project_id, tag.id).await.unwrap());
    assert!(!TagRepo::attach(&pool, project_id, tag.id).await.unwrap());

    assert_eq!(pivot_rows(&pool, project_id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_has_tag_and_detach(pool: PgPool) {
    let project_id = project(&pool).await;
    let attached = TagRepo::create(&pool, &new_tag("Rust")).await.unwrap();
    let other = TagRepo::create(&pool, &new_tag("Go")).await.unwrap();
    TagRepo::attach(&pool, project_id, attached.id).await.unwrap();

    assert!(TagRepo::has_tag(&pool, project_id, attached.id).await.unwrap());
    assert!(!TagRepo::has_tag(&pool, project_id, other.id).await.unwrap());

    assert!(TagRepo::detach(&pool, project_id, attached.id).await.unwrap());
    assert!(!TagRepo::detach(&pool, project_id, attached.id).await.unwrap());
    assert!(!TagRepo::has_tag(&pool, project_id, attached.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_has_tag_ignores_trashed_tags(pool: PgPool) {
    let project_id = project(&pool).await;
    let tag = TagRepo::create(&pool, &new_tag("Legacy")).await.unwrap();
    TagRepo::attach(&pool, project_id, tag.id).await.unwrap();

    TagRepo::soft_delete(&pool, tag.id).await.unwrap();

    assert!(!TagRepo::has_tag(&pool, project_id, tag.id).await.unwrap());
    assert!(TagRepo::tags_for_project(&pool, project_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_loaded_relation_answers_without_query(pool: PgPool) {
    let project_id = project(&pool).await;
    let tag = TagRepo::create(&pool, &new_tag("Rust")).await.unwrap();
    TagRepo::attach(&pool, project_id, tag.id).await.unwrap();

    let relation = ProjectTags::load(&pool, project_id).await.unwrap();
    assert!(relation.has_tag(&pool, tag.id).await.unwrap());

    // Detaching behind the loaded relation's back is not seen by it.
    TagRepo::detach(&pool, project_id, tag.id).await.unwrap();
    assert!(relation.has_tag(&pool, tag.id).await.unwrap());

    let fresh = ProjectTags::unloaded(project_id);
    assert!(!fresh.has_tag(&pool, tag.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Tag CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_merges_title_locales(pool: PgPool) {
    let tag = TagRepo::create(&pool, &new_tag("Web")).await.unwrap();

    let updated = TagRepo::update(
        &pool,
        tag.id,
        &UpdateTag {
            title: Some(Translations::single("de", "Netz")),
            color: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title.get("en"), Some("Web"));
    assert_eq!(updated.title.get("de"), Some("Netz"));
    assert_eq!(updated.color, "#00ff00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_taken_checks_every_locale(pool: PgPool) {
    let mut input = new_tag("Web");
    input.title.set("fr", "Toile");
    let tag = TagRepo::create(&pool, &input).await.unwrap();

    assert!(TagRepo::title_taken(&pool, "Toile", None).await.unwrap());
    assert!(!TagRepo::title_taken(&pool, "Toile", Some(tag.id)).await.unwrap());
    assert!(!TagRepo::title_taken(&pool, "Mobile", None).await.unwrap());

    TagRepo::soft_delete(&pool, tag.id).await.unwrap();
    assert!(!TagRepo::title_taken(&pool, "Web", None).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_existing_ids_skips_unknown_and_trashed(pool: PgPool) {
    let live = TagRepo::create(&pool, &new_tag("Live")).await.unwrap();
    let trashed = TagRepo::create(&pool, &new_tag("Trashed")).await.unwrap();
    TagRepo::soft_delete(&pool, trashed.id).await.unwrap();

    let ids = TagRepo::existing_ids(&pool, &[live.id, trashed.id, 4242])
        .await
        .unwrap();

    assert_eq!(ids, vec![live.id]);
}
