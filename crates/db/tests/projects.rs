//! Integration tests for the project repository.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Slugs are derived from the title on create and re-derived on update
//! - Soft-deleted projects are hidden, restorable and removable for good
//! - Soft delete and purging a live project remove the stored cover image
//! - Links and tags submitted with a save replace the existing set

use std::sync::Arc;

use folio_core::image::{ImageCodec, DEFAULT_DESTINATION};
use folio_core::lifecycle::StandardProjectHooks;
use folio_core::links::{parse_links, LinkInput};
use folio_core::storage::{LocalDisk, StorageBackend};
use folio_core::translation::Translations;
use folio_db::models::category::CreateCategory;
use folio_db::models::link::Link;
use folio_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use folio_db::models::status::ProjectStatus;
use folio_db::models::tag::CreateTag;
use folio_db::repositories::{CategoryRepo, LinkRepo, ProjectRepo, TagRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn hooks(dir: &tempfile::TempDir) -> (StandardProjectHooks, LocalDisk) {
    let disk = LocalDisk::new(dir.path());
    let codec = ImageCodec::new(Arc::new(disk.clone()), DEFAULT_DESTINATION);
    (StandardProjectHooks::new(codec), disk)
}

async fn category(pool: &PgPool) -> i64 {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            title: "Web".to_string(),
            active: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_project(category_id: i64, title: &str) -> CreateProject {
    CreateProject {
        title: Translations::single("en", title),
        description: Translations::single("en", "repository test"),
        category_id,
        image: None,
        status: ProjectStatus::Open,
        active: true,
        order: 0,
        links: None,
        tag_ids: None,
    }
}

async fn links_of(pool: &PgPool, project_id: i64) -> Result<Vec<Link>, sqlx::Error> {
    LinkRepo::list_for_projects(pool, &[project_id]).await
}

async fn new_tag(pool: &PgPool, title: &str) -> i64 {
    TagRepo::create(
        pool,
        &CreateTag {
            title: Translations::single("en", title),
            color: "#ff0000".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_derives_slug(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;

    let project = ProjectRepo::create(&pool, &hooks, &new_project(category_id, "Foo Bar"))
        .await
        .unwrap();

    assert_eq!(project.slug.get("en"), Some("foo-bar"));
    assert_eq!(project.status(), ProjectStatus::Open);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rederives_slug_and_keeps_other_locales(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let mut input = new_project(category_id, "Foo Bar");
    input.title.set("fr", "Le Projet");
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    let update = UpdateProject {
        title: Some(Translations::single("en", "Baz")),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, &hooks, project.id, &update)
        .await
        .unwrap()
        .expect("project should exist");

    assert_eq!(updated.title.get("en"), Some("Baz"));
    assert_eq!(updated.title.get("fr"), Some("Le Projet"));
    assert_eq!(updated.slug.get("en"), Some("baz"));
    assert_eq!(updated.slug.get("fr"), Some("le-projet"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_project_returns_none(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);

    let result = ProjectRepo::update(&pool, &hooks, 9999, &UpdateProject::default())
        .await
        .unwrap();

    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Soft delete / restore / hard delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_and_restore_revives(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let project = ProjectRepo::create(&pool, &hooks, &new_project(category_id, "Hidden"))
        .await
        .unwrap();

    assert!(ProjectRepo::soft_delete(&pool, &hooks, project.id).await.unwrap());
    assert!(
        !ProjectRepo::soft_delete(&pool, &hooks, project.id).await.unwrap(),
        "second soft delete should be a no-op"
    );
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_none());

    let trashed = ProjectRepo::list_trashed(&pool).await.unwrap();
    assert!(trashed.iter().any(|p| p.id == project.id));
    let listed = ProjectRepo::list(&pool, &ProjectFilter::default()).await.unwrap();
    assert!(!listed.iter().any(|p| p.id == project.id));

    assert!(ProjectRepo::restore(&pool, project.id).await.unwrap());
    let restored = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .expect("restored project should be visible");
    assert_eq!(restored.slug.get("en"), Some("hidden"));
    assert!(!restored.is_trashed());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_live_project_is_noop(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let project = ProjectRepo::create(&pool, &hooks, &new_project(category_id, "Live"))
        .await
        .unwrap();

    assert!(!ProjectRepo::restore(&pool, project.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_removes_stored_image(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, disk) = hooks(&dir);
    disk.put("projects/cover.png", b"png").await.unwrap();
    let category_id = category(&pool).await;
    let mut input = new_project(category_id, "With Cover");
    input.image = Some("projects/cover.png".to_string());
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    ProjectRepo::soft_delete(&pool, &hooks, project.id).await.unwrap();

    assert!(!disk.exists("projects/cover.png").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_of_live_project_removes_stored_image(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, disk) = hooks(&dir);
    disk.put("projects/cover.png", b"png").await.unwrap();
    let category_id = category(&pool).await;
    let mut input = new_project(category_id, "Purged Live");
    input.image = Some("projects/cover.png".to_string());
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    assert!(ProjectRepo::hard_delete(&pool, &hooks, project.id).await.unwrap());

    assert!(!disk.exists("projects/cover.png").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_with_missing_image_still_deletes(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let mut input = new_project(category_id, "Dangling Cover");
    input.image = Some("projects/never-written.png".to_string());
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    assert!(ProjectRepo::soft_delete(&pool, &hooks, project.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_removes_row_and_relations(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let tag_id = new_tag(&pool, "Rust").await;
    let mut input = new_project(category_id, "Gone");
    input.tag_ids = Some(vec![tag_id]);
    input.links = Some(vec![LinkInput {
        title: "Repo".to_string(),
        url: "https://git.example".to_string(),
        icon: None,
    }]);
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    assert!(ProjectRepo::hard_delete(&pool, &hooks, project.id).await.unwrap());

    assert!(ProjectRepo::find_by_id_include_deleted(&pool, project.id)
        .await
        .unwrap()
        .is_none());
    assert!(links_of(&pool, project.id).await.unwrap().is_empty());
    assert!(!TagRepo::has_tag(&pool, project.id, tag_id).await.unwrap());
    assert!(!ProjectRepo::hard_delete(&pool, &hooks, project.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Links and tags on save
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_links_are_replaced_on_update(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let mut input = new_project(category_id, "Linked");
    input.links = Some(parse_links(&serde_json::json!(
        r#"[{"title":"A","url":"https://a.example","icon":"globe"},{"title":"B","url":"https://b.example","icon":"github"}]"#
    )));
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    let links = links_of(&pool, project.id).await.unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].title, "A");
    assert_eq!(links[1].icon.as_deref(), Some("github"));

    // An unparseable payload leaves the project with no links.
    let update = UpdateProject {
        links: Some(parse_links(&serde_json::json!("{broken"))),
        ..Default::default()
    };
    ProjectRepo::update(&pool, &hooks, project.id, &update)
        .await
        .unwrap();

    assert!(links_of(&pool, project.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_without_links_keeps_them(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let mut input = new_project(category_id, "Keeps Links");
    input.links = Some(vec![LinkInput {
        title: "Site".to_string(),
        url: "https://site.example".to_string(),
        icon: None,
    }]);
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    let update = UpdateProject {
        active: Some(false),
        ..Default::default()
    };
    let updated = ProjectRepo::update(&pool, &hooks, project.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert!(!updated.active);
    assert_eq!(links_of(&pool, project.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_ids_sync_tag_set(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let rust = new_tag(&pool, "Rust").await;
    let web = new_tag(&pool, "Web").await;
    let cli = new_tag(&pool, "CLI").await;
    let mut input = new_project(category_id, "Tagged");
    input.tag_ids = Some(vec![rust, web]);
    let project = ProjectRepo::create(&pool, &hooks, &input).await.unwrap();

    let update = UpdateProject {
        tag_ids: Some(vec![web, cli]),
        ..Default::default()
    };
    ProjectRepo::update(&pool, &hooks, project.id, &update)
        .await
        .unwrap();

    let ids: Vec<i64> = TagRepo::tags_for_project(&pool, project.id)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![web, cli]);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_orders(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (hooks, _) = hooks(&dir);
    let category_id = category(&pool).await;
    let tag_id = new_tag(&pool, "Featured").await;

    let mut second = new_project(category_id, "Second");
    second.order = 2;
    second.tag_ids = Some(vec![tag_id]);
    let mut first = new_project(category_id, "First");
    first.order = 1;
    first.status = ProjectStatus::Completed;
    let second = ProjectRepo::create(&pool, &hooks, &second).await.unwrap();
    let first = ProjectRepo::create(&pool, &hooks, &first).await.unwrap();

    let all = ProjectRepo::list(&pool, &ProjectFilter::default()).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let completed = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            status: Some(ProjectStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, first.id);

    let tagged = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            tag_id: Some(tag_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, second.id);

    let by_category = ProjectRepo::list_by_categories(&pool, &[category_id])
        .await
        .unwrap();
    assert_eq!(by_category.len(), 2);
}
