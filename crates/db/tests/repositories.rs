//! Repository-level integration tests against a throwaway Postgres database.

use assert_matches::assert_matches;
use rahnuma_db::models::category::{CreateCategory, UpdateCategory};
use rahnuma_db::models::feature::{CreateFeature, CriterionInput, UpdateFeature};
use rahnuma_db::models::prd::{CreatePrd, UpdatePrd};
use rahnuma_db::models::reference::CreateProjectReference;
use rahnuma_db::models::role::{CreatePrdRole, UpdatePrdRole};
use rahnuma_db::models::user::CreateUser;
use rahnuma_db::repositories::{
    CategoryRepo, FeatureRepo, PrdRepo, PrdRoleRepo, ReferenceRepo, UserRepo,
};
use sqlx::PgPool;

fn new_prd(title: &str) -> CreatePrd {
    CreatePrd {
        title: title.to_string(),
        client_name: "Acme".to_string(),
        project_overview: "Customer portal".to_string(),
    }
}

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

fn feature_input(title: &str, criteria: &[&str]) -> CreateFeature {
    CreateFeature {
        title: title.to_string(),
        description: String::new(),
        priority: None,
        estimate_hours: None,
        acceptance_criteria: criteria
            .iter()
            .map(|c| CriterionInput {
                description: c.to_string(),
            })
            .collect(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_lookup_by_username_and_email(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice")).await.unwrap();
    assert!(user.is_active);
    assert!(user.last_login_at.is_none());

    let by_name = UserRepo::find_by_username(&pool, "alice").await.unwrap().unwrap();
    assert_eq!(by_name.id, user.id);

    let by_email = UserRepo::find_by_email(&pool, "ALICE@example.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    UserRepo::record_login(&pool, user.id).await.unwrap();
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_violates_named_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("bob")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("bob")).await.unwrap_err();

    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_users_username"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn prd_create_update_and_page(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("carol")).await.unwrap();
    let first = PrdRepo::create(&pool, &new_prd("First"), Some(user.id)).await.unwrap();
    let second = PrdRepo::create(&pool, &new_prd("Second"), None).await.unwrap();
    assert_eq!(first.created_by, Some(user.id));

    let (page, total) = PrdRepo::list_page(&pool, 1, 0).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, second.id, "newest PRD comes first");

    let update = UpdatePrd {
        title: Some("Renamed".to_string()),
        ..UpdatePrd::default()
    };
    let updated = PrdRepo::update(&pool, first.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.client_name, "Acme");
    assert!(updated.updated_at >= first.updated_at);

    assert!(PrdRepo::update(&pool, 999_999, &update).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn roles_are_scoped_to_their_prd(pool: PgPool) {
    let prd = PrdRepo::create(&pool, &new_prd("A"), None).await.unwrap();
    let other = PrdRepo::create(&pool, &new_prd("B"), None).await.unwrap();

    let role = PrdRoleRepo::create(
        &pool,
        prd.id,
        &CreatePrdRole {
            name: "Admin".to_string(),
            description: "Back office".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(PrdRoleRepo::find_in_prd(&pool, other.id, role.id).await.unwrap().is_none());
    let update = UpdatePrdRole {
        name: Some("Owner".to_string()),
        description: None,
    };
    assert!(PrdRoleRepo::update(&pool, other.id, role.id, &update).await.unwrap().is_none());
    assert!(!PrdRoleRepo::delete(&pool, other.id, role.id).await.unwrap());

    let updated = PrdRoleRepo::update(&pool, prd.id, role.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.name, "Owner");
    assert_eq!(updated.description, "Back office");
    assert!(PrdRoleRepo::delete(&pool, prd.id, role.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feature_defaults_and_criteria_replacement(pool: PgPool) {
    let prd = PrdRepo::create(&pool, &new_prd("A"), None).await.unwrap();
    let category = CategoryRepo::create(
        &pool,
        prd.id,
        &CreateCategory {
            name: "Auth".to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let created = FeatureRepo::create(&pool, category.id, &feature_input("Login", &["works", "fails"]))
        .await
        .unwrap();
    assert_eq!(created.feature.priority, "medium");
    assert_eq!(created.feature.estimate_hours, 0.0);
    assert_eq!(created.acceptance_criteria.len(), 2);

    let update = UpdateFeature {
        title: None,
        description: None,
        priority: Some("high".to_string()),
        estimate_hours: Some(6.5),
        acceptance_criteria: Some(vec![CriterionInput {
            description: "only this".to_string(),
        }]),
    };
    let updated = FeatureRepo::update(&pool, category.id, created.feature.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.feature.title, "Login");
    assert_eq!(updated.feature.priority, "high");
    assert_eq!(updated.feature.estimate_hours, 6.5);
    assert_eq!(updated.acceptance_criteria.len(), 1);
    assert_eq!(updated.acceptance_criteria[0].description, "only this");

    let listed = CategoryRepo::list_with_features(&pool, prd.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].features.len(), 1);
    assert_eq!(listed[0].features[0].acceptance_criteria.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_priority_is_rejected_by_check_constraint(pool: PgPool) {
    let prd = PrdRepo::create(&pool, &new_prd("A"), None).await.unwrap();
    let category = CategoryRepo::create(
        &pool,
        prd.id,
        &CreateCategory {
            name: "Core".to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let mut input = feature_input("Export", &["a"]);
    input.priority = Some("urgent".to_string());
    let err = FeatureRepo::create(&pool, category.id, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("ck_features_priority"));

    // The failed insert must not leave criteria behind.
    let features = FeatureRepo::list_by_category_with_criteria(&pool, category.id).await.unwrap();
    assert!(features.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_prd_cascades(pool: PgPool) {
    let prd = PrdRepo::create(&pool, &new_prd("Doomed"), None).await.unwrap();
    PrdRoleRepo::create(
        &pool,
        prd.id,
        &CreatePrdRole {
            name: "User".to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();
    let category = CategoryRepo::create(
        &pool,
        prd.id,
        &CreateCategory {
            name: "Billing".to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();
    FeatureRepo::create(&pool, category.id, &feature_input("Invoices", &["sent monthly"]))
        .await
        .unwrap();
    ReferenceRepo::create(
        &pool,
        prd.id,
        &CreateProjectReference {
            name: "Kickoff".to_string(),
            content_type: "meeting_notes".to_string(),
            content: "Notes".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(PrdRepo::delete(&pool, prd.id).await.unwrap());
    assert!(!PrdRepo::exists(&pool, prd.id).await.unwrap());

    for table in [
        "prd_roles",
        "prd_categories",
        "features",
        "feature_acceptance_criteria",
        "project_references",
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table} should be empty after cascade");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_category_outside_prd_is_none(pool: PgPool) {
    let prd = PrdRepo::create(&pool, &new_prd("A"), None).await.unwrap();
    let other = PrdRepo::create(&pool, &new_prd("B"), None).await.unwrap();
    let category = CategoryRepo::create(
        &pool,
        prd.id,
        &CreateCategory {
            name: "Core".to_string(),
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let update = UpdateCategory {
        name: Some("Moved".to_string()),
        description: None,
    };
    assert!(CategoryRepo::update(&pool, other.id, category.id, &update).await.unwrap().is_none());
    assert!(!CategoryRepo::delete(&pool, other.id, category.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn every_table_has_timestamps_and_bigint_ids(pool: PgPool) {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT table_name::text, column_name::text, data_type::text
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND table_name <> '_sqlx_migrations'
           AND column_name IN ('id', 'created_at', 'updated_at')",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    let tables: std::collections::BTreeSet<&str> = rows.iter().map(|(t, _, _)| t.as_str()).collect();
    assert_eq!(tables.len(), 7);

    for table in tables {
        let cols: Vec<_> = rows.iter().filter(|(t, _, _)| t == table).collect();
        assert_eq!(cols.len(), 3, "{table} must have id, created_at, updated_at");
        for (_, column, data_type) in cols {
            let expected = if column == "id" { "bigint" } else { "timestamp with time zone" };
            assert_eq!(data_type, expected, "{table}.{column}");
        }
    }
}
