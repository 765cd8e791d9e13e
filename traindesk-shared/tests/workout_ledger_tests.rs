//! Service-level tests for clients and the workout ledger
//!
//! These run against PostgreSQL at `DATABASE_URL` and are `#[ignore]`d by
//! default. Every account created here is deleted at the end of its test.

use sqlx::PgPool;
use traindesk_shared::{
    auth::middleware::AuthContext,
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    },
    error::ServiceError,
    mail::LogMailer,
    models::workout::WorkoutType,
    services::{
        accounts::{self, RegisterInput},
        clients::{self, CreateClientInput},
        workouts::{self, WorkoutInput, FOREIGN_CLIENT_MESSAGE},
    },
};
use uuid::Uuid;

struct Ledger {
    pool: PgPool,
    tag: String,
}

impl Ledger {
    async fn new() -> Self {
        let url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must point at a PostgreSQL test database");

        let pool = create_pool(DatabaseConfig::new(url))
            .await
            .expect("Failed to create pool");
        run_migrations(&pool).await.expect("Migrations failed");

        Self {
            pool,
            tag: Uuid::new_v4().simple().to_string(),
        }
    }

    async fn trainer(&self, name: &str) -> AuthContext {
        let account = accounts::register(
            &self.pool,
            &LogMailer,
            RegisterInput {
                email: format!("{}-{}@ledger.test", name, self.tag),
                password: "secret1".to_string(),
                trainer_name: name.to_string(),
            },
        )
        .await
        .expect("register should succeed");

        AuthContext {
            trainer_id: account.id,
        }
    }

    async fn client(&self, auth: &AuthContext, first: &str, last: &str) -> Uuid {
        clients::create_client(
            &self.pool,
            auth,
            CreateClientInput {
                first_name: first.to_string(),
                last_name: last.to_string(),
            },
        )
        .await
        .expect("create client should succeed")
        .id
    }

    async fn link_count(&self, workout_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM workout_clients WHERE workout_id = $1")
            .bind(workout_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn cleanup(&self) {
        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(format!("%-{}@ledger.test", self.tag))
            .execute(&self.pool)
            .await
            .unwrap();
    }
}

fn workout(date: &str, duration_min: i32, kind: &str, client_ids: &[Uuid]) -> WorkoutInput {
    WorkoutInput {
        date: date.to_string(),
        duration_min,
        workout_type: kind.to_string(),
        client_ids: client_ids.iter().map(Uuid::to_string).collect(),
        notes: None,
    }
}

fn sorted(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_create_and_get_workout() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer("create").await;
    let c1 = ledger.client(&auth, "Bob", "Stone").await;
    let c2 = ledger.client(&auth, "Amy", "Adams").await;

    let mut input = workout("2024-05-01", 90, "functional", &[c1, c2]);
    input.notes = Some("circuit".to_string());

    let created = workouts::create_workout(&ledger.pool, &auth, input)
        .await
        .unwrap();
    assert_eq!(created.client_ids, vec![c1, c2]);
    assert_eq!(created.workout_type, WorkoutType::Functional);

    let fetched = workouts::get_workout(&ledger.pool, &auth, created.id)
        .await
        .unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.date.to_string(), "2024-05-01");
    assert_eq!(fetched.duration_min, 90);
    assert_eq!(fetched.notes.as_deref(), Some("circuit"));
    assert_eq!(fetched.client_ids, sorted(vec![c1, c2]));

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_update_replaces_links_wholesale() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer("replace").await;
    let c1 = ledger.client(&auth, "Bob", "Stone").await;
    let c2 = ledger.client(&auth, "Amy", "Adams").await;

    let created = workouts::create_workout(
        &ledger.pool,
        &auth,
        workout("2024-05-01", 30, "cardio", &[c1, c2]),
    )
    .await
    .unwrap();

    let updated = workouts::update_workout(
        &ledger.pool,
        &auth,
        created.id,
        workout("2024-05-02", 45, "stretch", &[]),
    )
    .await
    .unwrap();
    assert!(updated.client_ids.is_empty());
    assert_eq!(ledger.link_count(created.id).await, 0);

    let fetched = workouts::get_workout(&ledger.pool, &auth, created.id)
        .await
        .unwrap();
    assert_eq!(fetched.workout_type, WorkoutType::Stretch);
    assert_eq!(fetched.duration_min, 45);

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_duration_bounds() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer("bounds").await;

    for duration in [1, 300] {
        let result = workouts::create_workout(
            &ledger.pool,
            &auth,
            workout("2024-05-01", duration, "cardio", &[]),
        )
        .await;
        assert!(result.is_ok(), "duration {} should be accepted", duration);
    }

    for duration in [0, 301, -5] {
        let result = workouts::create_workout(
            &ledger.pool,
            &auth,
            workout("2024-05-01", duration, "cardio", &[]),
        )
        .await;
        assert!(
            matches!(result, Err(ServiceError::Validation(_))),
            "duration {} should be rejected",
            duration
        );
    }

    let listed = workouts::list_workouts(&ledger.pool, &auth).await.unwrap();
    assert_eq!(listed.len(), 2);

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_foreign_client_leaves_nothing_behind() {
    let ledger = Ledger::new().await;
    let ann = ledger.trainer("ann").await;
    let ben = ledger.trainer("ben").await;
    let own = ledger.client(&ann, "Amy", "Adams").await;
    let foreign = ledger.client(&ben, "Carl", "Berg").await;

    let result = workouts::create_workout(
        &ledger.pool,
        &ann,
        workout("2024-05-01", 30, "cardio", &[own, foreign]),
    )
    .await;

    match result {
        Err(ServiceError::Validation(errors)) => {
            assert_eq!(errors[0].field, "client_ids");
            assert_eq!(errors[0].message, FOREIGN_CLIENT_MESSAGE);
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    assert!(workouts::list_workouts(&ledger.pool, &ann)
        .await
        .unwrap()
        .is_empty());

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_nonexistent_client_rejected() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer("ghost").await;

    let result = workouts::create_workout(
        &ledger.pool,
        &auth,
        workout("2024-05-01", 30, "cardio", &[Uuid::new_v4()]),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_tenant_isolation() {
    let ledger = Ledger::new().await;
    let ann = ledger.trainer("iso-ann").await;
    let ben = ledger.trainer("iso-ben").await;

    let created = workouts::create_workout(
        &ledger.pool,
        &ann,
        workout("2024-05-01", 30, "strength", &[]),
    )
    .await
    .unwrap();

    assert!(matches!(
        workouts::get_workout(&ledger.pool, &ben, created.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        workouts::update_workout(
            &ledger.pool,
            &ben,
            created.id,
            workout("2024-06-01", 60, "cardio", &[]),
        )
        .await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        workouts::delete_workout(&ledger.pool, &ben, created.id).await,
        Err(ServiceError::NotFound(_))
    ));

    let untouched = workouts::get_workout(&ledger.pool, &ann, created.id)
        .await
        .unwrap();
    assert_eq!(untouched.date.to_string(), "2024-05-01");
    assert_eq!(untouched.workout_type, WorkoutType::Strength);

    assert!(clients::list_clients(&ledger.pool, &ben)
        .await
        .unwrap()
        .is_empty());

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_delete_removes_links_only() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer("delete").await;
    let client = ledger.client(&auth, "Amy", "Adams").await;

    let created = workouts::create_workout(
        &ledger.pool,
        &auth,
        workout("2024-05-01", 30, "cardio", &[client]),
    )
    .await
    .unwrap();
    assert_eq!(ledger.link_count(created.id).await, 1);

    workouts::delete_workout(&ledger.pool, &auth, created.id)
        .await
        .unwrap();

    assert_eq!(ledger.link_count(created.id).await, 0);
    assert!(matches!(
        workouts::get_workout(&ledger.pool, &auth, created.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert_eq!(
        clients::list_clients(&ledger.pool, &auth).await.unwrap().len(),
        1
    );

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_list_attaches_links_per_workout() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer("list").await;
    let c1 = ledger.client(&auth, "Amy", "Adams").await;
    let c2 = ledger.client(&auth, "Bob", "Stone").await;

    let older = workouts::create_workout(
        &ledger.pool,
        &auth,
        workout("2024-01-01", 30, "cardio", &[c1]),
    )
    .await
    .unwrap();
    let newer = workouts::create_workout(
        &ledger.pool,
        &auth,
        workout("2024-02-01", 30, "cardio", &[c1, c2]),
    )
    .await
    .unwrap();
    let bare = workouts::create_workout(
        &ledger.pool,
        &auth,
        workout("2024-01-15", 30, "cardio", &[]),
    )
    .await
    .unwrap();

    let listed = workouts::list_workouts(&ledger.pool, &auth).await.unwrap();
    let order: Vec<Uuid> = listed.iter().map(|w| w.id).collect();
    assert_eq!(order, vec![newer.id, bare.id, older.id]);

    assert_eq!(sorted(listed[0].client_ids.clone()), sorted(vec![c1, c2]));
    assert!(listed[1].client_ids.is_empty());
    assert_eq!(listed[2].client_ids, vec![c1]);

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_client_names_are_trimmed() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer("trim").await;

    ledger.client(&auth, "  Amy ", " Adams  ").await;

    let listed = clients::list_clients(&ledger.pool, &auth).await.unwrap();
    assert_eq!(listed[0].first_name, "Amy");
    assert_eq!(listed[0].last_name, "Adams");

    ledger.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn test_long_names_are_accepted() {
    let ledger = Ledger::new().await;
    let auth = ledger.trainer(&"t".repeat(300)).await;

    let first = "F".repeat(300);
    let last = "L".repeat(1000);
    ledger.client(&auth, &first, &last).await;

    let listed = clients::list_clients(&ledger.pool, &auth).await.unwrap();
    assert_eq!(listed[0].first_name, first);
    assert_eq!(listed[0].last_name, last);

    ledger.cleanup().await;
}
