//! Migration smoke tests: schema comes up, and the constraints the
//! repository relies on are actually present.

use spotter_test_utils::{create_test_db, drop_test_db, seed_client};

#[tokio::test]
async fn migrations_create_all_tables() {
    let (pool, db_name) = create_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT tablename::text FROM pg_tables \
         WHERE schemaname = 'public' AND tablename NOT LIKE '\\_sqlx%' \
         ORDER BY tablename",
    )
    .fetch_all(&pool)
    .await
    .expect("should list tables");

    let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "exercise_definitions",
            "profiles",
            "workout_exercises",
            "workout_plans",
            "workouts",
        ]
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (pool, db_name) = create_test_db().await;

    // A second run must be a no-op, not an error.
    spotter_db::pool::run_migrations(&pool)
        .await
        .expect("re-running migrations should succeed");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn at_most_one_active_plan_per_client() {
    let (pool, db_name) = create_test_db().await;
    let client = seed_client(&pool, "Jan Kowalski").await;

    spotter_db::queries::plans::insert_plan(&pool, client)
        .await
        .expect("first active plan should insert");

    let second = spotter_db::queries::plans::insert_plan(&pool, client).await;
    assert!(
        matches!(second, Err(spotter_db::RepoError::Store(_))),
        "second active plan must violate the partial unique index"
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}
