//! Integration tests for profile listing and the exercise catalog.

use spotter_db::RepoError;
use spotter_db::models::ExerciseCategory;
use spotter_db::queries::{clients, exercises};
use spotter_test_utils::{create_test_db, drop_test_db, seed_client, seed_trainer};

#[tokio::test]
async fn client_list_excludes_trainers_and_sorts_by_name() {
    let (pool, db_name) = create_test_db().await;

    seed_client(&pool, "Zofia Wójcik").await;
    seed_client(&pool, "Adam Mickiewicz").await;
    seed_trainer(&pool, "Coach Marta").await;

    let list = clients::list_clients(&pool).await.unwrap();
    let names: Vec<&str> = list.iter().map(|c| c.full_name.as_str()).collect();
    assert_eq!(names, vec!["Adam Mickiewicz", "Zofia Wójcik"]);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn role_lookup_distinguishes_trainer_from_client() {
    let (pool, db_name) = create_test_db().await;

    let trainer = seed_trainer(&pool, "Coach Marta").await;
    let client = seed_client(&pool, "Adam Mickiewicz").await;

    use spotter_db::models::ProfileRole;
    assert_eq!(
        clients::get_role(&pool, trainer).await.unwrap(),
        Some(ProfileRole::Trainer)
    );
    assert_eq!(
        clients::get_role(&pool, client).await.unwrap(),
        Some(ProfileRole::Client)
    );
    assert_eq!(
        clients::get_role(&pool, uuid::Uuid::new_v4()).await.unwrap(),
        None
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn dashboard_stats_count_clients_and_exercises() {
    let (pool, db_name) = create_test_db().await;

    seed_client(&pool, "Adam Mickiewicz").await;
    seed_client(&pool, "Zofia Wójcik").await;
    seed_trainer(&pool, "Coach Marta").await;
    exercises::insert_exercise_definition(&pool, "Deadlift", ExerciseCategory::Strength, None, &[])
        .await
        .unwrap();

    let stats = clients::dashboard_stats(&pool).await.unwrap();
    assert_eq!(stats.client_count, 2);
    assert_eq!(stats.exercise_count, 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn catalog_insert_validates_name_and_lists_alphabetically() {
    let (pool, db_name) = create_test_db().await;

    let result =
        exercises::insert_exercise_definition(&pool, "  ab ", ExerciseCategory::Cardio, None, &[])
            .await;
    assert!(matches!(result, Err(RepoError::Validation(_))));

    let muscles = vec!["quadriceps".to_owned(), "glutes".to_owned()];
    let squat = exercises::insert_exercise_definition(
        &pool,
        "Barbell Squat",
        ExerciseCategory::Strength,
        Some("Low-bar back squat"),
        &muscles,
    )
    .await
    .unwrap();
    assert_eq!(squat.primary_muscles, muscles);

    exercises::insert_exercise_definition(&pool, "Air Bike", ExerciseCategory::Cardio, None, &[])
        .await
        .unwrap();

    let list = exercises::list_exercise_definitions(&pool).await.unwrap();
    let names: Vec<&str> = list.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Air Bike", "Barbell Squat"]);

    pool.close().await;
    drop_test_db(&db_name).await;
}
