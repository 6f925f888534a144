use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::StreamExt;

use coach::auth::Identity;
use coach::domain::{ActivityLevel, AgeRelatedCondition, ExerciseGoal, Gender, UserId, UserProfile};
use coach::error::Error;
use coach::store::ProfileStore;
use coach::store::sqlite::SqliteDocuments;

fn store() -> ProfileStore {
    ProfileStore::new(Arc::new(SqliteDocuments::in_memory().unwrap()))
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn profile() -> UserProfile {
    UserProfile {
        date_of_birth: NaiveDate::from_ymd_opt(1985, 7, 14).unwrap(),
        weight_kg: 68.5,
        height_cm: 171.0,
        gender: Gender::Female,
        activity_level: ActivityLevel::LightlyActive,
        exercise_goal: ExerciseGoal::StrengthTraining,
        age_related_conditions: BTreeSet::from([AgeRelatedCondition::Postpartum]),
    }
}

#[tokio::test]
async fn save_then_load_is_equal() {
    let store = store();
    store.save(&user("u1"), &profile()).await.unwrap();
    assert_eq!(store.load(&user("u1")).await.unwrap(), Some(profile()));
}

#[tokio::test]
async fn missing_profile_is_none() {
    assert!(store().load(&user("nobody")).await.unwrap().is_none());
}

#[tokio::test]
async fn save_replaces_whole_profile() {
    let store = store();
    store.save(&user("u1"), &profile()).await.unwrap();

    let mut changed = profile();
    changed.gender = Gender::Male;
    changed.age_related_conditions.clear();
    changed.weight_kg = 80.0;
    store.save(&user("u1"), &changed).await.unwrap();

    let loaded = store.load(&user("u1")).await.unwrap().unwrap();
    assert_eq!(loaded, changed);
    assert!(loaded.age_related_conditions.is_empty());
}

#[tokio::test]
async fn profiles_are_per_user() {
    let store = store();
    store.save(&user("u1"), &profile()).await.unwrap();
    assert!(store.load(&user("u2")).await.unwrap().is_none());
}

#[tokio::test]
async fn invalid_profile_is_not_stored() {
    let store = store();
    let mut bad = profile();
    bad.weight_kg = 0.0;
    assert!(matches!(
        store.save(&user("u1"), &bad).await,
        Err(Error::InvalidInput(_))
    ));

    let mut bad = profile();
    bad.gender = Gender::Male;
    assert!(store.save(&user("u1"), &bad).await.is_err());

    assert!(store.load(&user("u1")).await.unwrap().is_none());
}

#[tokio::test]
async fn follow_tracks_sign_in_and_out() {
    let store = store();
    store.save(&user("u1"), &profile()).await.unwrap();
    let identity = Identity::open(":memory:").unwrap();

    let mut stream = Box::pin(store.follow(identity.subscribe()));
    assert_eq!(stream.next().await.unwrap().unwrap(), None);

    identity.login(user("u1")).unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), Some(profile()));

    identity.logout().unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), None);

    identity.login(user("u2")).unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), None);

    drop(identity);
    assert!(stream.next().await.is_none());
}
