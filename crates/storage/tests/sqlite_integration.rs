use devenglish_core::model::{DeclaredCategory, LevelId, ProfileStatus, UserProfile};
use devenglish_core::progress::{LevelProgress, ResumePositions};
use devenglish_core::time::fixed_now;
use storage::repository::{ProfileKey, ProfileRecord, ProfileRepository};
use storage::sqlite::SqliteRepository;

fn build_profile(username: &str) -> UserProfile {
    let mut profile = UserProfile::provisional(
        username,
        DeclaredCategory::Unset,
        LevelProgress::new(),
        ResumePositions::new(),
        fixed_now(),
    )
    .unwrap();
    profile.finalize_signup(DeclaredCategory::Feminine, fixed_now());
    profile.set_level_progress(LevelId::Basico, 40.0, fixed_now());
    profile.set_resume_position(LevelId::Basico, 3, fixed_now());
    profile
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_profile() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = ProfileKey::for_user("ana");
    let profile = build_profile("ana");
    let record = ProfileRecord::from_profile(&profile);
    repo.save_profile(&key, &record).await.unwrap();

    let loaded = repo
        .load_profile(&key)
        .await
        .expect("load")
        .expect("record exists");
    let hydrated = loaded.into_profile("ana", fixed_now()).unwrap();
    assert_eq!(hydrated.level_progress().get(LevelId::Basico), 40.0);
    assert_eq!(hydrated.resume_positions().get(LevelId::Basico), 3);
    assert_eq!(hydrated.total_progress(), 8.0);
    assert_eq!(hydrated.status(), ProfileStatus::Complete);
}

#[tokio::test]
async fn sqlite_missing_profile_loads_as_none() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = ProfileKey::for_user("nobody");
    assert!(repo.load_profile(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_save_overwrites_existing_record() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = ProfileKey::for_user("ana");
    let mut record = ProfileRecord::default();
    repo.save_profile(&key, &record).await.unwrap();

    record.level_progress.set(LevelId::Avancado, 100.0);
    repo.save_profile(&key, &record).await.unwrap();

    let loaded = repo.load_profile(&key).await.unwrap().unwrap();
    assert_eq!(loaded.level_progress.get(LevelId::Avancado), 100.0);
}

#[tokio::test]
async fn sqlite_reads_legacy_record_with_absent_fields() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_legacy?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    // A record written before status/updatedAt existed.
    sqlx::query(
        "INSERT INTO profiles (namespace, username, data, updated_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind("devEnglish")
    .bind("legado")
    .bind(r#"{"levelProgress":{"iniciante":100.0},"totalProgress":20.0}"#)
    .bind("2023-11-14T22:13:20Z")
    .execute(repo.pool())
    .await
    .unwrap();

    let key = ProfileKey::for_user("legado");
    let loaded = repo.load_profile(&key).await.unwrap().unwrap();
    assert_eq!(loaded.status, ProfileStatus::Complete);
    assert_eq!(loaded.declared_category, DeclaredCategory::Unset);

    let hydrated = loaded.into_profile("legado", fixed_now()).unwrap();
    assert_eq!(hydrated.level_progress().get(LevelId::Iniciante), 100.0);
    assert_eq!(hydrated.total_progress(), 20.0);
}
