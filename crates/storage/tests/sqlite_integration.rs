use pod_core::model::{Course, CourseId, Lesson, LessonId, ProgressRecord};
use pod_core::time::fixed_now;
use storage::repository::{CourseRepository, ProgressRepository};
use storage::sqlite::SqliteRepository;
use storage::{StorageEngine, StorageError};

async fn memory_repo(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn build_course(id: &str, title: &str, lessons: &[(&str, &str)]) -> Course {
    let lessons = lessons
        .iter()
        .map(|(lid, ltitle)| Lesson::new(*lid, *ltitle, format!("content of {lid}"), None))
        .collect();
    Course::new(id, title, format!("{title} description"), lessons).unwrap()
}

#[tokio::test]
async fn sqlite_course_round_trip_preserves_lesson_order() {
    let repo = memory_repo("memdb_course_roundtrip").await;
    let course = Course::new(
        "rust-101",
        "Rust 101",
        "Learn Rust",
        vec![
            Lesson::new("z-last-id", "First", "one", Some("https://cdn/1.mp4".into())),
            Lesson::new("a-first-id", "Second", "two", None),
            Lesson::new("m-mid-id", "Third", "three", None),
        ],
    )
    .unwrap();
    repo.put_course(&course).await.unwrap();

    let fetched = repo.get_course(course.id()).await.unwrap().expect("stored");
    assert_eq!(fetched, course);
    assert_eq!(fetched.lessons()[0].media_url(), Some("https://cdn/1.mp4"));
}

#[tokio::test]
async fn sqlite_resave_replaces_course_without_merging() {
    let repo = memory_repo("memdb_course_replace").await;
    repo.put_course(&build_course("c1", "Old", &[("l1", "One"), ("l2", "Two"), ("l3", "Three")]))
        .await
        .unwrap();
    let replacement = build_course("c1", "New", &[("l9", "Nine")]);
    repo.put_course(&replacement).await.unwrap();

    let all = repo.list_courses().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], replacement);
}

#[tokio::test]
async fn sqlite_lists_every_distinct_course() {
    let repo = memory_repo("memdb_course_list").await;
    for i in 0..5 {
        let id = format!("course-{i}");
        repo.put_course(&build_course(&id, "Title", &[("l1", "One"), ("l2", "Two")]))
            .await
            .unwrap();
    }

    let all = repo.list_courses().await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|course| course.lesson_count() == 2));
}

#[tokio::test]
async fn sqlite_delete_course_is_idempotent() {
    let repo = memory_repo("memdb_course_delete").await;
    let course = build_course("c1", "Course", &[("l1", "One")]);
    repo.put_course(&course).await.unwrap();

    repo.delete_course(course.id()).await.unwrap();
    repo.delete_course(course.id()).await.unwrap();
    repo.delete_course(&CourseId::new("never-existed")).await.unwrap();
    assert!(repo.get_course(course.id()).await.unwrap().is_none());

    // Re-creating after delete must not resurrect the old lessons.
    let again = build_course("c1", "Course", &[]);
    repo.put_course(&again).await.unwrap();
    assert_eq!(repo.get_course(again.id()).await.unwrap(), Some(again));
}

#[tokio::test]
async fn sqlite_progress_upsert_keeps_one_record_per_pair() {
    let repo = memory_repo("memdb_progress_upsert").await;
    let course = CourseId::new("c1");
    let lesson = LessonId::new("l1");

    assert!(repo.get_progress(&course, &lesson).await.unwrap().is_none());

    let done = ProgressRecord::new(course.clone(), lesson.clone(), true, fixed_now());
    repo.put_progress(&done).await.unwrap();
    let undone = ProgressRecord::new(
        course.clone(),
        lesson.clone(),
        false,
        fixed_now() + chrono::Duration::minutes(1),
    );
    repo.put_progress(&undone).await.unwrap();

    let all = repo.list_progress().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], undone);
    assert_eq!(all[0].key().as_str(), "progress:c1:l1");
    assert_eq!(repo.get_progress(&course, &lesson).await.unwrap(), Some(undone));
}

#[tokio::test]
async fn sqlite_progress_survives_course_deletion() {
    let repo = memory_repo("memdb_progress_orphan").await;
    let course = build_course("c1", "Course", &[("l1", "One")]);
    repo.put_course(&course).await.unwrap();
    repo.put_progress(&ProgressRecord::new("c1".into(), "l1".into(), true, fixed_now()))
        .await
        .unwrap();

    repo.delete_course(course.id()).await.unwrap();

    let all = repo.list_progress().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].done());
}

#[tokio::test]
async fn engine_persists_across_reopen_of_file_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("pod.sqlite3").display());

    {
        let engine = StorageEngine::sqlite(&url);
        engine
            .put_course(&build_course("c1", "Course", &[("l1", "One")]))
            .await
            .unwrap();
        engine
            .put_progress(&ProgressRecord::new("c1".into(), "l1".into(), true, fixed_now()))
            .await
            .unwrap();
    }

    let reopened = StorageEngine::sqlite(&url);
    let courses = reopened.list_courses().await.unwrap();
    assert_eq!(courses.len(), 1);
    let progress = reopened
        .get_progress(&CourseId::new("c1"), &LessonId::new("l1"))
        .await
        .unwrap()
        .expect("persisted progress");
    assert!(progress.done());
    assert_eq!(progress.timestamp_ms(), fixed_now().timestamp_millis());
}

#[tokio::test]
async fn engine_reports_unavailable_for_unopenable_database() {
    let engine = StorageEngine::sqlite("sqlite:///nonexistent-learnpod-dir/nested/pod.sqlite3");
    let err = engine
        .get_course(&CourseId::new("c1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
}
