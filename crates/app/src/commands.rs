use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use pod_core::model::{CourseId, LessonId};
use services::{AppServices, CatalogOrigin, ProgressExport};
use tokio::io::AsyncReadExt;

use crate::cli::Command;

pub async fn run(app: &AppServices, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Catalog { json } => catalog(app, json).await,
        Command::Download { course_id } => download(app, CourseId::new(course_id)).await,
        Command::Import { file } => import(app, &file).await,
        Command::Show { course_id } => show(app, &CourseId::new(course_id)).await,
        Command::Toggle {
            course_id,
            lesson_id,
        } => toggle(app, &CourseId::new(course_id), &LessonId::new(lesson_id)).await,
        Command::Export { out_dir, stdout } => export(app, &out_dir, stdout).await,
        Command::Delete { course_id } => delete(app, &CourseId::new(course_id)).await,
    }
}

async fn catalog(app: &AppServices, json: bool) -> anyhow::Result<()> {
    let catalog = app
        .courses()
        .load_catalog()
        .await
        .context("failed to load courses")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    if catalog.entries.is_empty() {
        println!("No courses available.");
        return Ok(());
    }
    if catalog.origin == CatalogOrigin::Remote {
        println!("Nothing downloaded yet. Available courses:");
    }
    for entry in &catalog.entries {
        let mark = if entry.downloaded { "downloaded" } else { "available" };
        println!(
            "{:<24} {:<12} {} ({} lessons)",
            entry.course.id(),
            mark,
            entry.course.title(),
            entry.course.lesson_count()
        );
    }
    Ok(())
}

async fn download(app: &AppServices, course_id: CourseId) -> anyhow::Result<()> {
    let course = app
        .courses()
        .download_from_catalog(&course_id)
        .await
        .context("failed to download course")?;
    println!("Downloaded: {}", course.title());
    Ok(())
}

async fn read_input(file: &Path) -> anyhow::Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read course JSON from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))
}

async fn import(app: &AppServices, file: &Path) -> anyhow::Result<()> {
    let text = read_input(file).await?;
    let course = app
        .courses()
        .import_course_json(&text)
        .await
        .context("course upload rejected")?;
    println!(
        "Course \"{}\" uploaded ({} lessons).",
        course.title(),
        course.lesson_count()
    );
    Ok(())
}

async fn show(app: &AppServices, course_id: &CourseId) -> anyhow::Result<()> {
    let Some(course) = app.courses().get_course(course_id).await? else {
        bail!("course {course_id} not found; it may not be downloaded yet");
    };
    let completion = app.progress().completion(&course).await?;

    println!("{}", course.title());
    if !course.description().is_empty() {
        println!("{}", course.description());
    }
    println!(
        "{} of {} lessons complete ({}%)",
        completion.completed_count(),
        completion.total(),
        completion.percent()
    );
    for (idx, lesson) in course.lessons().iter().enumerate() {
        let mark = if completion.is_lesson_complete(lesson.id()) {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {:>2}. {} ({})", idx + 1, lesson.title(), lesson.id());
    }
    Ok(())
}

async fn toggle(app: &AppServices, course_id: &CourseId, lesson_id: &LessonId) -> anyhow::Result<()> {
    let progress = app.progress();
    let Some(done) = progress
        .toggle_lesson_complete_guarded(course_id, lesson_id)
        .await
        .context("failed to update progress")?
    else {
        bail!("a toggle for this lesson is already in progress");
    };
    if done {
        println!("Lesson marked as complete!");
    } else {
        println!("Lesson marked as incomplete");
    }
    Ok(())
}

async fn write_export(export: &ProgressExport, out_dir: &Path) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(&export.file_name);
    tokio::fs::write(&path, &export.csv)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

async fn export(app: &AppServices, out_dir: &Path, stdout: bool) -> anyhow::Result<()> {
    let export = app
        .progress()
        .export_progress()
        .await
        .context("failed to export progress data")?;
    if export.is_empty() {
        bail!("No progress data to export");
    }

    if stdout {
        println!("{}", export.csv);
        return Ok(());
    }
    let path = write_export(&export, out_dir).await?;
    tracing::info!(path = %path.display(), rows = export.row_count, mime = export.mime_type(), "wrote progress export");
    println!("Progress data exported to {}", path.display());
    Ok(())
}

async fn delete(app: &AppServices, course_id: &CourseId) -> anyhow::Result<()> {
    app.courses()
        .delete_course(course_id)
        .await
        .context("failed to delete course")?;
    println!("Deleted {course_id}");
    Ok(())
}
