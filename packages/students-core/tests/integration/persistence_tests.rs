//! On-disk SQLite persistence.

use tempfile::tempdir;

use students_core::model::{StudentField, StudentPatch};
use students_core::{SqliteStorage, Storage};

#[tokio::test]
async fn test_rows_survive_reopen() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("students.db");

    let id = {
        let storage = SqliteStorage::connect(&path).await?;
        let id = storage.create_student("Ann", "ann@x.com", 20).await?;
        storage
            .update_student_by_id(id, &StudentPatch::new().with(StudentField::Age, 21))
            .await?;
        storage.close().await;
        id
    };

    assert!(path.exists());

    let storage = SqliteStorage::connect(&path).await?;
    let student = storage.get_student_by_id(id).await?;
    assert_eq!(student.name, "Ann");
    assert_eq!(student.age, 21);
    Ok(())
}

#[tokio::test]
async fn test_ids_not_reused_after_delete_across_reopen() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("students.db");

    let storage = SqliteStorage::connect(&path).await?;
    let first = storage.create_student("Ann", "ann@x.com", 20).await?;
    storage.delete_student_by_id(first).await?;
    storage.close().await;

    let storage = SqliteStorage::connect(&path).await?;
    let second = storage.create_student("Bob", "bob@x.com", 30).await?;
    assert!(second > first);
    Ok(())
}
