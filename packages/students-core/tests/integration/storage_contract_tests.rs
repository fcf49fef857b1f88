//! Storage contract tests, executed against every engine.

use serde_json::json;

use students_core::error::DbError;
use students_core::model::{Student, StudentField, StudentPatch};

use super::helpers::{create_ann, engines};

#[tokio::test]
async fn test_create_then_read_back() {
    for engine in engines().await {
        let storage = engine.storage.as_ref();

        let first = create_ann(storage).await;
        let second = storage
            .create_student("Bob", "bob@x.com", 44)
            .await
            .unwrap();
        assert!(second > first, "{}: ids must increase", engine.name);

        let ann = storage.get_student_by_id(first).await.unwrap();
        assert_eq!(
            ann,
            Student {
                id: first,
                name: "Ann".into(),
                email: "ann@x.com".into(),
                age: 20,
            },
            "{}",
            engine.name
        );
    }
}

#[tokio::test]
async fn test_list_empty_and_ordered() {
    for engine in engines().await {
        let storage = engine.storage.as_ref();
        assert!(storage.get_students().await.unwrap().is_empty());

        let a = create_ann(storage).await;
        let b = storage
            .create_student("Bob", "bob@x.com", 44)
            .await
            .unwrap();

        let ids: Vec<i64> = storage
            .get_students()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![a, b], "{}", engine.name);
    }
}

#[tokio::test]
async fn test_update_without_fields_leaves_row_unchanged() {
    for engine in engines().await {
        let storage = engine.storage.as_ref();
        let id = create_ann(storage).await;
        let before = storage.get_student_by_id(id).await.unwrap();

        let empty = StudentPatch::new();
        let unknown_only: StudentPatch =
            serde_json::from_value(json!({"id": 99, "grade": "A"})).unwrap();

        for patch in [empty, unknown_only] {
            let err = storage.update_student_by_id(id, &patch).await.unwrap_err();
            assert!(
                matches!(err, DbError::NoFieldsToUpdate),
                "{}: {:?}",
                engine.name,
                err
            );
            assert_eq!(err.to_string(), "no fields to update");
        }

        assert_eq!(storage.get_student_by_id(id).await.unwrap(), before);
    }
}

#[tokio::test]
async fn test_update_single_field_matches_fresh_read() {
    for engine in engines().await {
        let storage = engine.storage.as_ref();
        let id = create_ann(storage).await;

        let patch = StudentPatch::new().with(StudentField::Age, 30);
        let updated = storage.update_student_by_id(id, &patch).await.unwrap();

        assert_eq!(updated.age, 30, "{}", engine.name);
        assert_eq!(updated.name, "Ann");
        assert_eq!(updated.email, "ann@x.com");
        assert_eq!(updated, storage.get_student_by_id(id).await.unwrap());
    }
}

#[tokio::test]
async fn test_missing_id_is_not_found_everywhere() {
    for engine in engines().await {
        let storage = engine.storage.as_ref();
        let missing = 4242;

        assert!(matches!(
            storage.get_student_by_id(missing).await,
            Err(DbError::StudentNotFound { id: 4242 })
        ));
        assert!(matches!(
            storage.delete_student_by_id(missing).await,
            Err(DbError::StudentNotFound { id: 4242 })
        ));
        let patch = StudentPatch::new().with(StudentField::Name, "Ghost");
        assert!(matches!(
            storage.update_student_by_id(missing, &patch).await,
            Err(DbError::StudentNotFound { id: 4242 })
        ));

        assert!(
            storage.get_students().await.unwrap().is_empty(),
            "{}: no row may be created as a side effect",
            engine.name
        );
    }
}

#[tokio::test]
async fn test_delete_is_not_idempotent() {
    for engine in engines().await {
        let storage = engine.storage.as_ref();
        let id = create_ann(storage).await;

        storage.delete_student_by_id(id).await.unwrap();
        assert!(matches!(
            storage.get_student_by_id(id).await,
            Err(DbError::StudentNotFound { .. })
        ));
        assert!(
            matches!(
                storage.delete_student_by_id(id).await,
                Err(DbError::StudentNotFound { .. })
            ),
            "{}",
            engine.name
        );
    }
}

#[tokio::test]
async fn test_email_update_scenario() {
    for engine in engines().await {
        let storage = engine.storage.as_ref();
        let id = create_ann(storage).await;
        assert_eq!(id, 1, "{}", engine.name);

        let patch: StudentPatch = serde_json::from_value(json!({"email": "a@y.com"})).unwrap();
        let updated = storage.update_student_by_id(id, &patch).await.unwrap();
        assert_eq!(
            serde_json::to_value(&updated).unwrap(),
            json!({"id": 1, "name": "Ann", "email": "a@y.com", "age": 20})
        );

        assert_eq!(storage.get_students().await.unwrap(), vec![updated]);
    }
}

#[tokio::test]
async fn test_engines_agree_on_column_typing() {
    let patches = [
        (StudentField::Name, json!(5)),
        (StudentField::Email, json!(true)),
        (StudentField::Age, json!(true)),
        (StudentField::Age, json!(" 31 ")),
        (StudentField::Age, json!(32.0)),
        (StudentField::Age, json!(30.5)),
        (StudentField::Age, json!("old")),
        (StudentField::Name, json!(null)),
    ];

    let mut outcomes = Vec::new();
    for engine in engines().await {
        let storage = engine.storage.as_ref();
        let id = create_ann(storage).await;

        let mut results = Vec::new();
        for (field, value) in &patches {
            let patch = StudentPatch::new().with(*field, value.clone());
            let result = storage.update_student_by_id(id, &patch).await;
            let current = storage.get_student_by_id(id).await.unwrap();
            results.push((result.ok(), current));
        }
        outcomes.push((engine.name, results));
    }

    let (_, memory) = &outcomes[0];
    let (_, sqlite) = &outcomes[1];
    for ((field, value), (left, right)) in patches.iter().zip(memory.iter().zip(sqlite)) {
        assert_eq!(left, right, "{:?} = {}", field, value);
    }

    let accepted: Vec<bool> = memory.iter().map(|(result, _)| result.is_some()).collect();
    assert_eq!(
        accepted,
        vec![true, true, true, true, true, false, false, false]
    );
    let (_, last) = memory.last().unwrap();
    assert_eq!(last.name, "5");
    assert_eq!(last.email, "1");
    assert_eq!(last.age, 32);
}
