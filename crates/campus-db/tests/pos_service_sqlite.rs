//! PosService running on the SQLite repository.

use std::sync::Arc;

use campus_core::{
    CampusType, PosError, PosInput, PosService, PosTarget, PosType, PosUpdate, PostalCodeInput,
    ValidationError,
};
use campus_db::{Database, DbConfig, SqlitePosRepository};

async fn service() -> PosService<SqlitePosRepository> {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    PosService::new(Arc::new(db.pos()))
}

fn kaffeebar() -> PosInput {
    PosInput {
        name: Some("Kaffeebar".to_string()),
        description: Some("Main hall".to_string()),
        pos_type: Some("CAFE".to_string()),
        campus: Some("NEUENHEIMER_FELD".to_string()),
        street: Some("Im Neuenheimer Feld".to_string()),
        house_number: Some("300".to_string()),
        postal_code: Some(PostalCodeInput::Number(69120)),
        city: Some("Heidelberg".to_string()),
    }
}

fn named(name: &str, pos_type: &str, campus: &str) -> PosInput {
    PosInput {
        name: Some(name.to_string()),
        pos_type: Some(pos_type.to_string()),
        campus: Some(campus.to_string()),
        ..kaffeebar()
    }
}

#[tokio::test]
async fn test_create_then_retrieve_in_same_order() {
    let service = service().await;
    let inputs = vec![
        named("Zentrum", "CAFE", "ALTSTADT"),
        named("Automat", "VENDING_MACHINE", "BERGHEIM"),
        named("Backstube", "BAKERY", "NEUENHEIMER_FELD"),
    ];

    let created = service.create_pos(inputs.clone()).await.unwrap();
    let retrieved = service.retrieve_pos().await.unwrap();

    assert_eq!(created.len(), inputs.len());
    assert_eq!(retrieved, created);
    let round_tripped: Vec<PosInput> = retrieved.iter().map(PosInput::from).collect();
    assert_eq!(round_tripped, inputs);
}

#[tokio::test]
async fn test_invalid_type_rejects_batch_and_persists_nothing() {
    let service = service().await;

    let err = service
        .create_pos(vec![kaffeebar(), named("Kneipe", "PUB", "ALTSTADT")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PosError::Validation {
            index: 1,
            source: ValidationError::NotAllowed { .. }
        }
    ));
    assert!(service.retrieve_pos().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_by_name_scenario() {
    let service = service().await;
    let created = service.create_pos(vec![kaffeebar()]).await.unwrap();

    let mut renovated = kaffeebar();
    renovated.description = Some("Renovated".to_string());
    let updated = service
        .update_pos(vec![PosUpdate::by_name(renovated.clone())])
        .await
        .unwrap();

    let all = service.retrieve_pos().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], updated[0]);
    assert_eq!(all[0].description.as_deref(), Some("Renovated"));
    assert_eq!(all[0].id, created[0].id);
    assert_eq!(all[0].created_at, created[0].created_at);
    assert!(all[0].updated_at > created[0].updated_at);
    assert_eq!(PosInput::from(&all[0]), renovated);
}

#[tokio::test]
async fn test_update_unknown_name_leaves_state_unchanged() {
    let service = service().await;
    let created = service.create_pos(vec![kaffeebar()]).await.unwrap();

    let err = service
        .update_pos(vec![PosUpdate::by_name(named("Phantom", "CAFE", "ALTSTADT"))])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PosError::NotFound { index: 0, target: PosTarget::Name(ref name) } if name == "Phantom"
    ));
    assert_eq!(service.retrieve_pos().await.unwrap(), created);
}

#[tokio::test]
async fn test_update_only_touches_targeted_records() {
    let service = service().await;
    let created = service
        .create_pos(vec![
            named("Eins", "CAFE", "ALTSTADT"),
            named("Zwei", "CAFE", "ALTSTADT"),
            named("Drei", "CAFE", "ALTSTADT"),
        ])
        .await
        .unwrap();

    let updated = service
        .update_pos(vec![
            PosUpdate::by_id(created[2].id.clone(), named("Drei", "BAKERY", "BERGHEIM")),
            PosUpdate::by_id(created[0].id.clone(), named("Eins", "CAFETERIA", "ALTSTADT")),
        ])
        .await
        .unwrap();

    assert_eq!(updated[0].id, created[2].id);
    assert_eq!(updated[0].campus, CampusType::Bergheim);
    assert_eq!(updated[1].id, created[0].id);
    assert_eq!(updated[1].pos_type, PosType::Cafeteria);

    let all = service.retrieve_pos().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
    let created_ids: Vec<&str> = created.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, created_ids);
    assert_eq!(all[1], created[1]);
    assert!(all[0].updated_at > created[0].updated_at);
    assert!(all[2].updated_at > created[2].updated_at);
}

#[tokio::test]
async fn test_clear_empties_and_is_idempotent() {
    let service = service().await;
    service
        .create_pos(vec![kaffeebar(), named("Automat", "VENDING_MACHINE", "BERGHEIM")])
        .await
        .unwrap();

    service.clear().await.unwrap();
    assert!(service.retrieve_pos().await.unwrap().is_empty());

    service.clear().await.unwrap();
    assert!(service.retrieve_pos().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_updates_of_one_record_keep_last_writer() {
    let service = service().await;
    let created = service.create_pos(vec![kaffeebar()]).await.unwrap();
    let id = created[0].id.clone();

    let mut handles = Vec::new();
    for n in 0..8 {
        let service = service.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            let mut fields = kaffeebar();
            fields.description = Some(format!("writer {}", n));
            service
                .update_pos(vec![PosUpdate::by_id(id, fields)])
                .await
                .unwrap()
                .remove(0)
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let last = results.iter().max_by_key(|p| p.updated_at).unwrap();
    let stored = service.get_pos(&id).await.unwrap();
    assert_eq!(&stored, last);
    assert_eq!(stored.created_at, created[0].created_at);
}

#[tokio::test]
async fn test_malformed_postal_code_in_json_batch_is_rejected_by_index() {
    let service = service().await;
    let body = r#"[
        {"name": "Kaffeebar", "type": "CAFE", "campus": "ALTSTADT",
         "street": "Hauptstraße", "houseNumber": "1", "postalCode": 69117, "city": "Heidelberg"},
        {"name": "Automat", "type": "VENDING_MACHINE", "campus": "ALTSTADT",
         "street": "Hauptstraße", "houseNumber": "2", "postalCode": "69I17", "city": "Heidelberg"}
    ]"#;
    let inputs: Vec<PosInput> = serde_json::from_str(body).unwrap();

    let err = service.create_pos(inputs).await.unwrap_err();

    assert!(matches!(
        err,
        PosError::Validation {
            index: 1,
            source: ValidationError::InvalidFormat { ref field, .. }
        } if field == "postalCode"
    ));
    assert!(service.retrieve_pos().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_services_on_one_database_keep_last_writer() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let first = PosService::new(Arc::new(db.pos()));
    let second = PosService::new(Arc::new(db.pos()));
    let created = first.create_pos(vec![kaffeebar()]).await.unwrap();
    let id = created[0].id.clone();

    let mut handles = Vec::new();
    for n in 0..16 {
        let service = if n % 2 == 0 {
            first.clone()
        } else {
            second.clone()
        };
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            let mut fields = kaffeebar();
            fields.description = Some(format!("writer {}", n));
            service
                .update_pos(vec![PosUpdate::by_id(id, fields)])
                .await
                .unwrap()
                .remove(0)
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let mut stamps: Vec<_> = results.iter().map(|p| p.updated_at).collect();
    stamps.sort();
    stamps.dedup();
    assert_eq!(stamps.len(), results.len());
    assert!(stamps[0] > created[0].updated_at);

    let last = results.iter().max_by_key(|p| p.updated_at).unwrap();
    assert_eq!(&second.get_pos(&id).await.unwrap(), last);
    assert_eq!(&first.get_pos(&id).await.unwrap(), last);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_see_part_of_a_batch_or_clear() {
    const BATCH: usize = 3;

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let writer = PosService::new(Arc::new(db.pos()));
    let clearer = PosService::new(Arc::new(db.pos()));
    let reader = writer.clone();

    let mut writes = Vec::new();
    for round in 0..10 {
        let service = writer.clone();
        writes.push(tokio::spawn(async move {
            let batch = (0..BATCH)
                .map(|i| named(&format!("round {} #{}", round, i), "CAFE", "ALTSTADT"))
                .collect();
            service.create_pos(batch).await.unwrap();
        }));
        if round % 3 == 0 {
            let service = clearer.clone();
            writes.push(tokio::spawn(async move {
                service.clear().await.unwrap();
            }));
        }
    }

    let mut reads = Vec::new();
    for _ in 0..20 {
        let service = reader.clone();
        reads.push(tokio::spawn(async move { service.retrieve_pos().await.unwrap() }));
    }

    for handle in writes {
        handle.await.unwrap();
    }
    for handle in reads {
        let seen = handle.await.unwrap();
        assert_eq!(seen.len() % BATCH, 0);
        for batch in seen.chunks(BATCH) {
            let prefix = batch[0].name.split(" #").next().unwrap().to_string();
            assert!(batch
                .iter()
                .all(|p| p.name.starts_with(&prefix) && p.created_at == batch[0].created_at));
        }
    }

    let remaining = writer.retrieve_pos().await.unwrap();
    assert_eq!(remaining.len() % BATCH, 0);
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_storage_error() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let service = PosService::new(Arc::new(db.pos()));
    db.close().await;

    assert!(matches!(
        service.retrieve_pos().await,
        Err(PosError::Storage(_))
    ));
    assert!(matches!(
        service.create_pos(vec![kaffeebar()]).await,
        Err(PosError::Storage(_))
    ));
}
