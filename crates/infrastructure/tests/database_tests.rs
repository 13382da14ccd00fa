//! Repository tests against an in-memory SQLite database with the real migrations.

use chrono::{NaiveDate, TimeZone, Utc};
use domain::DomainError;
use domain::credentials;
use domain::entry::{MediaType, WorkEntry, WorkEntryMedia, WorkEntryRepository};
use domain::reference::{City, Location, ReferenceKind, ReferenceRepository, Ward, Zone};
use domain::user::{Role, UserProfile, UserRepository};
use infrastructure::database;
use infrastructure::{SeaOrmReferenceRepository, SeaOrmUserRepository, SeaOrmWorkEntryRepository};
use sea_orm::DatabaseConnection;

async fn setup_db() -> DatabaseConnection {
    database::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database")
}

async fn seed_reference(repo: &SeaOrmReferenceRepository) {
    for (id, name) in [("c1", "Pune"), ("c2", "Nagpur")] {
        repo.insert_city(&City {
            id: id.into(),
            name: name.into(),
        })
        .await
        .unwrap();
    }
    for (id, city) in [("z1", "c1"), ("z2", "c1"), ("z3", "c2")] {
        repo.insert_zone(&Zone {
            id: id.into(),
            name: format!("Zone {id}"),
            city_id: city.into(),
        })
        .await
        .unwrap();
    }
    for (id, zone) in [("w1", "z1"), ("w2", "z2"), ("w3", "z3")] {
        repo.insert_ward(&Ward {
            id: id.into(),
            name: format!("Ward {id}"),
            zone_id: zone.into(),
        })
        .await
        .unwrap();
    }
    for (id, ward) in [("l1", "w1"), ("l2", "w2"), ("l3", "w3")] {
        repo.insert_location(&Location {
            id: id.into(),
            name: format!("Location {id}"),
            ward_id: ward.into(),
        })
        .await
        .unwrap();
    }
}

fn profile(id: &str, email: &str, name: &str, role: Role, city: Option<&str>) -> UserProfile {
    UserProfile {
        id: id.into(),
        email: email.into(),
        full_name: name.into(),
        role,
        city_id: city.map(String::from),
        temp_password: None,
        created_at: Utc::now(),
    }
}

fn entry(id: &str, city: &str, day: u32) -> WorkEntry {
    WorkEntry {
        id: id.into(),
        city_id: city.into(),
        zone_id: "z1".into(),
        ward_id: "w1".into(),
        location_id: "l1".into(),
        work_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
        supervisor_id: "sup".into(),
        engineer_id: None,
        shmr: 100.0,
        chmr: 104.5,
        hours: 4.5,
        landmark: Some("Near the bridge".into()),
        remarks: None,
        created_by: "emp".into(),
        created_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn reference_lists_are_sorted_by_name() {
    let db = setup_db().await;
    let repo = SeaOrmReferenceRepository::new(db);
    seed_reference(&repo).await;

    let cities = repo.list_cities().await.unwrap();
    let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Nagpur", "Pune"]);

    let zone = repo.find_zone("z3").await.unwrap().unwrap();
    assert_eq!(zone.city_id, "c2");
    assert!(repo.find_location("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_city_removes_its_subtree_only() {
    let db = setup_db().await;
    let repo = SeaOrmReferenceRepository::new(db);
    seed_reference(&repo).await;

    assert!(repo.delete(ReferenceKind::City, "c1").await.unwrap());

    assert_eq!(repo.list_cities().await.unwrap().len(), 1);
    let zones = repo.list_zones().await.unwrap();
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].id, "z3");
    let wards = repo.list_wards().await.unwrap();
    assert_eq!(wards.len(), 1);
    let locations = repo.list_locations().await.unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].id, "l3");

    assert!(!repo.delete(ReferenceKind::City, "c1").await.unwrap());
}

#[tokio::test]
async fn deleting_a_ward_keeps_siblings() {
    let db = setup_db().await;
    let repo = SeaOrmReferenceRepository::new(db);
    seed_reference(&repo).await;

    assert!(repo.delete(ReferenceKind::Ward, "w1").await.unwrap());

    assert!(repo.find_location("l1").await.unwrap().is_none());
    assert!(repo.find_location("l2").await.unwrap().is_some());
    assert!(repo.find_zone("z1").await.unwrap().is_some());
}

#[tokio::test]
async fn user_lookup_and_temp_password() {
    let db = setup_db().await;
    let repo = SeaOrmUserRepository::new(db);
    repo.insert(&profile(
        "u1",
        "Sup001@FieldOps.local",
        "Zed",
        Role::Supervisor,
        Some("c1"),
    ))
    .await
    .unwrap();
    repo.insert(&profile(
        "u2",
        "sup002@fieldops.local",
        "Amit",
        Role::Supervisor,
        Some("c1"),
    ))
    .await
    .unwrap();
    repo.insert(&profile(
        "u3",
        "emp001@fieldops.local",
        "Bina",
        Role::Employee,
        Some("c1"),
    ))
    .await
    .unwrap();

    let found = repo.find_by_email("SUP001@fieldops.local").await.unwrap().unwrap();
    assert_eq!(found.id, "u1");
    assert_eq!(found.role, Role::Supervisor);

    let supervisors = repo
        .list_by_role(Role::Supervisor, Some("c1".into()))
        .await
        .unwrap();
    let names: Vec<&str> = supervisors.iter().map(|u| u.full_name.as_str()).collect();
    assert_eq!(names, vec!["Amit", "Zed"]);
    assert!(repo
        .list_by_role(Role::Supervisor, Some("c2".into()))
        .await
        .unwrap()
        .is_empty());

    let mut emails = repo
        .emails_with_prefix("sup", "fieldops.local")
        .await
        .unwrap();
    emails.sort();
    assert_eq!(emails, vec!["sup001@fieldops.local", "sup002@fieldops.local"]);
    assert!(repo
        .emails_with_prefix("eng", "fieldops.local")
        .await
        .unwrap()
        .is_empty());

    repo.set_temp_password("u3", "Ab3#xY9z").await.unwrap();
    assert_eq!(
        repo.find_by_id("u3").await.unwrap().unwrap().temp_password.as_deref(),
        Some("Ab3#xY9z")
    );
    assert_eq!(
        repo.set_temp_password("ghost", "x").await.unwrap_err(),
        DomainError::NotFound("User not found".into())
    );

    assert!(repo.delete("u3").await.unwrap());
    assert!(!repo.delete("u3").await.unwrap());
}

#[tokio::test]
async fn next_login_id_from_stored_emails() {
    let repo = SeaOrmUserRepository::new(setup_db().await);
    for (id, email) in [
        ("u1", "sup999@fieldops.local"),
        ("u2", "sup1000@fieldops.local"),
        ("u3", "support@fieldops.local"),
    ] {
        repo.insert(&profile(id, email, id, Role::Supervisor, Some("c1")))
            .await
            .unwrap();
    }

    let emails = repo
        .emails_with_prefix("sup", "fieldops.local")
        .await
        .unwrap();
    let next = credentials::next_login_id(
        "SUP",
        "fieldops.local",
        emails.iter().map(String::as_str),
    );

    assert_eq!(next, "SUP1001");
    assert!(repo
        .find_by_email(&credentials::login_email(&next, "fieldops.local"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let db = setup_db().await;
    let repo = SeaOrmUserRepository::new(db);
    repo.insert(&profile("u1", "a@x.io", "A", Role::Employee, None))
        .await
        .unwrap();

    let err = repo
        .insert(&profile("u2", "A@x.io", "B", Role::Employee, None))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn entries_list_newest_first_and_filter_by_city() {
    let db = setup_db().await;
    let repo = SeaOrmWorkEntryRepository::new(db);
    repo.insert(&entry("e1", "c1", 1)).await.unwrap();
    repo.insert(&entry("e2", "c1", 5)).await.unwrap();
    repo.insert(&entry("e3", "c2", 3)).await.unwrap();

    let all = repo.list(None).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e2", "e3", "e1"]);

    let c1 = repo.list(Some("c1".into())).await.unwrap();
    assert_eq!(c1.len(), 2);
    assert!(c1.iter().all(|e| e.city_id == "c1"));

    let stored = repo.find_by_id("e1").await.unwrap().unwrap();
    assert_eq!(stored, entry("e1", "c1", 1));
}

#[tokio::test]
async fn media_is_ordered_and_removed_with_its_entry() {
    let db = setup_db().await;
    let repo = SeaOrmWorkEntryRepository::new(db);
    repo.insert(&entry("e1", "c1", 1)).await.unwrap();

    let media = vec![
        WorkEntryMedia {
            id: "m2".into(),
            work_entry_id: "e1".into(),
            media_type: MediaType::Video,
            url: "https://cdn/v.mp4".into(),
            display_order: 1,
        },
        WorkEntryMedia {
            id: "m1".into(),
            work_entry_id: "e1".into(),
            media_type: MediaType::Photo,
            url: "https://cdn/p.jpg".into(),
            display_order: 0,
        },
    ];
    repo.insert_media(&media).await.unwrap();

    let stored = repo.media_for("e1").await.unwrap();
    assert_eq!(stored[0].id, "m1");
    assert_eq!(stored[0].media_type, MediaType::Photo);
    assert_eq!(stored[1].media_type, MediaType::Video);

    assert!(repo.delete("e1").await.unwrap());
    assert!(repo.media_for("e1").await.unwrap().is_empty());
    assert!(repo.find_by_id("e1").await.unwrap().is_none());
}

#[tokio::test]
async fn media_without_parent_is_rejected() {
    let db = setup_db().await;
    let repo = SeaOrmWorkEntryRepository::new(db);

    let err = repo
        .insert_media(&[WorkEntryMedia {
            id: "m1".into(),
            work_entry_id: "missing".into(),
            media_type: MediaType::Photo,
            url: "https://cdn/p.jpg".into(),
            display_order: 0,
        }])
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 404);
}
