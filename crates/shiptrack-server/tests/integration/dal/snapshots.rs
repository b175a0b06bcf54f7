/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{unique, TestFixture};
use chrono::Utc;
use serial_test::serial;
use shiptrack_models::models::event_counts::NewEventCount;
use shiptrack_models::models::git_repository_locations::NewGitRepositoryLocation;
use shiptrack_models::models::released_tickets::NewReleasedTicket;
use shiptrack_models::models::repo_ownerships::NewRepoOwnership;
use shiptrack_models::models::tickets::NewTicket;

#[test]
#[serial]
fn test_repo_ownership_upsert_replaces() {
    let fixture = TestFixture::new();
    let app = unique("app");
    let ownerships = fixture.dal.repo_ownerships();

    ownerships
        .upsert(&NewRepoOwnership::new(app.clone(), vec!["a@example.com".into()], vec![]).unwrap())
        .unwrap();
    let updated = ownerships
        .upsert(
            &NewRepoOwnership::new(
                app.clone(),
                vec!["b@example.com, c@example.com".into()],
                vec!["lead@example.com".into()],
            )
            .unwrap(),
        )
        .unwrap();

    assert_eq!(updated.owner_emails(), vec!["b@example.com", "c@example.com"]);
    let stored = ownerships.get(&app).unwrap().unwrap();
    assert_eq!(stored.id, updated.id);
    assert_eq!(stored.repo_approvers, vec![Some("lead@example.com".to_string())]);
    assert!(ownerships.get(&unique("missing")).unwrap().is_none());
}

#[test]
#[serial]
fn test_version_approval_requires_approved_ticket() {
    let fixture = TestFixture::new();
    let version = unique("v");
    let tickets = fixture.dal.tickets();

    let key = unique("TICKET");
    let open = NewTicket::new(
        key.clone(),
        "Ship it".into(),
        String::new(),
        "in progress".into(),
        None,
        vec![version.clone()],
        Utc::now(),
    )
    .unwrap();
    tickets.upsert(&open).unwrap();
    assert!(!tickets.is_version_approved(&version).unwrap());

    let approved = NewTicket {
        approved_at: Some(Utc::now()),
        status: "done".into(),
        ..open
    };
    tickets.upsert(&approved).unwrap();
    assert!(tickets.is_version_approved(&version).unwrap());
    assert!(tickets.get(&key).unwrap().unwrap().is_approved());
}

#[test]
#[serial]
fn test_ticket_full_text_search() {
    let fixture = TestFixture::new();
    let tickets = fixture.dal.tickets();

    let matching = NewTicket::new(
        unique("TICKET"),
        "Fix payment reconciliation".into(),
        "Invoices double counted".into(),
        "done".into(),
        None,
        vec![],
        Utc::now(),
    )
    .unwrap();
    let other = NewTicket::new(
        unique("TICKET"),
        "Update logo".into(),
        "New brand colours".into(),
        "done".into(),
        None,
        vec![],
        Utc::now(),
    )
    .unwrap();
    tickets.upsert(&matching).unwrap();
    tickets.upsert(&other).unwrap();

    let results = tickets.search("invoice", 10).unwrap();
    assert!(results.iter().any(|t| t.key == matching.key));
    assert!(results.iter().all(|t| t.key != other.key));
}

#[test]
#[serial]
fn test_released_ticket_search() {
    let fixture = TestFixture::new();
    let released = NewReleasedTicket::new(
        unique("REL"),
        "Faster checkout".into(),
        "Caches basket totals".into(),
        vec!["v2".into()],
        vec![serde_json::json!({"app_name": "shop", "version": "v2"})],
        Some(Utc::now()),
    )
    .unwrap();
    let stored = fixture.dal.released_tickets().upsert(&released).unwrap();
    assert_eq!(stored.deploys().len(), 1);

    let results = fixture.dal.released_tickets().search("checkout", 5).unwrap();
    assert!(results.iter().any(|t| t.key == released.key));
}

#[test]
#[serial]
fn test_git_repository_locations_and_event_counts() {
    let fixture = TestFixture::new();
    let name = unique("repo");

    let location = NewGitRepositoryLocation::new(
        Some(name.clone()),
        format!("git@github.com:example/{}.git", name),
        None,
    )
    .unwrap();
    fixture.dal.git_repository_locations().upsert(&location).unwrap();
    let moved = NewGitRepositoryLocation {
        remote_head: Some("abc123".into()),
        ..location
    };
    let stored = fixture.dal.git_repository_locations().upsert(&moved).unwrap();
    assert_eq!(stored.remote_head.as_deref(), Some("abc123"));
    assert!(fixture
        .dal
        .git_repository_locations()
        .get(&name)
        .unwrap()
        .is_some());

    let snapshot = unique("tickets");
    let counts = fixture.dal.event_counts();
    counts.set(&NewEventCount::new(snapshot.clone(), 10).unwrap()).unwrap();
    counts.set(&NewEventCount::new(snapshot.clone(), 42).unwrap()).unwrap();
    assert_eq!(counts.get(&snapshot).unwrap().unwrap().event_id, 42);
}
