/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{at, unique, TestFixture};
use serial_test::serial;
use std::collections::HashMap;

#[test]
#[serial]
fn test_latest_per_app_picks_newest_per_app() {
    let fixture = TestFixture::new();
    let server = unique("server");
    let other_server = unique("server");

    fixture.insert_deploy("api", &server, Some("v1"), at(0));
    let api_v2 = fixture.insert_deploy("api", &server, Some("v2"), at(10));
    let web = fixture.insert_deploy("web", &server, Some("w1"), at(5));
    fixture.insert_deploy("api", &other_server, Some("v9"), at(20));

    let latest = fixture
        .dal
        .deploys()
        .latest_per_app(&server, at(60))
        .expect("Failed to load latest deploys");

    assert_eq!(latest, vec![api_v2, web]);
}

#[test]
#[serial]
fn test_latest_per_app_breaks_ties_by_id() {
    let fixture = TestFixture::new();
    let server = unique("server");

    fixture.insert_deploy("api", &server, Some("first"), at(10));
    let second = fixture.insert_deploy("api", &server, Some("second"), at(10));

    let latest = fixture
        .dal
        .deploys()
        .latest_per_app(&server, at(10))
        .unwrap();

    assert_eq!(latest, vec![second]);
}

#[test]
#[serial]
fn test_latest_per_app_respects_cutoff() {
    let fixture = TestFixture::new();
    let server = unique("server");

    let old = fixture.insert_deploy("api", &server, Some("v1"), at(0));
    fixture.insert_deploy("api", &server, Some("v2"), at(30));

    let latest = fixture
        .dal
        .deploys()
        .latest_per_app(&server, at(29))
        .unwrap();
    assert_eq!(latest, vec![old]);

    let before_everything = fixture
        .dal
        .deploys()
        .latest_per_app(&server, at(-1))
        .unwrap();
    assert!(before_everything.is_empty());
}

#[test]
#[serial]
fn test_reconcile_annotates_against_mapping() {
    let fixture = TestFixture::new();
    let server = unique("server");

    fixture.insert_deploy("api", &server, Some("v2"), at(0));
    fixture.insert_deploy("web", &server, Some("w1"), at(0));
    fixture.insert_deploy("worker", &server, Some("k1"), at(0));

    let expected = HashMap::from([
        ("api".to_string(), "v2".to_string()),
        ("web".to_string(), "w2".to_string()),
    ]);
    let statuses = fixture
        .dal
        .deploys()
        .reconcile(&server, Some(&expected), Some(at(5)))
        .unwrap();

    let correct: Vec<_> = statuses
        .iter()
        .map(|s| (s.deploy.app_name.as_str(), s.correct))
        .collect();
    assert_eq!(
        correct,
        vec![("api", Some(true)), ("web", Some(false)), ("worker", None)]
    );

    let unannotated = fixture
        .dal
        .deploys()
        .reconcile(&server, None, Some(at(5)))
        .unwrap();
    assert!(unannotated.iter().all(|s| s.correct.is_none()));
}

#[test]
#[serial]
fn test_previous_and_first_deployed_at() {
    let fixture = TestFixture::new();
    let server = unique("server");

    fixture.insert_deploy("api", &server, Some("v1"), at(0));
    let v2 = fixture.insert_deploy("api", &server, Some("v2"), at(10));
    let rollback = fixture.insert_deploy("api", &server, Some("v1"), at(20));

    let deploys = fixture.dal.deploys();
    assert_eq!(deploys.previous_for(&rollback).unwrap(), Some(v2.clone()));
    assert_eq!(deploys.first_deployed_at("v1", &rollback).unwrap(), Some(at(0)));
    assert_eq!(deploys.first_deployed_at("v2", &rollback).unwrap(), Some(at(10)));
    assert_eq!(deploys.first_deployed_at("v3", &rollback).unwrap(), None);
    assert_eq!(deploys.first_deployed_at("v2", &v2).unwrap(), None);
}
