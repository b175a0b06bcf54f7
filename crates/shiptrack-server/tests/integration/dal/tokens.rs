/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::TestFixture;
use serial_test::serial;
use shiptrack_models::models::api_tokens::SOURCE_DEPLOY;

#[test]
#[serial]
fn test_token_lifecycle() {
    let fixture = TestFixture::new();
    let (token, key) = fixture.create_token(SOURCE_DEPLOY);
    let tokens = fixture.dal.api_tokens();

    assert!(fixture.pak.verify(&key, &token.pak_hash));
    assert!(tokens.list().unwrap().iter().any(|t| t.id == token.id));

    let (new_key, new_hash) = fixture.pak.generate().unwrap();
    let rotated = tokens.update_pak_hash(token.id, new_hash).unwrap();
    assert!(fixture.pak.verify(&new_key, &rotated.pak_hash));
    assert!(!fixture.pak.verify(&key, &rotated.pak_hash));

    assert_eq!(tokens.soft_delete(token.id).unwrap(), 1);
    assert_eq!(tokens.soft_delete(token.id).unwrap(), 0);
    assert!(tokens.get(token.id).unwrap().is_none());
    assert!(tokens.list().unwrap().iter().all(|t| t.id != token.id));
}

#[test]
#[serial]
fn test_admin_hash_is_replaced() {
    let fixture = TestFixture::new();
    let admin = fixture.dal.admin();

    let current = admin.pak_hash().unwrap().unwrap();
    assert!(fixture.pak.verify(&fixture.admin_pak, &current));

    let (key, hash) = fixture.pak.generate().unwrap();
    admin.set_pak_hash(&hash).unwrap();
    assert_eq!(admin.pak_hash().unwrap().as_deref(), Some(hash.as_str()));
    assert!(fixture.pak.verify(&key, &hash));
}
