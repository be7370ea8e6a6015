use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::Utc;

use super::credentials::hash_password;
use super::domain::{bearer_token, Role, SessionToken};
use super::resolver::IdentityResolver;
use super::service::AuthService;
use crate::infra::{MemorySessions, MemoryStore};
use crate::portal::directory::domain::{CandidateId, ClinicId, User, UserId};
use crate::portal::error::PortalError;
use crate::portal::store::{SessionStore, Store};

fn user(email: &str, password: &str, role: Role) -> User {
    User {
        id: UserId::new(),
        email: email.to_string(),
        password_hash: hash_password(password).expect("hashing succeeds"),
        role,
        active: true,
        clinic: match role {
            Role::Client => Some(ClinicId::new()),
            _ => None,
        },
        candidate: match role {
            Role::Candidate => Some(CandidateId::new()),
            _ => None,
        },
        created_at: Utc::now(),
    }
}

fn harness() -> (Arc<MemoryStore>, Arc<MemorySessions>) {
    (
        Arc::new(MemoryStore::default()),
        Arc::new(MemorySessions::default()),
    )
}

#[test]
fn resolve_without_token_is_anonymous() {
    let (store, sessions) = harness();
    let resolver = IdentityResolver::new(store, sessions);
    assert_eq!(resolver.resolve(None).expect("resolves"), None);
}

#[test]
fn resolve_with_unknown_token_is_anonymous() {
    let (store, sessions) = harness();
    let resolver = IdentityResolver::new(store, sessions);
    let stray = SessionToken::issue();
    assert_eq!(resolver.resolve(Some(&stray)).expect("resolves"), None);
}

#[test]
fn resolve_returns_the_role_and_relation() {
    let (store, sessions) = harness();
    let client = user("client@clinic.local", "pw-client", Role::Client);
    store.insert_user(client.clone()).expect("insert");
    let token = sessions.open(client.id).expect("session opens");

    let resolver = IdentityResolver::new(store, sessions);
    let identity = resolver
        .resolve(Some(&token))
        .expect("resolves")
        .expect("identity present");
    assert_eq!(identity.user, client.id);
    assert_eq!(identity.role, Role::Client);
    assert_eq!(identity.clinic, client.clinic);
    assert_eq!(identity.candidate, None);
}

#[test]
fn deactivated_user_resolves_to_anonymous_and_kills_the_session() {
    let (store, sessions) = harness();
    let mut owner = user("owner@portal.local", "pw-owner", Role::Owner);
    store.insert_user(owner.clone()).expect("insert");
    let token = sessions.open(owner.id).expect("session opens");

    owner.active = false;
    store.update_user(owner.clone()).expect("deactivation stored");

    let resolver = IdentityResolver::new(store, sessions.clone());
    assert_eq!(resolver.resolve(Some(&token)).expect("resolves"), None);
    // The same cookie stays anonymous afterwards: the session is gone.
    assert_eq!(sessions.user_for(&token).expect("lookup"), None);
    assert_eq!(resolver.resolve(Some(&token)).expect("resolves"), None);
}

#[test]
fn login_round_trips_a_usable_session() {
    let (store, sessions) = harness();
    let owner = user("owner@portal.local", "pw-owner", Role::Owner);
    store.insert_user(owner.clone()).expect("insert");

    let auth = AuthService::new(store.clone(), sessions.clone());
    let session = auth
        .login("owner@portal.local", "pw-owner")
        .expect("login succeeds");
    assert_eq!(session.role, Role::Owner);

    let resolver = IdentityResolver::new(store, sessions);
    let identity = resolver
        .resolve(Some(&session.token))
        .expect("resolves")
        .expect("identity present");
    assert_eq!(identity.user, owner.id);
}

#[test]
fn bad_email_bad_password_and_inactive_user_are_indistinguishable() {
    let (store, sessions) = harness();
    let mut candidate = user("candidate@portal.local", "pw-candidate", Role::Candidate);
    store.insert_user(candidate.clone()).expect("insert");

    let auth = AuthService::new(store.clone(), sessions.clone());
    assert!(matches!(
        auth.login("nobody@portal.local", "pw-candidate"),
        Err(PortalError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login("candidate@portal.local", "wrong"),
        Err(PortalError::InvalidCredentials)
    ));

    candidate.active = false;
    store.update_user(candidate).expect("deactivation stored");
    assert!(matches!(
        auth.login("candidate@portal.local", "pw-candidate"),
        Err(PortalError::InvalidCredentials)
    ));
}

#[test]
fn logout_invalidates_the_session() {
    let (store, sessions) = harness();
    let owner = user("owner@portal.local", "pw-owner", Role::Owner);
    store.insert_user(owner).expect("insert");

    let auth = AuthService::new(store.clone(), sessions.clone());
    let session = auth
        .login("owner@portal.local", "pw-owner")
        .expect("login succeeds");
    auth.logout(&session.token).expect("logout succeeds");

    let resolver = IdentityResolver::new(store, sessions);
    assert_eq!(
        resolver.resolve(Some(&session.token)).expect("resolves"),
        None
    );
}

#[test]
fn bearer_token_parses_only_well_formed_headers() {
    let token = SessionToken::issue();
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("header value"),
    );
    assert_eq!(bearer_token(&headers), Some(token));

    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer not-a-token"),
    );
    assert_eq!(bearer_token(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
    assert_eq!(bearer_token(&headers), None);
}
