//! Integration tests for session token minting and validation.
//!
//! Tokens are minted locally with a test secret and checked through
//! `validate_token`; no server or database is needed.
//!
//! Run with: `cargo test --test auth_test`
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use luxueux_backend::auth::jwt::{Claims, mint_token, validate_token};
use luxueux_backend::auth::session::login_is_fresh;

/// A fake secret for testing, never the deployed one.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

const DAY: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

#[test]
fn test_minted_token_round_trips_its_claims() {
    let session_id = Uuid::new_v4();
    let now = Utc::now();
    let token = mint_token("admin", session_id, now, now + Duration::hours(24), TEST_SECRET)
        .expect("Token should be signed");

    let claims = validate_token(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.sub, "admin");
    assert_eq!(claims.jti, session_id);
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    assert_eq!(
        claims.issued_at().map(|t| t.timestamp()),
        Some(now.timestamp())
    );
}

#[test]
fn test_expired_token_is_rejected() {
    let now = Utc::now();
    let token = mint_token(
        "admin",
        Uuid::new_v4(),
        now - Duration::hours(25),
        now - Duration::hours(1),
        TEST_SECRET,
    )
    .unwrap();

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let now = Utc::now();
    let token = mint_token(
        "admin",
        Uuid::new_v4(),
        now,
        now + Duration::hours(1),
        TEST_SECRET,
    )
    .unwrap();

    let result = validate_token(&token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    let result = validate_token("not.a.valid.jwt", TEST_SECRET);
    assert!(result.is_err());
}

#[test]
fn test_token_without_login_time_is_rejected() {
    #[derive(serde::Serialize)]
    struct NoIat {
        sub: String,
        jti: Uuid,
        exp: usize,
    }

    let token = encode(
        &Header::new(Algorithm::HS256),
        &NoIat {
            sub: "admin".into(),
            jti: Uuid::new_v4(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(validate_token(&token, TEST_SECRET).is_err());
}

#[test]
fn test_stale_login_time_fails_the_gate_even_with_valid_signature() {
    // A token whose exp was stretched past the session lifetime.
    let now = Utc::now();
    let claims = Claims {
        sub: "admin".into(),
        jti: Uuid::new_v4(),
        iat: (now - Duration::hours(30)).timestamp() as usize,
        exp: (now + Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let claims = validate_token(&token, TEST_SECRET).expect("Signature is valid");
    assert!(!login_is_fresh(claims.issued_at(), now, DAY));
}

#[test]
fn test_login_gate_admits_recent_and_denies_absent_or_old() {
    let now = Utc::now();
    assert!(login_is_fresh(Some(now - Duration::minutes(5)), now, DAY));
    assert!(!login_is_fresh(None, now, DAY));
    assert!(!login_is_fresh(Some(now - Duration::hours(24)), now, DAY));
    assert!(!login_is_fresh(Some(now - Duration::days(3)), now, DAY));
}
