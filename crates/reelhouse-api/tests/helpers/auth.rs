use reelhouse_api::auth::JwtService;
use uuid::Uuid;

/// Secret the test app is configured with.
pub const TEST_JWT_SECRET: &str = "reelhouse-test-secret-at-least-32-characters";

/// A valid one-hour access token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    JwtService::new(TEST_JWT_SECRET, "reelhouse-access")
        .issue_token(user_id, chrono::Duration::hours(1))
        .expect("Failed to issue test token")
}

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", token_for(user_id))
}
