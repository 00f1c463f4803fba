//! Signed session cookies
//!
//! A session is an HS256 JWT carried in an HTTP-only cookie, minted when a
//! magic link is redeemed. There is no server-side session store.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::models::User;

/// Session cookie name
pub const SESSION_COOKIE: &str = "session";

const SESSION_TTL_DAYS: i64 = 7;

/// JWT claims for a logged-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(rename = "isOrganizer")]
    pub is_organizer: bool,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionService {
    secret: String,
}

impl SessionService {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Create a session token for a user
    pub fn sign(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = SessionClaims {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            is_organizer: user.is_organizer,
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::days(SESSION_TTL_DAYS)).timestamp() as usize,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Verify a session token; tampered or expired tokens yield `None`
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        jsonwebtoken::decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .ok()
    }
}

/// Build the Set-Cookie value establishing a session
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_TTL_DAYS * 24 * 60 * 60
    )
}

/// Build the Set-Cookie value clearing the session
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the session token out of a Cookie request header
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(is_organizer: bool) -> User {
        User {
            id: 7,
            email: "guest@example.com".into(),
            name: "Guest".into(),
            is_organizer,
            email_sent: true,
            wechat_id: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let svc = SessionService::new("test-secret");
        let token = svc.sign(&test_user(true)).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "guest@example.com");
        assert!(claims.is_organizer);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = SessionService::new("test-secret");
        let token = svc.sign(&test_user(false)).unwrap();
        let other = SessionService::new("other-secret");
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = SessionService::new("test-secret");
        let mut token = svc.sign(&test_user(false)).unwrap();
        token.push('x');
        assert!(svc.verify(&token).is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = SessionService::new("test-secret");
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            id: 1,
            email: "a@b.c".into(),
            name: "A".into(),
            is_organizer: false,
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(svc.verify(&token).is_none());
    }

    #[test]
    fn test_cookie_header_parsing() {
        assert_eq!(token_from_cookie_header("session=abc123"), Some("abc123"));
        assert_eq!(
            token_from_cookie_header("theme=dark; session=abc123; lang=en"),
            Some("abc123")
        );
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        // A cookie named "sessionid" must not match
        assert_eq!(token_from_cookie_header("sessionid=abc123"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=604800"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
