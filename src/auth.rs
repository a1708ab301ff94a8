use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::{Credentials, Session, SessionUser, User},
    services::pseudonym::PseudonymGenerator,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    /// Stable anonymous display name, derived from the user id at sign-in.
    pub name: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn new(user_id: &str, anonymous_name: &str, jwt_secret: &str) -> Result<(String, Self)> {
        let now = Utc::now();
        let exp = now + Duration::hours(24);
        let jti = Uuid::new_v4().to_string();

        let claims = Self {
            sub: user_id.to_string(),
            name: anonymous_name.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt_secret.as_ref()),
        )?;

        Ok((token, claims))
    }

    pub fn verify(token: &str, jwt_secret: &str) -> Result<Self> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(jwt_secret.as_ref()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

// Password hashing utilities
pub fn hash_password(password: &str) -> Result<String> {
    let cost = 12;
    bcrypt::hash(password, cost).map_err(AppError::from)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).map_err(AppError::from)
}

/// In-memory credential store. Real deployments would swap this for the
/// backend's user table; the board only ever needs the id out of it, as the
/// seed for the session's stable pseudonym.
pub struct CredentialStore {
    users: Vec<User>,
    pseudonyms: PseudonymGenerator,
    jwt_secret: String,
}

// bcrypt of "password123", same demo account the app has always shipped with
const DEMO_EMAIL: &str = "test@example.com";
const DEMO_PASSWORD_HASH: &str = "$2a$10$xpRE9/LDt2VQtZ1JSAz/2OsV06PpAEsW7PSvnGOWylEMZupfc96Li";

impl CredentialStore {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            users: Vec::new(),
            pseudonyms: PseudonymGenerator::default(),
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Store pre-seeded with the demo account.
    pub fn with_demo_user(jwt_secret: impl Into<String>) -> Self {
        let mut store = Self::new(jwt_secret);
        store.users.push(User {
            id: "1".to_string(),
            email: DEMO_EMAIL.to_string(),
            password_hash: DEMO_PASSWORD_HASH.to_string(),
        });
        store
    }

    pub fn register(&mut self, email: &str, password: &str) -> Result<&User> {
        if self.users.iter().any(|user| user.email == email) {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }
        let user = User {
            id: (self.users.len() + 1).to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        self.users.push(user);
        Ok(self.users.last().expect("just pushed"))
    }

    /// Credential sign-in. Unknown email and wrong password answer with the
    /// same message so the response cannot be used to enumerate accounts.
    pub fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;

        let rejection =
            || AppError::Authentication("Invalid email or password".to_string());

        let user = self
            .users
            .iter()
            .find(|user| user.email == credentials.email)
            .ok_or_else(rejection)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(rejection());
        }

        let anonymous_name = self.pseudonyms.stable(&user.id);
        let (token, claims) = Claims::new(&user.id, &anonymous_name, &self.jwt_secret)?;
        tracing::info!(user_id = %user.id, "sign-in successful");

        Ok(Session {
            token,
            user: SessionUser {
                user_id: user.id.clone(),
                anonymous_name,
            },
            expires_at: claims.exp,
        })
    }

    /// Re-derives the session identity from a bearer token.
    pub fn authenticate(&self, token: &str) -> Result<SessionUser> {
        let claims = Claims::verify(token, &self.jwt_secret)?;
        Ok(SessionUser {
            user_id: claims.sub,
            anonymous_name: claims.name,
        })
    }
}
