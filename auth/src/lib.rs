//! Credential primitives shared by the identity service.
//!
//! - Password hashing (Argon2id)
//! - Session token signing and verification (HS256 JWT)
//! - An [`Authenticator`] tying both to a configured token lifetime
//!
//! Nothing here knows about accounts or providers; the service adapts these
//! primitives to its own domain.
//!
//! # Examples
//!
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//!
//! let hash = auth.hash_password("Passw0rd!").unwrap();
//! let result = auth.authenticate("Passw0rd!", &hash, "account-1").unwrap();
//!
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("account-1"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
