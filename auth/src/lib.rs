//! Authentication primitives library
//!
//! Provides the reusable pieces of the credential gate:
//! - Password hashing (Argon2id)
//! - Access-token issuance and verification (JWT, HS256)
//! - Role model and the pure authorization decision
//!
//! The service crate composes these with its own stores; nothing in here
//! touches persistence or HTTP.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{RawToken, Role, TokenSigner};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let signer = TokenSigner::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//! let token = signer.issue("alice", Uuid::new_v4(), Role::User).unwrap();
//! let claims = signer.verify(&RawToken::new(token)).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```
//!
//! ## Authorization
//! ```
//! use auth::{Capability, Role};
//!
//! let admin_only = Capability::role(Role::Admin);
//! assert!(!admin_only.permits(Role::User));
//! ```

pub mod access;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use access::Capability;
pub use access::Role;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::generate_secret;
pub use token::AccessClaims;
pub use token::RawToken;
pub use token::TokenError;
pub use token::TokenSigner;
