pub mod claims;
pub mod errors;
pub mod signer;

pub use claims::AccessClaims;
pub use claims::RawToken;
pub use errors::TokenError;
pub use signer::generate_secret;
pub use signer::TokenSigner;
