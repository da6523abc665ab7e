pub mod credentials;
pub mod jwt;
pub mod secret;
pub mod signin;
pub mod token_issuer;
pub mod validator;

pub use credentials::CredentialRequest;
pub use jwt::{Hs256Signer, SignError, TokenSigner};
pub use secret::{EnvSecret, SecretSource, StaticSecret};
pub use signin::{IssuanceLogPolicy, SigninService};
pub use token_issuer::{SignedToken, SigninClaims, TokenIssuer};
pub use validator::{CredentialCheck, CredentialValidator};
