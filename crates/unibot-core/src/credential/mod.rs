//! Session credential domain.

mod model;
mod store;

pub use model::{
    ACCESS_TOKEN_KEY, CredentialBundle, REFRESH_TOKEN_KEY, SessionCredential, USER_KEY,
    UserProfile,
};
pub use store::{CredentialStore, MemoryCredentialStore};
