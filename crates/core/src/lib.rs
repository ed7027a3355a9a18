//! Portal core: session state, credential storage and request decoration
//!
//! Nothing in this crate touches the network or browser globals. Storage,
//! page location and document metadata arrive through the traits in
//! [`store`] and [`location`], which the browser crate implements over
//! `localStorage`, `window.location` and `document`.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod headers;
pub mod location;
pub mod paths;
pub mod policy;
pub mod session;
pub mod settings;
pub mod store;

pub use claims::{UserClaims, decode_claims};
pub use credentials::{CredentialStore, TokenBundle, TokenEntry};
pub use error::{PortalError, PortalResult, TokenError};
pub use guard::{GuardDecision, SessionGuard};
pub use headers::RequestDecorator;
pub use location::{DocumentQuery, Location, StaticDocument, StaticLocation};
pub use paths::PathPolicy;
pub use policy::{ResponseAction, SessionExpiryPolicy};
pub use session::{Session, SessionBuilder};
pub use settings::PortalSettings;
pub use store::{KeyValueStore, MemoryStore};
