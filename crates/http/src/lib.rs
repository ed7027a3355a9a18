//! Portal HTTP gateway
//!
//! Wraps `reqwest` so every API call carries the CSRF and bearer headers
//! and an expired session sends the user back to the login page. Typed
//! methods cover the auth and user administration endpoints.

pub mod client;
pub mod types;

pub use client::{ClientError, GatewayBuilder, RequestGateway, RequestOptions};
pub use types::{
    AuthResponse, CreateUserRequest, PageLimit, Paginated, UpdateUserRequest, User, UserQuery,
};
