//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireStudent`], [`rbac::RequireGuide`], [`rbac::RequireHod`],
//!   [`rbac::RequireAdmin`] -- Require one specific role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
