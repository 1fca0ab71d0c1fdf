//! Actix middleware applied to every route.
//!
//! Authentication is not middleware here: the `AuthenticatedUser` and
//! `AdminUser` extractors guard individual handlers.

pub mod trace;

pub use trace::Trace;
