//! Application services.
//!
//! Logic that spans the API client and session state but does not belong to
//! a single route handler.

pub mod checkout;
