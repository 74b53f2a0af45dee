//! Skattekort lookup server.
//!
//! A thin relay: validate the query, exchange the operator's session token
//! for a delegated upstream token, issue one upstream call, normalize the
//! response, render it as JSON.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
