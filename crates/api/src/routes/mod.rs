//! Route definitions.
//!
//! The three ACARS namespaces encode the same protocol with different
//! field names, session mechanisms, and response envelopes:
//!
//! ```text
//! /api/smartcars    official smartCARS 3 family (signed tokens)
//! /api/phpvms       phpVMS-compatible family (opaque API keys)
//! /api/acars        legacy bridge family (nested-data envelopes, bulk ingest)
//! /health           service health
//! ```
//!
//! Every path is also registered with a trailing slash; the smartCARS
//! client is inconsistent about which it sends.

pub mod bridge;
pub mod health;
pub mod phpvms;
pub mod smartcars;
