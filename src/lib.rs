//! Write-once custody for interview PDFs: one immutable document per
//! (interview, coder) slot, content hashed on admission and served back
//! through short-lived signed links.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod services;
