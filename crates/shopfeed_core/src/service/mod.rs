//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate loader output, repository upserts and the view rebuild
//!   into one transactional pipeline run.
//! - Keep CLI/reporting layers decoupled from storage details.

pub mod ingest_service;
