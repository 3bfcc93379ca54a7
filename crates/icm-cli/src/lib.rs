//! # icm-cli
//!
//! The `icm` command-line interface.
//!
//! ## Subcommands
//!
//! - `icm serve`: run the HTTP API.
//! - `icm gap`: gap analysis for one organization, from Postgres or an
//!   evidence fixture.
//! - `icm matrix`, `icm overlap`, `icm xref`: browse the cross-reference graph.
//! - `icm catalog`: print the seed catalog.
//! - `icm seed`: write the seed catalog into Postgres.
//!
//! Configuration comes from the same environment variables as the server
//! (`DATABASE_URL`, `ICM_PORT`, `ICM_CLAUSE_ORDER`, `ICM_LOG_FORMAT`, ...).
//! Without `DATABASE_URL`, commands run against the in-memory seed catalog.

pub mod browse;
pub mod fixture;
pub mod gap;
pub mod server;
pub mod source;
