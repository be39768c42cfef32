//! Database utilities for connections and schema migrations.
//!
//! - [`connection::connect_sqlite`] applies a 5000ms busy_timeout, WAL and foreign_keys=ON.
//! - [`migrate::run_sqlite`] applies the embedded diesel migrations.
//!
//! Example:
//! ```no_run
//! use clinic_store::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("clinic_example.db");
//! migrate::run_sqlite(db_path.to_str().unwrap()).expect("migrations");
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;
