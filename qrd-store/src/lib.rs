//! SQLite table store backing `remote://` map layers.
//!
//! The dashboard treats its analytical store as an opaque row source reached
//! by table name. This crate is that source: a `rusqlite` connection whose
//! tables hold one row per site, with `Longitude`/`Latitude` columns and any
//! number of metadata columns.
//!
//! # Usage
//!
//! ```rust
//! use qrd_store::Store;
//!
//! let store = Store::open_in_memory().unwrap();
//! store
//!     .execute_batch(
//!         "CREATE TABLE hubs (name TEXT, Longitude REAL, Latitude REAL);
//!          INSERT INTO hubs VALUES ('Chicago', -87.6, 41.9);",
//!     )
//!     .unwrap();
//!
//! let features = store.query_features("hubs").unwrap();
//! assert_eq!(features.len(), 1);
//! ```

mod queries;

use rusqlite::{Connection, OpenFlags};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

pub use queries::{LATITUDE_COLUMN, LONGITUDE_COLUMN};

/// A connection to the table store.
///
/// Cheaply cloneable (via `Rc`); one render pass runs on one thread, so
/// there is no locking.
#[derive(Clone)]
pub struct Store {
    conn: Rc<RefCell<Connection>>,
}

impl Store {
    /// Open an existing store read-only.
    ///
    /// `timeout` bounds how long a query waits on a locked database before
    /// failing.
    pub fn open(path: impl AsRef<Path>, timeout: Duration) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(timeout)?;
        log::info!("[QRD] store: opened {}", path.display());
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Create an empty, writable in-memory store.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Run raw SQL statements, e.g. to seed an in-memory store.
    pub fn execute_batch(&self, sql: &str) -> anyhow::Result<()> {
        self.conn.borrow().execute_batch(sql)?;
        Ok(())
    }
}
