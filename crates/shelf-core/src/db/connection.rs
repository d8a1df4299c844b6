//! Process-wide ownership of the single store connection.
//!
//! # Invariants
//! - At most one [`Database`] is opened per [`ConnectionManager`].
//! - Callers arriving while the first initialization is in flight await that
//!   same initialization instead of opening their own.
//! - A failed initialization is reported to every caller that joined it and
//!   leaves the manager empty, so the next `acquire` starts over.

use std::{
    fmt,
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, error, info};
use tokio::task;

use super::Database;
use crate::error::{LibraryError, Result};

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A SQLite database file
    File(PathBuf),
    /// A private in-memory database, gone when the process exits
    Memory,
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::Memory => write!(f, ":memory:"),
        }
    }
}

/// Cheaply cloneable handle to the open store.
///
/// All clones share one connection; operations run one at a time on the
/// blocking thread pool.
#[derive(Clone)]
pub struct StoreHandle {
    db: Arc<Mutex<Database>>,
}

impl StoreHandle {
    fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Runs a synchronous database operation off the async executor.
    pub async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let mut guard = db.lock().map_err(|_| LibraryError::StorageUnavailable {
                message: "store lock poisoned by a failed operation".to_string(),
            })?;
            op(&mut guard)
        })
        .await
        .map_err(LibraryError::task_join)?
    }

    /// Whether two handles refer to the same underlying connection.
    pub fn same_store(&self, other: &StoreHandle) -> bool {
        Arc::ptr_eq(&self.db, &other.db)
    }
}

type InitFuture = Shared<BoxFuture<'static, std::result::Result<StoreHandle, String>>>;

enum Slot {
    Empty,
    Initializing { attempt: u64, init: InitFuture },
    Ready(StoreHandle),
}

/// Lazily opens the store on first use and hands out the cached handle.
pub struct ConnectionManager {
    location: StoreLocation,
    slot: Mutex<Slot>,
    attempts: AtomicU64,
    schema_runs: Arc<AtomicUsize>,
}

impl ConnectionManager {
    /// Creates a manager for the given location without opening anything.
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            slot: Mutex::new(Slot::Empty),
            attempts: AtomicU64::new(0),
            schema_runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns a ready-to-use handle, opening the store if needed.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::StorageUnavailable` if the initialization this
    /// call started or joined failed.
    pub async fn acquire(&self) -> Result<StoreHandle> {
        let (attempt, init) = {
            let mut slot = self.lock_slot();
            let in_flight = match &*slot {
                Slot::Ready(handle) => return Ok(handle.clone()),
                Slot::Initializing { attempt, init } => Some((*attempt, init.clone())),
                Slot::Empty => None,
            };

            match in_flight {
                Some((attempt, init)) => {
                    debug!("Joining in-flight store initialization {attempt}");
                    (attempt, init)
                }
                None => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    let init = self.start_initialization(attempt);
                    *slot = Slot::Initializing {
                        attempt,
                        init: init.clone(),
                    };
                    (attempt, init)
                }
            }
        };

        let outcome = init.await;

        let mut slot = self.lock_slot();
        // A later attempt may already own the slot; only settle our own.
        let owns_slot = matches!(&*slot, Slot::Initializing { attempt: current, .. } if *current == attempt);
        match outcome {
            Ok(handle) => {
                if owns_slot {
                    *slot = Slot::Ready(handle.clone());
                }
                Ok(handle)
            }
            Err(message) => {
                if owns_slot {
                    *slot = Slot::Empty;
                }
                Err(LibraryError::StorageUnavailable { message })
            }
        }
    }

    /// Whether a handle is cached.
    pub fn is_ready(&self) -> bool {
        matches!(&*self.lock_slot(), Slot::Ready(_))
    }

    /// Number of times the schema manager has run for this manager.
    pub fn schema_initializations(&self) -> usize {
        self.schema_runs.load(Ordering::SeqCst)
    }

    /// The configured store location.
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        // The slot is only ever replaced wholesale, so a poisoned value is
        // still consistent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_initialization(&self, attempt: u64) -> InitFuture {
        let location = self.location.clone();
        let schema_runs = Arc::clone(&self.schema_runs);

        async move {
            info!("Opening library store at {location} (attempt {attempt})");
            let opened = task::spawn_blocking(move || open_store(&location, &schema_runs)).await;

            match opened {
                Ok(Ok(db)) => {
                    info!("Library store ready");
                    Ok(StoreHandle::new(db))
                }
                Ok(Err(err)) => {
                    error!("Library store initialization failed: {err}");
                    Err(err.to_string())
                }
                Err(join_err) => Err(format!("Task join error: {join_err}")),
            }
        }
        .boxed()
        .shared()
    }
}

fn open_store(location: &StoreLocation, schema_runs: &AtomicUsize) -> Result<Database> {
    let mut db = match location {
        StoreLocation::File(path) => Database::open(path)?,
        StoreLocation::Memory => Database::open_in_memory()?,
    };
    schema_runs.fetch_add(1, Ordering::SeqCst);
    db.initialize_schema()?;
    Ok(db)
}
