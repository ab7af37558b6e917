//! Tiered persistence and the layout facade for panegrid.
//!
//! A [`LayoutManager`] keeps a dashboard's layout and active module list in
//! three tiers:
//! - local storage ([`FileStore`]), written synchronously;
//! - session storage ([`MemoryStore`]), mirrored in the background;
//! - the remote session store ([`RemoteSessionClient`]), mirrored in the
//!   background and consulted first on load.
//!
//! Persistence failures never reach the caller of a layout operation. They
//! are logged through `tracing` and recorded in the injected [`Diagnostics`].

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod manager;
pub mod mock_remote;
pub mod persist;
pub mod remote;
pub mod rpc;
pub mod store;

pub use config::SessionConfig;
pub use diagnostics::{DiagnosticEvent, DiagnosticKind, Diagnostics, DiagnosticsLog, LoadSource, NoopDiagnostics};
pub use error::SessionError;
pub use manager::{LayoutManager, LoadedLayout};
pub use mock_remote::MockSessionClient;
pub use persist::{PersistenceAdapter, SessionSnapshot, StorageKeys};
pub use remote::{LayoutTemplate, RemoteFuture, RemoteSession, RemoteSessionClient};
pub use rpc::RpcSessionClient;
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageTier};
