//! Client side of the dashboard: backends, the state store and the view model.

mod backend;
pub mod error;
mod local;
mod remote;
mod store;
pub mod view;

pub use backend::{Access, Backend, Collection};
pub use error::ClientError;
pub use local::{KeyValueStore, LocalBackend, USER_KEY};
pub use remote::RemoteBackend;
pub use store::{
    DEFAULT_REFRESH_INTERVAL, DashboardState, NOTICE_TTL, Notice, NoticeLevel, Region, Store,
    Tracked,
};
