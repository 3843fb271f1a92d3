pub mod proxy_directory;
pub mod record_store;
pub mod snapshot;

pub use proxy_directory::ProxyDirectory;
pub use record_store::{RecordLookup, RecordStore};
pub use snapshot::ZoneSnapshot;
