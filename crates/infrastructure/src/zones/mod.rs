mod arc_swap_store;

pub use arc_swap_store::ArcSwapZoneStore;
