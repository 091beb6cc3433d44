//! Reactive settings and location stores
//!
//! Each store holds a single current value, persists it through an external
//! key-value file store, and broadcasts changes synchronously to registered
//! subscribers (replaying the latest value to new subscribers). Store
//! instances are passed around explicitly; there are no globals.

mod kv;
mod location;
mod settings;

pub use kv::KvStore;
pub use location::{Location, LocationStore};
pub use settings::{SettingsStore, Units};
