//! Room index implementations.

pub mod inmemory;

pub use inmemory::InMemoryRoomIndex;
