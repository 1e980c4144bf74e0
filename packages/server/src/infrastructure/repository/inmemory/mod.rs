//! InMemory Repository 実装

pub mod form;

pub use form::InMemoryFormRepository;
