//! Domain layer: value objects, entities, the statistics aggregator and the
//! traits the outer layers implement.

pub mod aggregator;
pub mod answer;
pub mod connection;
pub mod entity;
pub mod error;
pub mod field;
pub mod repository;
pub mod statistics;
pub mod value_object;

pub use aggregator::compute_statistics;
pub use answer::AnswerValue;
pub use connection::{ConnectionRegistry, PusherChannel, RoomIndex};
pub use entity::{Form, FormStatus, RequestMetadata, ResponseRecord};
pub use error::{PushError, RepositoryError, ValueObjectError};
pub use field::{FieldSchema, FieldStrategy, FieldType};
pub use repository::FormRepository;
#[cfg(test)]
pub use repository::MockFormRepository;
pub use statistics::{FieldData, FieldStatistics, FormStatistics};
pub use value_object::{ClientId, ClientIdFactory, FormId, ResponseId, ShareUrl, Timestamp};
