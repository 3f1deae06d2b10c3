//! In-memory repositories backing every route handler.
//!
//! Each registry exclusively owns its backing list; cross-references
//! between entities are by string id, looked up on demand. Registries
//! are constructed once per process (or per test case for isolation)
//! and expose `reset()` as a first-class operation.

pub mod catalog;
pub mod customers;
pub mod orders;
pub mod points;
pub mod staff;

pub use catalog::{ProductCatalog, StoreDirectory};
pub use customers::{CustomerRegistry, DuplicatePhone};
pub use orders::OrderRegistry;
pub use points::PointsLedger;
pub use staff::StaffDirectory;
