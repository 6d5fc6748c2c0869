//! Storage bridge for the intake workflow
//!
//! Two scopes with very different lifetimes:
//! - **Transient** (`transient`): the in-flight upload attempt. In-memory,
//!   cleared when the attempt completes or is cancelled.
//! - **Durable** (`records`): the saved invoice list. One JSON file under
//!   the root folder, surviving restarts.

mod records;
mod transient;

pub use records::RecordStore;
pub use transient::TransientStore;
