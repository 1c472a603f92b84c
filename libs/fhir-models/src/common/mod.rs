//! Resource catalog
//!
//! Resources, their backbone elements and the code enums they bind.

pub mod binary;
pub mod bundle;
pub mod codes;
pub mod error;
pub mod medication;
pub mod observation;
pub mod operation_outcome;
pub mod organization;
pub mod parameters;
pub mod patient;

// Re-export commonly used types
pub use binary::*;
pub use bundle::*;
pub use codes::*;
pub use error::{Error, Result};
pub use medication::*;
pub use observation::*;
pub use operation_outcome::*;
pub use organization::*;
pub use parameters::*;
pub use patient::*;
