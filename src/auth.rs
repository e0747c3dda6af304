//! Auth-domain identifiers, secrets, authorization records, and store keys.

pub mod id;
pub mod key;
pub mod record;
pub mod secret;

pub use id::*;
pub use key::*;
pub use record::*;
pub use secret::*;
