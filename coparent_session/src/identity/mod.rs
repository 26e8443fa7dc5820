mod errors;
mod memory;
mod types;

pub use errors::IdentityError;
pub use memory::InMemoryIdentityService;
pub use types::{Identity, IdentityService};
