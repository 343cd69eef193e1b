pub mod registry;

pub use registry::{AccountCreated, UserCreated, UserRegistry};
