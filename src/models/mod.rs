// Re-export all model types
pub use self::cart::*;
pub use self::errors::*;

mod cart;
mod errors;
