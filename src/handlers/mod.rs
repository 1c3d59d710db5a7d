pub mod cart;
pub mod health;

pub use cart::*;
pub use health::*;
