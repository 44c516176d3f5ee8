pub mod attempt;
pub mod level;
pub mod player;
pub mod question;
pub mod shop;

pub use attempt::*;
pub use question::*;
