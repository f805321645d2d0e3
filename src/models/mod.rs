pub mod action;
pub mod alert;
pub mod incident;

pub use action::*;
pub use alert::*;
pub use incident::*;
