pub mod format;
pub mod html;
pub mod json;
pub mod pii;

pub use pii::Masked;
