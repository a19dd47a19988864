pub mod scope;
pub mod text_field;

pub use scope::{Epoch, ScopeSeq, ViewScope};
pub use text_field::TextField;
