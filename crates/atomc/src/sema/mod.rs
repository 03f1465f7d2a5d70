//! Semantic model: types, symbols and the predefined externals
//!
//! The checks themselves run inline in the parser; this module holds the
//! data they consult and mutate.

mod types;
mod symbols;
mod externs;

pub use types::{can_cast, promote, BaseType, ConstValue, ExprInfo, Extent, StructId, Type};
pub use symbols::{Name, Redefinition, Storage, Symbol, SymbolClass, SymbolTable};
pub use externs::{register_externs, EXTERNS};
