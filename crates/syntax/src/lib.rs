pub mod ast;
pub mod error;
pub mod parser;
pub mod scope;
pub mod token;

pub use error::Error;
pub use parser::{parse, Program};
pub use scope::{FunctionSymbol, ScopeId, ScopeTable, VariableSymbol};

pub type Result<T, E = Error> = std::result::Result<T, E>;
