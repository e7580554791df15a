//! # Analyzer
//!
//! Turns the token stream into [`Suite`](crate::ast::Suite)s with raw, unexecuted
//! spec and hook bodies.
//!
//! ```text
//! describe '<suite>'
//!   before      <code> end
//!   before_each <code> end
//!   it '<spec>' <code> end
//!   after_each  <code> end
//!   after       <code> end
//! end
//! ```
//!
//! Only one describe level is supported and specs/hooks are sequential inside it.
//! `// ...` outside a body comments out the rest of the line, `__END__` stops parsing.

pub mod core;
pub mod parser;

pub use self::core::{Construct, StructuralError};
pub use parser::SpecParser;
