//! Command implementations.

pub mod init_spec;
pub mod validate;

pub use self::init_spec::{execute_init_spec, sample_requirements};
pub use self::validate::{execute_validate, parse_inline_requirement};
