pub mod jwt;
pub mod validate;

pub use validate::{ValidatedJson, ValidatedPatch};
