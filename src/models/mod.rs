mod category;

pub use category::{Category, CategoryPatch, CategoryType, NewCategory};
