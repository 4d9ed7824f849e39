mod catalog;
mod error;
mod extractor;
pub(crate) mod selector;
mod text;

pub use catalog::{Catalog, Category, Pizza};
pub use error::Error;
pub use extractor::PizzaForteExtractor;

#[cfg(test)]
pub(crate) use catalog::tests as fixtures;
