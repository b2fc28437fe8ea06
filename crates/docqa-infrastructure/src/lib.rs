pub mod paths;
pub mod token_store;

pub use paths::DocqaPaths;
pub use token_store::{FileTokenStore, InMemoryTokenStore};
