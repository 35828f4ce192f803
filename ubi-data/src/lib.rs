//! Loading policy data from disk: tax bracket CSV files and TOML policy
//! files that resolve to a validated [`ubi_core::PolicyConfig`].

pub mod loader;
pub mod policy_file;

pub use loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
pub use policy_file::{PolicyFile, PolicyFileError, load_policy};
