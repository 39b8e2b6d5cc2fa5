pub mod keyfile;
pub mod provider;

pub use keyfile::KeyfileEnvironment;
