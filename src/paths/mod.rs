pub mod collection;
pub mod path;

pub use collection::PathCollection;
pub use path::RetentionPath;
