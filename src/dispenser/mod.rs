pub use self::dispenser::{DispensedFile, FileDispenser};
pub use self::error::DispenserError;
pub use self::registry::DirectoryRegistry;
pub use self::stream::MediaStream;

mod dispenser;
pub mod error;
pub mod media;
pub mod registry;
mod stream;
