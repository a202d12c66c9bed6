pub use self::DispenserError::*;

#[derive(Debug)]
pub enum DispenserError {
    /// The path of a dispenser has no usable final segment to name it after
    InvalidDirectory(std::path::PathBuf),
    /// The data root could not be created or listed
    InitializationError(std::path::PathBuf, std::io::Error),
    /// Listing, opening or reading the selected file failed
    DeliveryFailure(std::path::PathBuf, std::io::Error),
}

impl DispenserError {
    pub fn get_path(&self) -> &std::path::Path {
        match self {
            InvalidDirectory(path) => path,
            InitializationError(path, _) => path,
            DeliveryFailure(path, _) => path,
        }
    }
}
