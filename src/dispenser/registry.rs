use super::dispenser::FileDispenser;
use super::error::{DispenserError, InitializationError};

static STATIC_SUFFIX: &str = "-static";

/// Dispensers for every subdirectory found in the data root at startup.
///
/// The registry is never refreshed, adding a directory requires a restart.
pub struct DirectoryRegistry {
    data_root: std::path::PathBuf,
    dispensers: Vec<std::sync::Arc<FileDispenser>>,
}

/// Directories ending with `-static` only select files, they never consume them
pub fn deletes_by_default(name: &str, debug_mode: bool) -> bool {
    let is_static = name
        .len()
        .checked_sub(STATIC_SUFFIX.len())
        .and_then(|start| name.get(start..))
        .map_or(false, |suffix| suffix.eq_ignore_ascii_case(STATIC_SUFFIX));
    !debug_mode && !is_static
}

impl DirectoryRegistry {
    pub fn build<T>(data_root: T, debug_mode: bool) -> Result<DirectoryRegistry, DispenserError>
    where
        T: std::convert::Into<std::path::PathBuf>,
    {
        let data_root: std::path::PathBuf = data_root.into();
        std::fs::create_dir_all(&data_root)
            .map_err(|e| InitializationError(data_root.clone(), e))?;

        let mut directories = Vec::new();
        for entry in
            std::fs::read_dir(&data_root).map_err(|e| InitializationError(data_root.clone(), e))?
        {
            let entry = entry.map_err(|e| InitializationError(data_root.clone(), e))?;
            if entry.path().is_dir() {
                directories.push(entry.path());
            }
        }
        directories.sort();

        let mut dispensers = Vec::new();
        for directory in directories {
            let name = match directory.file_name().and_then(|name| name.to_str()) {
                Some(name) => name.to_owned(),
                None => {
                    log::warn!("Skipping directory with an invalid name: {:?}", directory);
                    continue;
                }
            };
            let delete_by_default = deletes_by_default(&name, debug_mode);
            match FileDispenser::new(&directory, delete_by_default) {
                Ok(dispenser) => {
                    log::info!(
                        "Registered '{}' from {:?}, delete by default: {}",
                        name,
                        directory,
                        delete_by_default
                    );
                    dispensers.push(std::sync::Arc::new(dispenser));
                }
                Err(e) => log::warn!("Skipping directory {:?}: {:?}", directory, e),
            }
        }

        Ok(DirectoryRegistry {
            data_root,
            dispensers,
        })
    }

    pub fn get_data_root(&self) -> &std::path::Path {
        &self.data_root
    }

    pub fn get(&self, name: &str) -> Option<&std::sync::Arc<FileDispenser>> {
        self.dispensers
            .iter()
            .find(|dispenser| dispenser.get_name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &std::sync::Arc<FileDispenser>> {
        self.dispensers.iter()
    }

    pub fn len(&self) -> usize {
        self.dispensers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispensers.is_empty()
    }
}
