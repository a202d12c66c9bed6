use rand::{Rng, SeedableRng};

use super::error::{DeliveryFailure, DispenserError, InitializationError, InvalidDirectory};
use super::media;
use super::stream::MediaStream;

/// A file picked by a [FileDispenser], ready to be streamed
pub struct DispensedFile {
    pub stream: MediaStream,
    pub mime_type: &'static str,
    /// Number of eligible files in the directory before the pick
    pub total_files: usize,
    pub is_fallback: bool,
}

/// Serves one random media file per request out of a single directory
pub struct FileDispenser {
    base_directory: std::path::PathBuf,
    name: String,
    delete_by_default: bool,
    rng: std::sync::Mutex<rand::rngs::StdRng>,
}

fn get_name(directory: &std::path::Path) -> Option<String> {
    directory
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(String::from)
}

impl FileDispenser {
    pub fn new<T>(directory: T, delete_by_default: bool) -> Result<FileDispenser, DispenserError>
    where
        T: std::convert::Into<std::path::PathBuf>,
    {
        let base_directory: std::path::PathBuf = directory.into();
        let name = get_name(&base_directory).ok_or_else(|| InvalidDirectory(base_directory.clone()))?;

        if !base_directory.exists() {
            log::info!("Creating dir {:?}", base_directory);
            std::fs::create_dir_all(&base_directory)
                .map_err(|e| InitializationError(base_directory.clone(), e))?;
        }
        if !base_directory.is_dir() {
            return Err(InvalidDirectory(base_directory));
        }

        Ok(FileDispenser {
            base_directory,
            name,
            delete_by_default,
            rng: std::sync::Mutex::new(rand::rngs::StdRng::from_entropy()),
        })
    }

    /// Makes the random picks reproducible
    pub fn with_seed(self, seed: u64) -> FileDispenser {
        FileDispenser {
            rng: std::sync::Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn deletes_by_default(&self) -> bool {
        self.delete_by_default
    }

    /// Number of eligible files currently in the directory
    pub fn count(&self) -> Result<usize, DispenserError> {
        self.list_media_files().map(|files| files.len())
    }

    /// Picks a random eligible file and opens it.
    ///
    /// `delete` overrides the default policy of the dispenser. When the directory has no
    /// eligible file, the file named after the directory in the parent directory is served
    /// instead (and never deleted). `Ok(None)` means there is nothing to serve at all.
    pub async fn dispense(
        &self,
        delete: Option<bool>,
    ) -> Result<Option<DispensedFile>, DispenserError> {
        let files = self.list_media_files()?;

        if files.is_empty() {
            return match self.get_fallback_file() {
                Some(path) => {
                    log::info!("No file in '{}', falling back to {:?}", self.name, path);
                    self.open(path, false, 0, true).await.map(Some)
                }
                None => {
                    log::info!("Nothing to dispense in '{}'", self.name);
                    Ok(None)
                }
            };
        }

        let total_files = files.len();
        let path = self.pick(files);
        let delete = delete.unwrap_or(self.delete_by_default);

        log::info!(
            "Dispensing {:?} out of {} file(s), delete: {}",
            path,
            total_files,
            delete
        );

        self.open(path, delete, total_files, false).await.map(Some)
    }

    async fn open(
        &self,
        path: std::path::PathBuf,
        delete: bool,
        total_files: usize,
        is_fallback: bool,
    ) -> Result<DispensedFile, DispenserError> {
        let mime_type = media::get_mime_type_from_path(&path);
        let stream = MediaStream::open(path.clone(), delete)
            .await
            .map_err(|e| DeliveryFailure(path, e))?;
        Ok(DispensedFile {
            stream,
            mime_type,
            total_files,
            is_fallback,
        })
    }

    fn pick(&self, mut files: Vec<std::path::PathBuf>) -> std::path::PathBuf {
        let index = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen_range(0..files.len());
        files.swap_remove(index)
    }

    fn get_fallback_file(&self) -> Option<std::path::PathBuf> {
        let parent = self
            .base_directory
            .parent()
            .unwrap_or(std::path::Path::new(".."));
        media::MEDIA_EXTENSIONS
            .iter()
            .map(|extension| parent.join(format!("{}.{}", self.name, extension)))
            .find(|path| path.is_file())
    }

    fn list_media_files(&self) -> Result<Vec<std::path::PathBuf>, DispenserError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.base_directory)
            .map_err(|e| DeliveryFailure(self.base_directory.clone(), e))?
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && media::is_media_file(&path) {
                        files.push(path);
                    }
                }
                Err(e) => {
                    log::warn!("Ignored file: {}", e);
                }
            }
        }
        // read_dir gives no ordering guarantee, sorting keeps seeded picks reproducible
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::FileDispenser;
    use crate::dispenser::error::DispenserError;
    use crate::dispenser::tests::TestDirectory;
    use tokio::io::AsyncReadExt;

    async fn consume(dispensed: super::DispensedFile) -> String {
        let mut stream = dispensed.stream;
        let mut content = String::new();
        stream.read_to_string(&mut content).await.unwrap();
        content
    }

    fn get_file_name(dispensed: &super::DispensedFile) -> String {
        dispensed
            .stream
            .get_path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn it_derives_the_name_from_the_directory() {
        let test_dir = TestDirectory::new("name");
        let dispenser = FileDispenser::new(test_dir.get_path("alerts"), true).unwrap();

        assert_eq!("alerts", dispenser.get_name());
        assert!(dispenser.deletes_by_default());
    }

    #[test]
    fn it_creates_a_missing_directory() {
        let test_dir = TestDirectory::new("create");
        let path = test_dir.get_path("nested/sounds");
        assert!(!path.exists());

        let dispenser = FileDispenser::new(&path, false).unwrap();

        assert!(path.is_dir());
        assert_eq!(0, dispenser.count().unwrap());
    }

    #[rstest::rstest]
    #[case("")]
    #[case("/")]
    #[case("target/test/dispenser/..")]
    fn it_rejects_paths_without_a_name(#[case] path: &str) {
        let result = FileDispenser::new(path, true);

        assert!(matches!(result, Err(DispenserError::InvalidDirectory(_))));
    }

    #[test]
    fn it_rejects_a_path_to_a_file() {
        let test_dir = TestDirectory::new("not_a_dir");
        let path = test_dir.add_file("clip.mp4", "content");

        let result = FileDispenser::new(path, true);

        assert!(matches!(result, Err(DispenserError::InvalidDirectory(_))));
    }

    #[test]
    fn it_counts_only_media_files() {
        let test_dir = TestDirectory::new("count");
        test_dir.add_file("pool/a.mp4", "a");
        test_dir.add_file("pool/b.txt", "b");
        test_dir.add_file("pool/c.JPG", "c");
        test_dir.add_file("pool/nested/d.mp4", "d");
        let dispenser = FileDispenser::new(test_dir.get_path("pool"), true).unwrap();

        assert_eq!(2, dispenser.count().unwrap());
        assert_eq!(2, dispenser.count().unwrap());
    }

    #[test_log::test(tokio::test)]
    async fn it_dispenses_a_media_file() {
        let test_dir = TestDirectory::new("dispense");
        test_dir.add_file("pool/a.mp4", "a");
        test_dir.add_file("pool/b.txt", "b");
        test_dir.add_file("pool/c.JPG", "c");
        let dispenser = FileDispenser::new(test_dir.get_path("pool"), false).unwrap();

        let dispensed = dispenser.dispense(None).await.unwrap().unwrap();

        assert_eq!(2, dispensed.total_files);
        assert!(!dispensed.is_fallback);
        assert!(!dispensed.stream.deletes_on_close());
        match get_file_name(&dispensed).as_str() {
            "a.mp4" => assert_eq!("video/mp4", dispensed.mime_type),
            "c.JPG" => assert_eq!("image/jpeg", dispensed.mime_type),
            other => panic!("Dispensed an ineligible file: {}", other),
        }
    }

    #[test_log::test(tokio::test)]
    async fn it_picks_files_uniformly() {
        let test_dir = TestDirectory::new("uniform");
        for name in ["a.mp4", "b.png", "c.mp3", "d.webm"] {
            test_dir.add_file(&format!("pool/{}", name), name);
        }
        let dispenser = FileDispenser::new(test_dir.get_path("pool"), true)
            .unwrap()
            .with_seed(42);

        let mut picks = std::collections::HashMap::<String, usize>::new();
        for _ in 0..4000 {
            let dispensed = dispenser.dispense(Some(false)).await.unwrap().unwrap();
            assert_eq!(4, dispensed.total_files);
            *picks.entry(get_file_name(&dispensed)).or_default() += 1;
        }

        assert_eq!(4, picks.len());
        for (name, count) in picks {
            assert!(
                (850..=1150).contains(&count),
                "{} was picked {} times",
                name,
                count
            );
        }
    }

    #[test_log::test(tokio::test)]
    async fn it_deletes_the_file_after_streaming() {
        let test_dir = TestDirectory::new("delete");
        let file = test_dir.add_file("pool/only.mp4", "only content");
        let dispenser = FileDispenser::new(test_dir.get_path("pool"), true).unwrap();

        let dispensed = dispenser.dispense(None).await.unwrap().unwrap();
        assert_eq!(1, dispensed.total_files);
        assert_eq!("only content", consume(dispensed).await);

        assert!(!file.exists());
        assert_eq!(0, dispenser.count().unwrap());
        assert!(dispenser.dispense(None).await.unwrap().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn it_keeps_the_file_when_deletion_is_disabled() {
        let test_dir = TestDirectory::new("no_delete");
        let file = test_dir.add_file("pool/only.mp4", "only content");
        let dispenser = FileDispenser::new(test_dir.get_path("pool"), false).unwrap();

        let dispensed = dispenser.dispense(None).await.unwrap().unwrap();
        consume(dispensed).await;

        assert!(file.exists());
        let dispensed = dispenser.dispense(None).await.unwrap().unwrap();
        assert_eq!(1, dispensed.total_files);
        assert_eq!("only.mp4", get_file_name(&dispensed));
    }

    #[test_log::test(tokio::test)]
    async fn it_lets_the_request_override_the_policy() {
        let test_dir = TestDirectory::new("override");
        let kept = test_dir.add_file("keep/only.mp4", "kept");
        let deleted = test_dir.add_file("consume/only.mp4", "deleted");
        let keep = FileDispenser::new(test_dir.get_path("keep"), true).unwrap();
        let consume_dispenser = FileDispenser::new(test_dir.get_path("consume"), false).unwrap();

        consume(keep.dispense(Some(false)).await.unwrap().unwrap()).await;
        consume(consume_dispenser.dispense(Some(true)).await.unwrap().unwrap()).await;

        assert!(kept.exists());
        assert!(!deleted.exists());
    }

    #[test_log::test(tokio::test)]
    async fn it_falls_back_to_the_file_named_after_the_directory() {
        let test_dir = TestDirectory::new("fallback");
        test_dir.add_dir("show");
        let fallback = test_dir.add_file("show.mp4", "fallback content");
        let dispenser = FileDispenser::new(test_dir.get_path("show"), true).unwrap();

        let dispensed = dispenser.dispense(Some(true)).await.unwrap().unwrap();

        assert!(dispensed.is_fallback);
        assert_eq!(0, dispensed.total_files);
        assert_eq!("video/mp4", dispensed.mime_type);
        assert!(!dispensed.stream.deletes_on_close());
        assert_eq!("fallback content", consume(dispensed).await);
        assert!(fallback.exists());
    }

    #[test_log::test(tokio::test)]
    async fn it_follows_the_extension_order_for_fallbacks() {
        let test_dir = TestDirectory::new("fallback_order");
        test_dir.add_dir("show");
        test_dir.add_file("show.jpg", "image");
        test_dir.add_file("show.webm", "video");
        let dispenser = FileDispenser::new(test_dir.get_path("show"), false).unwrap();

        let dispensed = dispenser.dispense(None).await.unwrap().unwrap();

        assert_eq!("video/webm", dispensed.mime_type);
        assert_eq!("video", consume(dispensed).await);
    }

    #[test_log::test(tokio::test)]
    async fn it_returns_nothing_without_files_or_fallback() {
        let test_dir = TestDirectory::new("empty");
        test_dir.add_file("show/notes.txt", "not media");
        test_dir.add_file("show.txt", "not media either");
        let dispenser = FileDispenser::new(test_dir.get_path("show"), true).unwrap();

        assert!(dispenser.dispense(None).await.unwrap().is_none());
    }

    #[test_log::test(tokio::test)]
    async fn it_fails_when_the_directory_disappears() {
        let test_dir = TestDirectory::new("vanished");
        let path = test_dir.add_dir("pool");
        let dispenser = FileDispenser::new(&path, true).unwrap();
        std::fs::remove_dir_all(&path).unwrap();

        let result = dispenser.dispense(None).await;

        assert!(matches!(result, Err(DispenserError::DeliveryFailure(_, _))));
        assert!(matches!(
            dispenser.count(),
            Err(DispenserError::DeliveryFailure(_, _))
        ));
    }
}
