static INDEX_FILE: &str = "index.html";

/// Read-only access to the files served outside of the dispensers (the web page, its assets...)
pub struct StaticFileRepository {
    root_path: std::path::PathBuf,
}

/// A static file opened for streaming
pub struct StaticFile {
    pub file: tokio::fs::File,
    pub length: u64,
    pub mime_type: &'static str,
}

fn get_web_mime_type(path: &std::path::Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => crate::dispenser::media::get_mime_type_from_path(path),
    }
}

impl StaticFileRepository {
    pub fn new<T>(root_path: T) -> std::sync::Arc<StaticFileRepository>
    where
        T: std::convert::Into<std::path::PathBuf>,
    {
        let root_path: std::path::PathBuf = root_path.into();
        if !root_path.is_dir() {
            log::warn!(
                "Static root {:?} is not a directory, no static file will be served",
                root_path
            );
        }
        std::sync::Arc::new(StaticFileRepository { root_path })
    }

    pub fn has_index(&self) -> bool {
        self.root_path.join(INDEX_FILE).is_file()
    }

    /// Maps the path of a request to a file under the root, directories are mapped to their index
    pub fn resolve(&self, uri_path: &str) -> Result<std::path::PathBuf, crate::router::RouterError> {
        lazy_static::lazy_static! {
            static ref PARENT_SEGMENT: regex::Regex = regex::Regex::new(r"(^|/)\.\.(/|$)").unwrap();
        }
        if PARENT_SEGMENT.is_match(uri_path) {
            return Err(crate::router::InvalidRequest(String::from("Invalid path")));
        }

        let relative_path = uri_path.trim_start_matches('/');
        let mut full_path = self.root_path.join(relative_path);
        if relative_path.is_empty() || relative_path.ends_with('/') || full_path.is_dir() {
            full_path = full_path.join(INDEX_FILE);
        }

        if full_path.is_file() {
            Ok(full_path)
        } else {
            Err(crate::router::NotFound)
        }
    }

    pub async fn open(&self, uri_path: &str) -> Result<StaticFile, crate::router::RouterError> {
        let path = self.resolve(uri_path)?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| super::map_error(&e, "Could not open file", 500))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| super::map_error(&e, "Could not read file", 500))?
            .len();
        log::debug!("Serving static file {:?}", path);
        Ok(StaticFile {
            file,
            length,
            mime_type: get_web_mime_type(&path),
        })
    }
}
