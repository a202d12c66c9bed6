/// Extensions a dispenser will pick from, in the order used to look up fallback files
pub static MEDIA_EXTENSIONS: [&str; 24] = [
    "mp4", "webm", "mkv", "avi", "mov", "flv", "wmv", "m4v", "m4p", "m4a", "mp3", "wav", "ogg",
    "flac", "opus", "aac", "wma", "weba", "jpg", "jpeg", "png", "gif", "bmp", "webp",
];

pub static DEFAULT_MIME_TYPE: &str = "application/octet-stream";

fn get_extension(path: &std::path::Path) -> Option<String> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
}

pub fn is_media_extension(extension: &str) -> bool {
    let extension = extension.to_ascii_lowercase();
    MEDIA_EXTENSIONS.iter().any(|e| *e == extension)
}

/// Only looks at the suffix of the file name, the content is never inspected
pub fn is_media_file(path: &std::path::Path) -> bool {
    get_extension(path).map_or(false, |extension| is_media_extension(&extension))
}

pub fn get_mime_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "flv" => "video/x-flv",
        "wmv" => "video/x-ms-wmv",
        "m4v" => "video/x-m4v",
        "m4p" => "video/mp4",
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "opus" => "audio/ogg",
        "aac" => "audio/aac",
        "wma" => "audio/x-ms-wma",
        "weba" => "audio/webm",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        _ => DEFAULT_MIME_TYPE,
    }
}

pub fn get_mime_type_from_path(path: &std::path::Path) -> &'static str {
    get_extension(path).map_or(DEFAULT_MIME_TYPE, |extension| get_mime_type(&extension))
}
