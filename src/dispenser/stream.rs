/// Readable handle on a dispensed file.
///
/// When created with `delete_on_close`, the file is removed from disk as soon as the
/// stream is dropped, whether it was read to the end or abandoned halfway (e.g. the
/// client hung up). The removal happens at most once per stream.
pub struct MediaStream {
    file: Option<tokio::fs::File>,
    path: std::path::PathBuf,
    delete_on_close: bool,
}

impl MediaStream {
    pub async fn open(
        path: std::path::PathBuf,
        delete_on_close: bool,
    ) -> Result<MediaStream, std::io::Error> {
        let file = tokio::fs::File::open(&path).await?;
        Ok(MediaStream {
            file: Some(file),
            path,
            delete_on_close,
        })
    }

    pub fn get_path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn deletes_on_close(&self) -> bool {
        self.delete_on_close
    }

    pub async fn get_length(&self) -> Result<u64, std::io::Error> {
        match &self.file {
            Some(file) => Ok(file.metadata().await?.len()),
            None => Ok(0),
        }
    }
}

impl tokio::io::AsyncRead for MediaStream {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        match self.file.as_mut() {
            Some(file) => tokio::io::AsyncRead::poll_read(std::pin::Pin::new(file), cx, buf),
            None => std::task::Poll::Ready(Ok(())),
        }
    }
}

impl Drop for MediaStream {
    fn drop(&mut self) {
        // the handle has to be released before removing the file on some platforms
        drop(self.file.take());
        if !self.delete_on_close {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::info!("Deleted {:?} after streaming it", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{:?} was already deleted", self.path)
            }
            Err(e) => log::warn!("Failed to delete {:?}: {:?}", self.path, e),
        }
    }
}
