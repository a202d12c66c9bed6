pub mod dispenser;
pub mod index;
pub mod statics;

/// The reader is dropped once the body is done, or as soon as the client goes away
fn get_stream_body<R>(reader: R) -> hyper::Body
where
    R: tokio::io::AsyncRead + Send + 'static,
{
    hyper::Body::wrap_stream(tokio_util::io::ReaderStream::new(reader))
}
