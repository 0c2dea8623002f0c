pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SVG parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("SVG input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
