// Every variant states *where* things went wrong.
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Buffer size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch { expected: (u32, u32), actual: (u32, u32) },

    #[error("No kernel registered under '{0}'")]
    UnknownKernel(String),
}

impl Error {
    pub fn config<T: ToString>(path: impl Into<PathBuf>, msg: T) -> Self {
        Error::Config { path: path.into(), message: msg.to_string() }
    }

    pub fn size_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Error::SizeMismatch { expected, actual }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_site() {
        let e = Error::size_mismatch((4, 4), (8, 2));
        assert_eq!(e.to_string(), "Buffer size mismatch: expected (4, 4), got (8, 2)");

        let e = Error::config("wave.json", "expected value at line 1");
        assert!(e.to_string().starts_with("Config error in wave.json"));

        let e = Error::UnknownKernel("wave.nope".into());
        assert!(e.to_string().contains("wave.nope"));
    }
}
