use std::fmt;

#[derive(Debug)]
pub enum PageplanError {
    InvalidLength(String),
    Io(std::io::Error),
}

impl fmt::Display for PageplanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageplanError::InvalidLength(raw) => {
                write!(f, "cannot convert length expression: {}", raw)
            }
            PageplanError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for PageplanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PageplanError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PageplanError {
    fn from(value: std::io::Error) -> Self {
        PageplanError::Io(value)
    }
}
