// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),     // Creating the window failed
    WindowUpdate(String),   // Updating the window buffer failed
    BackdropDecode(String), // Loading/decoding the demo backdrop image failed
    MapExport(String),      // Encoding the displacement map as an image failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::BackdropDecode(s) => write!(f, "Backdrop decode error: {s}"),
            Error::MapExport(s) => write!(f, "Map export error: {s}"),
        }
    }
}

// We don't implement std::error::Error for now to keep things minimal.
// It's easy to add later when we wire in more components.
