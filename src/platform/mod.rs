//! Platform layer
//!
//! Wires the pure motion and navigation cores to the browser:
//! - Media queries (reduced motion, coarse pointer)
//! - Page geometry read from the DOM
//! - Event listeners and animation-frame loops, detached on unmount

pub mod media;

#[cfg(target_arch = "wasm32")]
pub mod callbacks;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use media::MediaSignals;

/// Reasons the page could not be mounted
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element matches {0}")]
    MissingElement(String),
    #[error("browser call failed: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for MountError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        MountError::Js(format!("{:?}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_error_messages() {
        assert_eq!(MountError::NoWindow.to_string(), "no global window");
        assert_eq!(
            MountError::MissingElement("#custom-cursor".to_owned()).to_string(),
            "no element matches #custom-cursor"
        );
    }
}
