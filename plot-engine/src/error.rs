use crate::plot::GeometryError;

#[derive(Debug)]
/// Failure while setting up the plotter.
pub enum InitError {
    /// The Vulkan library could not be loaded.
    Library(vulkano::LoadingError),
    /// The library lacks the extensions needed to present to a window.
    MissingExtensions,
    /// No physical device can draw to the window.
    NoSuitableDevice,
    Window(winit::error::OsError),
    /// Any other Vulkan call failed during setup.
    Vulkan(String),
    Geometry(GeometryError),
}

impl InitError {
    pub(crate) fn vulkan(error: impl std::fmt::Display) -> Self {
        Self::Vulkan(error.to_string())
    }
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Library(e) => write!(f, "failed to load Vulkan library: {e}"),
            Self::MissingExtensions => {
                write!(f, "Vulkan library does not support required extensions")
            }
            Self::NoSuitableDevice => write!(f, "failed to find a suitable physical device"),
            Self::Window(e) => write!(f, "failed to create window: {e}"),
            Self::Vulkan(e) => write!(f, "Vulkan error: {e}"),
            Self::Geometry(e) => write!(f, "invalid plot: {e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Library(e) => Some(e),
            Self::Window(e) => Some(e),
            Self::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for InitError {
    fn from(error: GeometryError) -> Self {
        Self::Geometry(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_errors_convert() {
        let error: InitError = GeometryError::NoTiles.into();
        assert!(matches!(error, InitError::Geometry(GeometryError::NoTiles)));
        assert!(error.to_string().contains("tile count"));
    }
}
