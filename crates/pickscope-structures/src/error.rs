//! Asset loading error types.

use pickscope_core::PickscopeError;
use thiserror::Error;

/// Errors that can occur while loading an asset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the file failed.
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),

    /// The OBJ data could not be parsed.
    #[error("failed to parse OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    /// The file parsed but contained no triangles.
    #[error("asset '{0}' contains no geometry")]
    Empty(String),

    /// The parsed geometry was rejected by the scene.
    #[error("asset rejected: {0}")]
    Rejected(#[from] PickscopeError),

    /// The load was cancelled before it finished.
    #[error("load cancelled")]
    Cancelled,

    /// The loader thread went away without reporting a result.
    #[error("loader thread exited without a result")]
    WorkerLost,
}

/// A specialized Result type for asset loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

impl From<LoadError> for PickscopeError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Rejected(inner) => inner,
            other => PickscopeError::AssetLoad(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_load(outcome: LoadResult<()>) -> pickscope_core::Result<()> {
        outcome?;
        Ok(())
    }

    #[test]
    fn test_load_errors_convert_for_question_mark() {
        let err = start_load(Err(LoadError::Empty("room.obj".into()))).unwrap_err();
        assert!(matches!(err, PickscopeError::AssetLoad(ref text) if text.contains("room.obj")));

        let rejected = LoadError::Rejected(PickscopeError::InvalidGeometry("no faces".into()));
        assert!(matches!(
            start_load(Err(rejected)),
            Err(PickscopeError::InvalidGeometry(_))
        ));
    }
}
