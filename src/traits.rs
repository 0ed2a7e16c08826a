use crate::container::{Key, LookupError};
use crate::object::PlotObject;

/// A hierarchical container of plottable objects
///
/// Paths are slash-separated. Empty segments are ignored, so `/a//b`
/// and `a/b` refer to the same object.
pub trait Container {
    /// Names and type tags of all direct children, in container order
    fn keys(&self) -> Vec<Key>;

    /// The sub-container at the given path
    fn get_directory(&self, path: &str) -> Result<&Self, LookupError>;

    /// Load the object at the given path
    fn get(&self, path: &str) -> Result<PlotObject, LookupError>;
}

/// Destination for finished comparisons
pub trait Sink<T> {
    type Error;

    fn emit(&mut self, item: T) -> Result<(), Self::Error>;
}

impl<T> Sink<T> for Vec<T> {
    type Error = std::convert::Infallible;

    fn emit(&mut self, item: T) -> Result<(), Self::Error> {
        self.push(item);
        Ok(())
    }
}

/// Progress indicator
pub trait Progress {
    fn inc(&self, i: u64);

    fn finish(&self);
}
