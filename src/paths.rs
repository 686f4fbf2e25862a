//! The list of directories a sheet is built from.
//!
//! Adding a path that is already present moves nothing and adds nothing;
//! the list is always in ascending order, which is also the order the
//! directories appear in the document.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList {
    paths: Vec<PathBuf>,
}

impl PathList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path`, keeping the list unique and sorted.
    pub fn add(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if let Err(at) = self.paths.binary_search(&path) {
            self.paths.insert(at, path);
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PathList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut list = Self::new();
        for path in iter {
            list.add(path);
        }
        list
    }
}
