//! Ordered list of viewable images and their marking state

use std::path::Path;

/// Position of an image in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

/// Image entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    source: String,
    marked: bool,
}

impl Image {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            marked: false,
        }
    }

    /// Image source (path to the image file)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// File name part of the source
    pub fn name(&self) -> &str {
        Path::new(&self.source)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.source)
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }
}

/// Image list
#[derive(Debug, Clone, Default)]
pub struct ImageList {
    images: Vec<Image>,
}

impl ImageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: sources.into_iter().map(Image::new).collect(),
        }
    }

    /// Append an image, returns its id
    pub fn push(&mut self, source: impl Into<String>) -> ImageId {
        self.images.push(Image::new(source));
        ImageId(self.images.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&Image> {
        self.images.get(id.0)
    }

    pub fn first(&self) -> Option<ImageId> {
        (!self.images.is_empty()).then_some(ImageId(0))
    }

    pub fn last(&self) -> Option<ImageId> {
        self.images.len().checked_sub(1).map(ImageId)
    }

    pub fn next(&self, id: ImageId) -> Option<ImageId> {
        let next = id.0.checked_add(1)?;
        (next < self.images.len()).then_some(ImageId(next))
    }

    pub fn prev(&self, id: ImageId) -> Option<ImageId> {
        id.0.checked_sub(1).filter(|&prev| prev < self.images.len()).map(ImageId)
    }

    /// Forward traversal from the first image
    pub fn iter(&self) -> impl Iterator<Item = &Image> + '_ {
        std::iter::successors(self.first(), move |&id| self.next(id))
            .filter_map(move |id| self.get(id))
    }

    /// Toggle the marked flag, returns the new state
    pub fn toggle_marked(&mut self, id: ImageId) -> Option<bool> {
        let image = self.images.get_mut(id.0)?;
        image.marked = !image.marked;
        Some(image.marked)
    }

    pub fn is_marked(&self, id: ImageId) -> bool {
        self.get(id).is_some_and(Image::is_marked)
    }

    pub fn marked_count(&self) -> usize {
        self.iter().filter(|image| image.is_marked()).count()
    }
}
