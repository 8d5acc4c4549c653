//! Marked image path collection

use crate::{Image, ImageList};
use std::ops::Deref;

/// Sources of the marked images, in list order.
///
/// Entries borrow from the image list, which cannot change while they live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedPaths<'a> {
    paths: Vec<&'a str>,
}

impl<'a> Deref for MarkedPaths<'a> {
    type Target = [&'a str];

    fn deref(&self) -> &Self::Target {
        &self.paths
    }
}

/// Collect sources of all marked images.
///
/// Returns `None` without allocating if nothing is marked, and also if the
/// path list cannot be allocated.
pub fn collect_marked_paths(images: &ImageList) -> Option<MarkedPaths<'_>> {
    let count = images.iter().filter(|image| image.is_marked()).count();
    if count == 0 {
        return None;
    }

    let mut paths = Vec::new();
    if let Err(e) = paths.try_reserve_exact(count) {
        tracing::warn!("Cannot allocate list of {} marked paths: {}", count, e);
        return None;
    }
    paths.extend(
        images
            .iter()
            .filter(|image| image.is_marked())
            .map(Image::source),
    );

    Some(MarkedPaths { paths })
}
