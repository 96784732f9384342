use std::collections::HashSet;
use std::fmt;
use std::ops::{Deref, Index};
use std::slice::Iter;
use std::vec::IntoIter;

use crate::domain::Photo;

/// An insertion-ordered photo list with automatic de-duplication.
/// Provides O(1) duplicate checking based on photo id while preserving the
/// order photos arrived in. Append-only apart from in-place like mutation
/// and an explicit [`clear`](PhotoSet::clear).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhotoSet {
    photos: Vec<Photo>,
    photo_ids: HashSet<String>,
}

impl PhotoSet {
    /// Creates a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new set with the specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            photos: Vec::with_capacity(capacity),
            photo_ids: HashSet::with_capacity(capacity),
        }
    }

    /// Appends a photo (ignores duplicates)
    /// Returns: true if the photo was actually appended, false if its id was
    /// already present
    pub fn insert(&mut self, photo: Photo) -> bool {
        if self.photo_ids.insert(photo.id.clone()) {
            self.photos.push(photo);
            true
        } else {
            false
        }
    }

    /// Alias for insert() providing Vec-like API
    pub fn push(&mut self, photo: Photo) -> bool {
        self.insert(photo)
    }

    /// Appends every photo whose id is not yet present, in the given order.
    /// Returns the number of photos actually appended.
    pub fn extend_unique<T: IntoIterator<Item = Photo>>(&mut self, photos: T) -> usize {
        let mut appended = 0;
        for photo in photos {
            if self.insert(photo) {
                appended += 1;
            }
        }
        appended
    }

    /// Checks if a photo id is contained in the set
    pub fn contains(&self, photo_id: &str) -> bool {
        self.photo_ids.contains(photo_id)
    }

    /// Gets a photo by index
    pub fn get(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    /// Position of a photo id in insertion order
    pub fn position_of(&self, photo_id: &str) -> Option<usize> {
        if !self.photo_ids.contains(photo_id) {
            return None;
        }
        self.photos.iter().position(|photo| photo.id == photo_id)
    }

    /// Overwrites the like flag of the photo with the given id.
    /// Returns: true if the photo was found and updated.
    pub fn set_liked(&mut self, photo_id: &str, is_liked: bool) -> bool {
        match self.photos.iter_mut().find(|photo| photo.id == photo_id) {
            Some(photo) => {
                photo.is_liked = is_liked;
                true
            }
            None => false,
        }
    }

    /// Returns a reference to the internal Vec (read-only)
    pub fn as_slice(&self) -> &[Photo] {
        &self.photos
    }

    /// Removes all photos
    pub fn clear(&mut self) {
        self.photos.clear();
        self.photo_ids.clear();
    }
}

impl Deref for PhotoSet {
    type Target = [Photo];

    fn deref(&self) -> &Self::Target {
        &self.photos
    }
}

impl Index<usize> for PhotoSet {
    type Output = Photo;

    fn index(&self, index: usize) -> &Self::Output {
        &self.photos[index]
    }
}

impl AsRef<[Photo]> for PhotoSet {
    fn as_ref(&self) -> &[Photo] {
        &self.photos
    }
}

impl IntoIterator for PhotoSet {
    type Item = Photo;
    type IntoIter = IntoIter<Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.into_iter()
    }
}

impl<'a> IntoIterator for &'a PhotoSet {
    type Item = &'a Photo;
    type IntoIter = Iter<'a, Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}

impl FromIterator<Photo> for PhotoSet {
    fn from_iter<T: IntoIterator<Item = Photo>>(iter: T) -> Self {
        let mut photos = Self::new();
        for photo in iter {
            photos.insert(photo);
        }
        photos
    }
}

impl Extend<Photo> for PhotoSet {
    fn extend<T: IntoIterator<Item = Photo>>(&mut self, iter: T) {
        for photo in iter {
            self.insert(photo);
        }
    }
}

impl fmt::Display for PhotoSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhotoSet[{} photos]", self.len())
    }
}
