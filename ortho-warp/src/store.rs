use image::{DynamicImage, ImageError};
use log::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// The number of an image within a session. Numbering starts at `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("image {0} is not stored")]
    UnknownImage(ImageId),
    #[error("image codec failed: {0}")]
    Image(#[from] ImageError),
    #[error("image storage failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Keeps the original of every image and its current representation.
///
/// Storing a warped raster replaces the current representation but never the original.
pub trait ImageStore {
    /// Stores a new photograph and assigns it the next image number.
    fn store_original(&self, image: &DynamicImage) -> Result<ImageId, StoreError>;

    /// Makes `image` the current representation of `id`.
    fn store_warped(&self, id: ImageId, image: &DynamicImage) -> Result<(), StoreError>;

    /// The photograph as it was stored by [`ImageStore::store_original`].
    fn original(&self, id: ImageId) -> Result<DynamicImage, StoreError>;

    /// The warped raster if there is one, otherwise the original.
    fn current(&self, id: ImageId) -> Result<DynamicImage, StoreError>;

    /// Discards the warped raster of `id` so that the original is current again.
    fn revert(&self, id: ImageId) -> Result<(), StoreError>;
}

impl<T: ImageStore + ?Sized> ImageStore for &T {
    fn store_original(&self, image: &DynamicImage) -> Result<ImageId, StoreError> {
        (**self).store_original(image)
    }

    fn store_warped(&self, id: ImageId, image: &DynamicImage) -> Result<(), StoreError> {
        (**self).store_warped(id, image)
    }

    fn original(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        (**self).original(id)
    }

    fn current(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        (**self).current(id)
    }

    fn revert(&self, id: ImageId) -> Result<(), StoreError> {
        (**self).revert(id)
    }
}

impl<T: ImageStore + ?Sized> ImageStore for Box<T> {
    fn store_original(&self, image: &DynamicImage) -> Result<ImageId, StoreError> {
        (**self).store_original(image)
    }

    fn store_warped(&self, id: ImageId, image: &DynamicImage) -> Result<(), StoreError> {
        (**self).store_warped(id, image)
    }

    fn original(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        (**self).original(id)
    }

    fn current(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        (**self).current(id)
    }

    fn revert(&self, id: ImageId) -> Result<(), StoreError> {
        (**self).revert(id)
    }
}

impl<T: ImageStore + ?Sized> ImageStore for Arc<T> {
    fn store_original(&self, image: &DynamicImage) -> Result<ImageId, StoreError> {
        (**self).store_original(image)
    }

    fn store_warped(&self, id: ImageId, image: &DynamicImage) -> Result<(), StoreError> {
        (**self).store_warped(id, image)
    }

    fn original(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        (**self).original(id)
    }

    fn current(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        (**self).current(id)
    }

    fn revert(&self, id: ImageId) -> Result<(), StoreError> {
        (**self).revert(id)
    }
}

#[derive(Debug, Clone)]
struct StoredImage {
    original: DynamicImage,
    warped: Option<DynamicImage>,
}

/// Keeps all images in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    images: Mutex<Vec<StoredImage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The warped raster of `id`, if it has been warped.
    pub fn warped(&self, id: ImageId) -> Result<Option<DynamicImage>, StoreError> {
        self.with_image(id, |stored| stored.warped.clone())
    }

    fn with_image<T>(
        &self,
        id: ImageId,
        f: impl FnOnce(&mut StoredImage) -> T,
    ) -> Result<T, StoreError> {
        let mut images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        (id.0 as usize)
            .checked_sub(1)
            .and_then(|ix| images.get_mut(ix))
            .map(f)
            .ok_or(StoreError::UnknownImage(id))
    }
}

impl ImageStore for MemoryStore {
    fn store_original(&self, image: &DynamicImage) -> Result<ImageId, StoreError> {
        let mut images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        images.push(StoredImage {
            original: image.clone(),
            warped: None,
        });
        Ok(ImageId(images.len() as u32))
    }

    fn store_warped(&self, id: ImageId, image: &DynamicImage) -> Result<(), StoreError> {
        self.with_image(id, |stored| stored.warped = Some(image.clone()))
    }

    fn original(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        self.with_image(id, |stored| stored.original.clone())
    }

    fn current(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        self.with_image(id, |stored| {
            stored
                .warped
                .clone()
                .unwrap_or_else(|| stored.original.clone())
        })
    }

    fn revert(&self, id: ImageId) -> Result<(), StoreError> {
        self.with_image(id, |stored| stored.warped = None)
    }
}

/// Keeps images as PNG files under an image folder.
///
/// ```text
/// <folder>/current/<n>.png                 current representation of image n
/// <folder>/archive/<session>/<n>.png        original of image n
/// <folder>/archive/<session>/<n>-warped.png warped raster of image n
/// ```
///
/// Reopening a session continues numbering after the originals already archived in it.
#[derive(Debug)]
pub struct DirectoryStore {
    current: PathBuf,
    archive: PathBuf,
    count: Mutex<u32>,
}

impl DirectoryStore {
    pub fn open(folder: impl AsRef<Path>, session: &str) -> Result<Self, StoreError> {
        let current = folder.as_ref().join("current");
        let archive = folder.as_ref().join("archive").join(session);
        fs::create_dir_all(&current)?;
        fs::create_dir_all(&archive)?;

        let mut count = 0;
        for entry in fs::read_dir(&archive)? {
            let path = entry?.path();
            let number = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u32>().ok());
            if let Some(number) = number {
                count = count.max(number);
            }
        }
        info!(
            "opened image store at {} with {} archived images",
            archive.display(),
            count
        );

        Ok(Self {
            current,
            archive,
            count: Mutex::new(count),
        })
    }

    pub fn current_path(&self, id: ImageId) -> PathBuf {
        self.current.join(format!("{}.png", id))
    }

    pub fn original_path(&self, id: ImageId) -> PathBuf {
        self.archive.join(format!("{}.png", id))
    }

    pub fn warped_path(&self, id: ImageId) -> PathBuf {
        self.archive.join(format!("{}-warped.png", id))
    }

    fn load(&self, id: ImageId, path: PathBuf) -> Result<DynamicImage, StoreError> {
        if !path.is_file() {
            return Err(StoreError::UnknownImage(id));
        }
        Ok(image::open(path)?)
    }
}

impl ImageStore for DirectoryStore {
    fn store_original(&self, image: &DynamicImage) -> Result<ImageId, StoreError> {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        let id = ImageId(*count + 1);
        image.save(self.original_path(id))?;
        image.save(self.current_path(id))?;
        *count = id.0;
        debug!("stored original of image {}", id);
        Ok(id)
    }

    fn store_warped(&self, id: ImageId, image: &DynamicImage) -> Result<(), StoreError> {
        if !self.original_path(id).is_file() {
            return Err(StoreError::UnknownImage(id));
        }
        image.save(self.warped_path(id))?;
        image.save(self.current_path(id))?;
        debug!("stored warped raster of image {}", id);
        Ok(())
    }

    fn original(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        self.load(id, self.original_path(id))
    }

    fn current(&self, id: ImageId) -> Result<DynamicImage, StoreError> {
        self.load(id, self.current_path(id))
    }

    fn revert(&self, id: ImageId) -> Result<(), StoreError> {
        let original = self.original_path(id);
        if !original.is_file() {
            return Err(StoreError::UnknownImage(id));
        }
        fs::copy(original, self.current_path(id))?;
        let warped = self.warped_path(id);
        if warped.is_file() {
            fs::remove_file(warped)?;
        }
        debug!("reverted image {} to its original", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([value, 0, 0, 255])))
    }

    #[test]
    fn memory_store_keeps_original() {
        let store = MemoryStore::new();
        let id = store.store_original(&solid(4, 3, 10)).unwrap();
        assert_eq!(id, ImageId(1));
        assert_eq!(store.current(id).unwrap().to_rgba8(), solid(4, 3, 10).to_rgba8());
        assert!(store.warped(id).unwrap().is_none());

        store.store_warped(id, &solid(8, 6, 20)).unwrap();
        assert_eq!(store.current(id).unwrap().to_rgba8(), solid(8, 6, 20).to_rgba8());
        assert_eq!(store.original(id).unwrap().to_rgba8(), solid(4, 3, 10).to_rgba8());

        store.revert(id).unwrap();
        assert!(store.warped(id).unwrap().is_none());
        assert_eq!(store.current(id).unwrap().to_rgba8(), solid(4, 3, 10).to_rgba8());
    }

    #[test]
    fn memory_store_unknown_image() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.original(ImageId(0)),
            Err(StoreError::UnknownImage(ImageId(0)))
        ));
        assert!(matches!(
            store.store_warped(ImageId(1), &solid(1, 1, 0)),
            Err(StoreError::UnknownImage(ImageId(1)))
        ));
    }

    #[test]
    fn directory_store_archives_both() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), "flight").unwrap();
        let id = store.store_original(&solid(4, 3, 10)).unwrap();
        store.store_warped(id, &solid(8, 6, 20)).unwrap();

        assert!(store.original_path(id).is_file());
        assert!(store.warped_path(id).is_file());
        assert_eq!(store.original(id).unwrap().to_rgba8(), solid(4, 3, 10).to_rgba8());
        assert_eq!(store.current(id).unwrap().to_rgba8(), solid(8, 6, 20).to_rgba8());
        assert!(matches!(
            store.current(ImageId(7)),
            Err(StoreError::UnknownImage(ImageId(7)))
        ));

        store.revert(id).unwrap();
        assert!(!store.warped_path(id).exists());
        assert_eq!(store.current(id).unwrap().to_rgba8(), solid(4, 3, 10).to_rgba8());
        assert!(matches!(
            store.revert(ImageId(7)),
            Err(StoreError::UnknownImage(ImageId(7)))
        ));
    }

    #[test]
    fn directory_store_resumes_numbering() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = DirectoryStore::open(dir.path(), "flight").unwrap();
            store.store_original(&solid(2, 2, 1)).unwrap();
            let second = store.store_original(&solid(2, 2, 2)).unwrap();
            store.store_warped(second, &solid(3, 3, 3)).unwrap();
        }
        let store = DirectoryStore::open(dir.path(), "flight").unwrap();
        assert_eq!(store.store_original(&solid(2, 2, 3)).unwrap(), ImageId(3));

        let other = DirectoryStore::open(dir.path(), "other").unwrap();
        assert_eq!(other.store_original(&solid(2, 2, 3)).unwrap(), ImageId(1));
    }
}
