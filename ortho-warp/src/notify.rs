use crate::ImageId;
use log::*;
use std::sync::Arc;

/// The availability of one representation of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageStatus {
    /// The unmodified photograph has been stored.
    OriginalAvailable,
    /// The orthocorrected photograph has been stored.
    WarpAvailable,
    /// The photograph could not be orthocorrected. The original remains usable.
    WarpUnavailable,
}

/// Receives status changes of images.
pub trait Notifier {
    fn notify(&self, image: ImageId, status: ImageStatus);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, image: ImageId, status: ImageStatus) {
        (**self).notify(image, status)
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, image: ImageId, status: ImageStatus) {
        (**self).notify(image, status)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, image: ImageId, status: ImageStatus) {
        (**self).notify(image, status)
    }
}

/// Writes every status change to the log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, image: ImageId, status: ImageStatus) {
        match status {
            ImageStatus::WarpUnavailable => warn!("image {}: warp unavailable", image),
            _ => info!("image {}: {:?}", image, status),
        }
    }
}
