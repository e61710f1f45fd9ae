#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The four corners of a quadrilateral, stored in the winding order of an image.
///
/// Converting to and from arrays always uses the order
/// `[top_left, top_right, bottom_right, bottom_left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Corners<T> {
    pub top_left: T,
    pub top_right: T,
    pub bottom_right: T,
    pub bottom_left: T,
}

impl<T> Corners<T> {
    pub fn new(top_left: T, top_right: T, bottom_right: T, bottom_left: T) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    pub fn into_array(self) -> [T; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Corners<U> {
        Corners {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }

    /// Iterates over references to the corners in winding order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        [
            &self.top_left,
            &self.top_right,
            &self.bottom_right,
            &self.bottom_left,
        ]
        .into_iter()
    }
}

impl<T> From<[T; 4]> for Corners<T> {
    fn from([top_left, top_right, bottom_right, bottom_left]: [T; 4]) -> Self {
        Self::new(top_left, top_right, bottom_right, bottom_left)
    }
}

impl<T> From<Corners<T>> for [T; 4] {
    fn from(corners: Corners<T>) -> Self {
        corners.into_array()
    }
}
