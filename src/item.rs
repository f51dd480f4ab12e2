use crate::rect::{HasRect, Rectangle};

/// A bounding rectangle paired with an opaque payload.
///
/// The tree never interprets `data`; it is stored, returned by [`crate::Tree::search`]
/// and [`crate::Tree::all`], and moved back out on a successful [`crate::Tree::remove`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item<T> {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub data: T,
}

impl<T> Item<T> {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64, data: T) -> Self {
        Item {
            min_x,
            min_y,
            max_x,
            max_y,
            data,
        }
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl<T> HasRect for Item<T> {
    fn rect(&self) -> Rectangle {
        Item::rect(self)
    }
}
