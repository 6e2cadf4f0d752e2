use image::{imageops, DynamicImage, RgbaImage};

/// An image handle a sprite animation can hold.
///
/// Transforms are pure: they return a new handle and leave `self` untouched.
/// Only the rotations swap width and height.
pub trait SpriteImage: Clone {
    fn dimensions(&self) -> (u32, u32);

    fn flip_horizontal(&self) -> Self;

    fn flip_vertical(&self) -> Self;

    fn rotate_clockwise(&self) -> Self;

    fn rotate_counterclockwise(&self) -> Self;
}

impl SpriteImage for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn flip_horizontal(&self) -> Self {
        self.fliph()
    }

    fn flip_vertical(&self) -> Self {
        self.flipv()
    }

    fn rotate_clockwise(&self) -> Self {
        self.rotate90()
    }

    fn rotate_counterclockwise(&self) -> Self {
        self.rotate270()
    }
}

impl SpriteImage for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn flip_horizontal(&self) -> Self {
        imageops::flip_horizontal(self)
    }

    fn flip_vertical(&self) -> Self {
        imageops::flip_vertical(self)
    }

    fn rotate_clockwise(&self) -> Self {
        imageops::rotate90(self)
    }

    fn rotate_counterclockwise(&self) -> Self {
        imageops::rotate270(self)
    }
}
