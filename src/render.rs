use image::{imageops, DynamicImage, Rgba, RgbaImage};

/// Something that can put an image on screen.
pub trait Renderer<I> {
    fn draw_image(&mut self, image: &I, x: i32, y: i32);
}

/// Transform state of a drawing surface.
///
/// `save` pushes the current translation, `restore` pops it back.
pub trait RenderContext {
    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: i64, dy: i64);
}

/// Software canvas that composites images onto an RGBA buffer.
pub struct Canvas {
    target: RgbaImage,
    offset: (i64, i64),
    saved: Vec<(i64, i64)>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, [0, 0, 0, 0])
    }

    pub fn with_background(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            target: RgbaImage::from_pixel(width, height, Rgba(color)),
            offset: (0, 0),
            saved: Vec::new(),
        }
    }

    pub fn offset(&self) -> (i64, i64) {
        self.offset
    }

    pub fn image(&self) -> &RgbaImage {
        &self.target
    }

    pub fn into_image(self) -> RgbaImage {
        self.target
    }

    fn position(&self, x: i32, y: i32) -> (i64, i64) {
        (i64::from(x) + self.offset.0, i64::from(y) + self.offset.1)
    }
}

impl Renderer<RgbaImage> for Canvas {
    fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32) {
        let (x, y) = self.position(x, y);
        imageops::overlay(&mut self.target, image, x, y);
    }
}

impl Renderer<DynamicImage> for Canvas {
    fn draw_image(&mut self, image: &DynamicImage, x: i32, y: i32) {
        let (x, y) = self.position(x, y);
        imageops::overlay(&mut self.target, &image.to_rgba8(), x, y);
    }
}

impl RenderContext for Canvas {
    fn save(&mut self) {
        self.saved.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.saved.pop() {
            self.offset = offset;
        }
    }

    fn translate(&mut self, dx: i64, dy: i64) {
        self.offset.0 = self.offset.0.saturating_add(dx);
        self.offset.1 = self.offset.1.saturating_add(dy);
    }
}
