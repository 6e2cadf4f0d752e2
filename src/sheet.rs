use crate::animation::FrameSequencer;
use crate::error::{SpriteError, SpriteResult};
use image::DynamicImage;
use log::debug;
use std::path::Path;

/// Grid geometry of a sprite sheet.
///
/// `margin` is the offset of the first frame from the top-left corner,
/// `spacing` the gap between neighbouring frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub frame_width: u32,
    pub frame_height: u32,
    pub margin: u32,
    pub spacing: u32,
    pub max_frames: Option<usize>,
}

impl SheetLayout {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            margin: 0,
            spacing: 0,
            max_frames: None,
        }
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_max_frames(mut self, count: usize) -> Self {
        self.max_frames = Some(count);
        self
    }

    fn cells(&self, extent: u32, frame: u32) -> u32 {
        let usable = extent.saturating_sub(self.margin);
        if usable < frame {
            return 0;
        }
        1 + (usable - frame) / frame.saturating_add(self.spacing)
    }
}

/// A single image holding animation frames on a regular grid, read row by row.
pub struct SpriteSheet {
    image: DynamicImage,
    layout: SheetLayout,
    columns: u32,
    rows: u32,
}

impl SpriteSheet {
    pub fn new(image: DynamicImage, layout: SheetLayout) -> SpriteResult<Self> {
        if layout.frame_width == 0 || layout.frame_height == 0 {
            return Err(SpriteError::InvalidSheet(format!(
                "Frame size {}x{} is empty",
                layout.frame_width, layout.frame_height
            )));
        }

        let columns = layout.cells(image.width(), layout.frame_width);
        let rows = layout.cells(image.height(), layout.frame_height);
        if columns == 0 || rows == 0 {
            return Err(SpriteError::InvalidSheet(format!(
                "{}x{} sheet has no room for {}x{} frames",
                image.width(),
                image.height(),
                layout.frame_width,
                layout.frame_height
            )));
        }

        debug!(
            "Sprite sheet {}x{}: {} columns, {} rows",
            image.width(),
            image.height(),
            columns,
            rows
        );

        Ok(Self {
            image,
            layout,
            columns,
            rows,
        })
    }

    pub fn open<P: AsRef<Path>>(path: P, layout: SheetLayout) -> SpriteResult<Self> {
        let image = image::open(path)?;
        Self::new(image, layout)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn frame_count(&self) -> usize {
        let cells = self.columns as usize * self.rows as usize;
        match self.layout.max_frames {
            Some(max) => cells.min(max),
            None => cells,
        }
    }

    /// Top-left corner of frame `index` inside the sheet.
    pub fn frame_origin(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.frame_count() {
            return None;
        }
        let column = (index % self.columns as usize) as u32;
        let row = (index / self.columns as usize) as u32;
        // a saturated stride only ever meets column/row 0
        let stride_x = self.layout.frame_width.saturating_add(self.layout.spacing);
        let stride_y = self.layout.frame_height.saturating_add(self.layout.spacing);
        Some((
            self.layout.margin + column * stride_x,
            self.layout.margin + row * stride_y,
        ))
    }

    pub fn frame(&self, index: usize) -> Option<DynamicImage> {
        let (x, y) = self.frame_origin(index)?;
        Some(
            self.image
                .crop_imm(x, y, self.layout.frame_width, self.layout.frame_height),
        )
    }

    pub fn frames(&self) -> Vec<DynamicImage> {
        (0..self.frame_count())
            .filter_map(|i| self.frame(i))
            .collect()
    }

    /// Every frame in sheet order, each shown for `duration_ms`.
    pub fn into_sequencer(self, duration_ms: u32) -> SpriteResult<FrameSequencer<DynamicImage>> {
        let durations = vec![duration_ms; self.frame_count()];
        self.into_sequencer_with(&durations)
    }

    pub fn into_sequencer_with(
        self,
        durations: &[u32],
    ) -> SpriteResult<FrameSequencer<DynamicImage>> {
        if durations.len() != self.frame_count() {
            return Err(SpriteError::InvalidSheet(format!(
                "{} durations given for {} frames",
                durations.len(),
                self.frame_count()
            )));
        }

        let mut sequencer = FrameSequencer::new();
        for (image, &duration) in self.frames().into_iter().zip(durations) {
            sequencer.add_frame(image, duration)?;
        }
        Ok(sequencer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// 4x2 grid of 8x8 cells, each filled with its own index in the red channel.
    fn numbered_sheet(margin: u32, spacing: u32) -> DynamicImage {
        let cell = 8 + spacing;
        let width = margin + 4 * cell - spacing;
        let height = margin + 2 * cell - spacing;
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            if x < margin || y < margin {
                return Rgba([255, 255, 255, 255]);
            }
            let (cx, cy) = ((x - margin) / cell, (y - margin) / cell);
            Rgba([(cy * 4 + cx) as u8, 0, 0, 255])
        }))
    }

    fn red_at(image: &DynamicImage, x: u32, y: u32) -> u8 {
        image.to_rgba8().get_pixel(x, y)[0]
    }

    #[test]
    fn test_grid_slicing() {
        let sheet = SpriteSheet::new(numbered_sheet(0, 0), SheetLayout::new(8, 8)).unwrap();
        assert_eq!((sheet.columns(), sheet.rows()), (4, 2));
        assert_eq!(sheet.frame_count(), 8);

        let frames = sheet.frames();
        assert_eq!(frames.len(), 8);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!((frame.width(), frame.height()), (8, 8));
            assert_eq!(red_at(frame, 0, 0) as usize, i);
            assert_eq!(red_at(frame, 7, 7) as usize, i);
        }
    }

    #[test]
    fn test_margin_and_spacing() {
        let layout = SheetLayout::new(8, 8).with_margin(3).with_spacing(2);
        let sheet = SpriteSheet::new(numbered_sheet(3, 2), layout).unwrap();

        assert_eq!(sheet.frame_count(), 8);
        assert_eq!(sheet.frame_origin(0), Some((3, 3)));
        assert_eq!(sheet.frame_origin(5), Some((13, 13)));
        assert_eq!(red_at(&sheet.frame(6).unwrap(), 0, 0), 6);
        assert_eq!(sheet.frame_origin(8), None);
    }

    #[test]
    fn test_max_frames() {
        let layout = SheetLayout::new(8, 8).with_max_frames(5);
        let sheet = SpriteSheet::new(numbered_sheet(0, 0), layout).unwrap();
        assert_eq!(sheet.frame_count(), 5);
        assert!(sheet.frame(5).is_none());
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(matches!(
            SpriteSheet::new(numbered_sheet(0, 0), SheetLayout::new(0, 8)),
            Err(SpriteError::InvalidSheet(_))
        ));
        assert!(matches!(
            SpriteSheet::new(numbered_sheet(0, 0), SheetLayout::new(64, 8)),
            Err(SpriteError::InvalidSheet(_))
        ));
    }

    #[test]
    fn test_huge_spacing_and_margin() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(16, 16));

        let layout = SheetLayout::new(8, 8).with_spacing(u32::MAX);
        let sheet = SpriteSheet::new(image.clone(), layout).unwrap();
        assert_eq!(sheet.frame_count(), 1);
        assert_eq!(sheet.frame_origin(0), Some((0, 0)));
        assert_eq!(sheet.frames().len(), 1);

        assert!(matches!(
            SpriteSheet::new(image, SheetLayout::new(8, 8).with_margin(u32::MAX)),
            Err(SpriteError::InvalidSheet(_))
        ));
    }

    #[test]
    fn test_into_sequencer() {
        let sheet = SpriteSheet::new(numbered_sheet(0, 0), SheetLayout::new(8, 8)).unwrap();
        let mut seq = sheet.into_sequencer(50).unwrap();

        assert_eq!(seq.frame_count(), 8);
        assert_eq!(seq.dimensions(), (8, 8));
        assert_eq!(seq.total_duration_ms(), 400);

        seq.advance(175).unwrap();
        assert_eq!(red_at(&seq.current_image().unwrap(), 0, 0), 3);
    }

    #[test]
    fn test_into_sequencer_with_durations() {
        let layout = SheetLayout::new(8, 8).with_max_frames(3);
        let sheet = SpriteSheet::new(numbered_sheet(0, 0), layout).unwrap();
        assert!(matches!(
            SpriteSheet::new(numbered_sheet(0, 0), layout)
                .unwrap()
                .into_sequencer_with(&[10, 20]),
            Err(SpriteError::InvalidSheet(_))
        ));

        let seq = sheet.into_sequencer_with(&[10, 20, 30]).unwrap();
        let durations: Vec<u32> = seq.frames().iter().map(|f| f.duration_ms).collect();
        assert_eq!(durations, vec![10, 20, 30]);
    }

    #[test]
    fn test_zero_duration_propagates() {
        let sheet = SpriteSheet::new(numbered_sheet(0, 0), SheetLayout::new(8, 8)).unwrap();
        assert!(matches!(
            sheet.into_sequencer(0),
            Err(SpriteError::InvalidDuration(0))
        ));
    }
}
