use crate::render::RenderContext;
use std::ops::{Deref, DerefMut};

/// Viewport into the world. Drawing through [`apply_offset`](Camera::apply_offset)
/// moves world coordinates into screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn apply_offset<C: RenderContext>(&self, ctx: &mut C) {
        let (dx, dy) = self.pixel_offset();
        ctx.translate(dx.saturating_neg(), dy.saturating_neg());
    }

    /// Runs `draw` with the camera offset cancelled, e.g. for HUD elements.
    ///
    /// The context is restored even if `draw` panics.
    pub fn draw_absolute<C, R, F>(&self, ctx: &mut C, draw: F) -> R
    where
        C: RenderContext,
        F: FnOnce(&mut C) -> R,
    {
        ctx.save();
        let mut scope = RestoreOnDrop(ctx);
        let (dx, dy) = self.pixel_offset();
        scope.translate(dx, dy);
        draw(&mut *scope)
    }

    pub fn center_on(&mut self, x: f32, y: f32) {
        self.x = x - self.width / 2.0;
        self.y = y - self.height / 2.0;
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Whole-pixel position. NaN maps to 0 and anything beyond the `i64`
    /// range saturates at its ends.
    fn pixel_offset(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

struct RestoreOnDrop<'a, C: RenderContext>(&'a mut C);

impl<C: RenderContext> Deref for RestoreOnDrop<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.0
    }
}

impl<C: RenderContext> DerefMut for RestoreOnDrop<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.0
    }
}

impl<C: RenderContext> Drop for RestoreOnDrop<'_, C> {
    fn drop(&mut self) {
        self.0.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[derive(Debug, Default, PartialEq)]
    struct Context {
        offset: (i64, i64),
        saved: Vec<(i64, i64)>,
        log: Vec<String>,
    }

    impl RenderContext for Context {
        fn save(&mut self) {
            self.saved.push(self.offset);
            self.log.push("save".into());
        }

        fn restore(&mut self) {
            self.offset = self.saved.pop().unwrap_or_default();
            self.log.push("restore".into());
        }

        fn translate(&mut self, dx: i64, dy: i64) {
            self.offset.0 += dx;
            self.offset.1 += dy;
            self.log.push(format!("translate {} {}", dx, dy));
        }
    }

    #[test]
    fn test_apply_offset_floors() {
        let camera = Camera::new(10.7, -3.2, 320.0, 240.0);
        let mut ctx = Context::default();
        camera.apply_offset(&mut ctx);
        assert_eq!(ctx.offset, (-10, 4));
    }

    #[test]
    fn test_apply_offset_beyond_i32() {
        let camera = Camera::new(3.0e9, -3.0e9, 320.0, 240.0);
        let mut ctx = Context::default();
        camera.apply_offset(&mut ctx);
        assert_eq!(ctx.offset, (-3_000_000_000, 3_000_000_000));

        let far = Camera::new(-f32::MAX, 0.0, 320.0, 240.0);
        let mut ctx = Context::default();
        far.apply_offset(&mut ctx);
        assert_eq!(ctx.offset, (i64::MAX, 0));
    }

    #[test]
    fn test_nan_position_is_origin() {
        let camera = Camera::new(f32::NAN, 2.5, 320.0, 240.0);
        let mut ctx = Context::default();
        camera.apply_offset(&mut ctx);
        assert_eq!(ctx.offset, (0, -2));

        let seen = camera.draw_absolute(&mut ctx, |ctx| ctx.offset);
        assert_eq!(seen, (0, 0));
        assert_eq!(ctx.offset, (0, -2));
    }

    #[test]
    fn test_draw_absolute_cancels_offset() {
        let camera = Camera::new(10.7, -3.2, 320.0, 240.0);
        let mut ctx = Context::default();
        camera.apply_offset(&mut ctx);

        let seen = camera.draw_absolute(&mut ctx, |ctx| ctx.offset);

        assert_eq!(seen, (0, 0));
        assert_eq!(ctx.offset, (-10, 4));
        assert_eq!(
            ctx.log,
            vec!["translate -10 4", "save", "translate 10 -4", "restore"]
        );
    }

    #[test]
    fn test_draw_absolute_restores_on_panic() {
        let camera = Camera::new(5.0, 5.0, 10.0, 10.0);
        let mut ctx = Context::default();

        let result = catch_unwind(AssertUnwindSafe(|| {
            camera.draw_absolute(&mut ctx, |_| panic!("draw failed"));
        }));

        assert!(result.is_err());
        assert_eq!(ctx.offset, (0, 0));
        assert_eq!(ctx.log.last().map(String::as_str), Some("restore"));
    }

    #[test]
    fn test_center_on_and_contains() {
        let mut camera = Camera::new(0.0, 0.0, 100.0, 50.0);
        camera.center_on(200.0, 100.0);
        assert_eq!((camera.x, camera.y), (150.0, 75.0));
        assert!(camera.contains(150.0, 75.0));
        assert!(camera.contains(249.0, 124.0));
        assert!(!camera.contains(250.0, 100.0));
    }
}
