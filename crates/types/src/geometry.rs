#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Scales this size down uniformly so it fits inside `bounds`.
    /// Never scales up.
    pub fn fit_within(&self, bounds: Size) -> Size {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Size::zero();
        }
        let scale = (bounds.width / self.width)
            .min(bounds.height / self.height)
            .min(1.0);
        Size::new(self.width * scale, self.height * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_within_preserves_ratio() {
        let fitted = Size::new(1000.0, 500.0).fit_within(Size::new(400.0, 360.0));
        assert!((fitted.width - 400.0).abs() < 0.001);
        assert!((fitted.aspect_ratio() - 2.0).abs() < 0.001);
    }

    #[test]
    fn fit_within_never_upscales() {
        let fitted = Size::new(100.0, 50.0).fit_within(Size::new(400.0, 360.0));
        assert_eq!(fitted, Size::new(100.0, 50.0));
    }

    #[test]
    fn tall_images_are_height_bound() {
        let fitted = Size::new(300.0, 3000.0).fit_within(Size::new(400.0, 360.0));
        assert!((fitted.height - 360.0).abs() < 0.001);
        assert!((fitted.width - 36.0).abs() < 0.001);
    }
}
