use estatevision_graph::{Color, Vec2, Viewport};

/// Immediate-mode 2-D drawing target.
///
/// `clear` works in screen space. Every other call takes graph-space coordinates and
/// lengths, which the surface maps through the viewport given to `set_transform`.
pub trait DrawSurface {
    /// Pixel size as `(width, height)`.
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, background: Color);

    fn set_transform(&mut self, viewport: &Viewport);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// The stroke straddles the circle outline.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);

    /// Draw `text` horizontally centered on `anchor.x` with its alphabetic baseline at
    /// `anchor.y`.
    fn fill_text(&mut self, text: &str, anchor: Vec2, size: f32, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    SetTransform(Viewport),
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Triangle {
        points: [Vec2; 3],
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        width: f32,
    },
    Text {
        text: String,
        anchor: Vec2,
        size: f32,
        color: Color,
    },
}

/// Surface that records draw calls instead of producing pixels.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }
}

impl DrawSurface for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, background: Color) {
        // A clear starts a new frame.
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(background));
    }

    fn set_transform(&mut self, viewport: &Viewport) {
        self.commands.push(DrawCommand::SetTransform(*viewport));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color) {
        self.commands.push(DrawCommand::Triangle { points, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            width,
        });
    }

    fn fill_text(&mut self, text: &str, anchor: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
            size,
            color,
        });
    }
}
