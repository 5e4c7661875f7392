use crate::types::{Color, Mm, Orientation, PageFormat, Size};

/// The drawing surface the pager drives: a PDF or graphics writer that
/// owns page creation, margin registers and the write cursor. All
/// values are millimetres. Single-writer; the pager calls it
/// synchronously and never shares it.
pub trait Surface {
    fn set_margins(&mut self, left: Mm, top: Mm, right: Mm);
    fn set_auto_page_break(&mut self, enabled: bool, bottom: Mm);
    fn page_width(&self) -> Mm;
    fn page_height(&self) -> Mm;
    fn left_margin(&self) -> Mm;
    fn top_margin(&self) -> Mm;
    fn right_margin(&self) -> Mm;
    fn set_cursor_y(&mut self, y: Mm);
    fn fill_rect(&mut self, x: Mm, y: Mm, width: Mm, height: Mm);
    fn set_fill_color(&mut self, color: Color);
    fn place_image(&mut self, path: &str, x: Mm, y: Mm, width: Mm);
    fn create_page(&mut self, orientation: Orientation, format: PageFormat);
    /// Start a new content-level page-numbering group, invoked before
    /// the page is created.
    fn begin_page_number_group(&mut self);
    /// Start the display-level numbering group, invoked after the page
    /// is created. A distinct counter from
    /// [`Surface::begin_page_number_group`]; the two are never
    /// conflated.
    fn begin_secondary_page_number_group(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    SetMargins {
        left: Mm,
        top: Mm,
        right: Mm,
    },
    SetAutoPageBreak {
        enabled: bool,
        bottom: Mm,
    },
    SetCursorY(Mm),
    FillRect {
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
    },
    SetFillColor(Color),
    PlaceImage {
        path: String,
        x: Mm,
        y: Mm,
        width: Mm,
    },
    CreatePage {
        orientation: Orientation,
        format: PageFormat,
    },
    BeginPageNumberGroup,
    BeginSecondaryPageNumberGroup,
}

/// Command-recording [`Surface`]: every call is appended to an ordered
/// log while live registers (page size, margins, cursor) keep the
/// getters answering. A later replay stage turns the log into actual
/// writer calls; tests assert directly on the recorded stream.
pub struct RecordingSurface {
    page_size: Size,
    margin_left: Mm,
    margin_top: Mm,
    margin_right: Mm,
    auto_break_bottom: Mm,
    auto_break_enabled: bool,
    cursor_y: Mm,
    fill_color: Color,
    page_count: usize,
    commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new(orientation: Orientation, format: PageFormat) -> Self {
        Self {
            page_size: format.size(orientation),
            margin_left: Mm::ZERO,
            margin_top: Mm::ZERO,
            margin_right: Mm::ZERO,
            auto_break_bottom: Mm::ZERO,
            auto_break_enabled: false,
            cursor_y: Mm::ZERO,
            fill_color: Color::BLACK,
            page_count: 0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn cursor_y(&self) -> Mm {
        self.cursor_y
    }

    pub fn auto_page_break(&self) -> (bool, Mm) {
        (self.auto_break_enabled, self.auto_break_bottom)
    }

    pub fn into_commands(self) -> Vec<SurfaceCommand> {
        self.commands
    }
}

impl Surface for RecordingSurface {
    fn set_margins(&mut self, left: Mm, top: Mm, right: Mm) {
        self.margin_left = left;
        self.margin_top = top;
        self.margin_right = right;
        self.commands
            .push(SurfaceCommand::SetMargins { left, top, right });
    }

    fn set_auto_page_break(&mut self, enabled: bool, bottom: Mm) {
        self.auto_break_enabled = enabled;
        self.auto_break_bottom = bottom;
        self.commands
            .push(SurfaceCommand::SetAutoPageBreak { enabled, bottom });
    }

    fn page_width(&self) -> Mm {
        self.page_size.width
    }

    fn page_height(&self) -> Mm {
        self.page_size.height
    }

    fn left_margin(&self) -> Mm {
        self.margin_left
    }

    fn top_margin(&self) -> Mm {
        self.margin_top
    }

    fn right_margin(&self) -> Mm {
        self.margin_right
    }

    fn set_cursor_y(&mut self, y: Mm) {
        self.cursor_y = y;
        self.commands.push(SurfaceCommand::SetCursorY(y));
    }

    fn fill_rect(&mut self, x: Mm, y: Mm, width: Mm, height: Mm) {
        self.commands.push(SurfaceCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.fill_color == color {
            return;
        }
        self.fill_color = color;
        self.commands.push(SurfaceCommand::SetFillColor(color));
    }

    fn place_image(&mut self, path: &str, x: Mm, y: Mm, width: Mm) {
        self.commands.push(SurfaceCommand::PlaceImage {
            path: path.to_string(),
            x,
            y,
            width,
        });
    }

    fn create_page(&mut self, orientation: Orientation, format: PageFormat) {
        self.page_size = format.size(orientation);
        self.cursor_y = Mm::ZERO;
        self.page_count += 1;
        self.commands.push(SurfaceCommand::CreatePage {
            orientation,
            format,
        });
    }

    fn begin_page_number_group(&mut self) {
        self.commands.push(SurfaceCommand::BeginPageNumberGroup);
    }

    fn begin_secondary_page_number_group(&mut self) {
        self.commands
            .push(SurfaceCommand::BeginSecondaryPageNumberGroup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_track_calls() {
        let mut surface = RecordingSurface::new(Orientation::Portrait, PageFormat::A4);
        assert_eq!(surface.page_width(), Mm::from_i32(210));
        assert_eq!(surface.page_height(), Mm::from_i32(297));

        surface.set_margins(Mm::from_i32(10), Mm::from_i32(12), Mm::from_i32(14));
        assert_eq!(surface.left_margin(), Mm::from_i32(10));
        assert_eq!(surface.top_margin(), Mm::from_i32(12));
        assert_eq!(surface.right_margin(), Mm::from_i32(14));

        surface.set_cursor_y(Mm::from_i32(50));
        assert_eq!(surface.cursor_y(), Mm::from_i32(50));
    }

    #[test]
    fn create_page_updates_geometry() {
        let mut surface = RecordingSurface::new(Orientation::Portrait, PageFormat::A4);
        surface.set_cursor_y(Mm::from_i32(100));
        surface.create_page(Orientation::Landscape, PageFormat::A4);
        assert_eq!(surface.page_width(), Mm::from_i32(297));
        assert_eq!(surface.cursor_y(), Mm::ZERO);
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn redundant_fill_color_is_not_recorded() {
        let mut surface = RecordingSurface::new(Orientation::Portrait, PageFormat::A4);
        surface.set_fill_color(Color::rgb(1.0, 0.0, 0.0));
        surface.set_fill_color(Color::rgb(1.0, 0.0, 0.0));
        let colors = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, SurfaceCommand::SetFillColor(_)))
            .count();
        assert_eq!(colors, 1);
    }
}
