use std::sync::Arc;

use crate::debug::{DebugLogger, json_escape};
use crate::error::PageplanError;
use crate::float_map::{Bounds, FloatMarginMap, Side};
use crate::surface::Surface;
use crate::types::{Mm, Orientation, PageFormat};
use crate::units::to_mm;

/// Bottom margin applied when a margin spec leaves it out, in mm.
const FALLBACK_BOTTOM_MM: i32 = 8;

/// Per-page background: optional margin insets added on top of the
/// default margins, an optional fill color and an optional image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Background {
    pub left: Mm,
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub color: Option<crate::types::Color>,
    pub image: Option<BackgroundImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub path: String,
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
}

/// Default page margins, as raw length expressions fed through the unit
/// converter. `All` applies one magnitude to left, top and right; the
/// bottom falls back to [`FALLBACK_BOTTOM_MM`]. In `Edges`, a missing
/// right reuses the left value and a missing bottom uses the fallback.
#[derive(Debug, Clone, Copy)]
pub enum MarginSpec<'a> {
    All(&'a str),
    Edges {
        left: &'a str,
        top: &'a str,
        right: Option<&'a str>,
        bottom: Option<&'a str>,
    },
}

/// Options for [`Pager::add_new_page`]. `Default` matches a bare
/// "new page please" call: no overrides, numbering untouched, a real
/// (drawn) page.
#[derive(Debug, Clone, Default)]
pub struct NewPageOptions {
    pub format: Option<PageFormat>,
    pub orientation: Option<Orientation>,
    pub background: Option<Background>,
    pub reset_page_number: bool,
    pub skip_decorations: bool,
}

/// One frame of the margin state stack: the surface margins and the
/// float map as they were when a nested layout scope was entered.
/// Always restored as a unit.
#[derive(Debug, Clone)]
struct SavedState {
    left: Mm,
    top: Mm,
    right: Mm,
    bands: FloatMarginMap,
}

/// Full snapshot of the current margin registers plus the float map,
/// for callers that park and later resume an entire layout context.
#[derive(Debug, Clone)]
pub struct MarginSnapshot {
    pub left: Mm,
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub bands: FloatMarginMap,
}

pub type PageHook<S> = Box<dyn FnMut(&mut S, u32)>;

/// Owns the page lifecycle and the usable-area bookkeeping of one
/// document render: page counter, margin registers derived from
/// defaults plus background insets, the float exclusion-band map and
/// the save/restore stack for nested layout scopes.
///
/// Exclusively owned by a single layout pass; concurrent renders each
/// instantiate their own `Pager`.
pub struct Pager<S: Surface> {
    surface: S,
    page: u32,
    first_page: bool,
    orientation: Orientation,
    format: PageFormat,
    default_left: Mm,
    default_top: Mm,
    default_right: Mm,
    default_bottom: Mm,
    margin_left: Mm,
    margin_top: Mm,
    margin_right: Mm,
    margin_bottom: Mm,
    states: Vec<SavedState>,
    bands: FloatMarginMap,
    background: Option<Background>,
    paragraph: Option<(Mm, Mm)>,
    header_hook: Option<PageHook<S>>,
    footer_hook: Option<PageHook<S>>,
    debug: Option<Arc<DebugLogger>>,
}

impl<S: Surface> Pager<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            page: 0,
            first_page: true,
            orientation: Orientation::Portrait,
            format: PageFormat::A4,
            default_left: Mm::ZERO,
            default_top: Mm::ZERO,
            default_right: Mm::ZERO,
            default_bottom: Mm::ZERO,
            margin_left: Mm::ZERO,
            margin_top: Mm::ZERO,
            margin_right: Mm::ZERO,
            margin_bottom: Mm::ZERO,
            states: Vec::new(),
            bands: FloatMarginMap::default(),
            background: None,
            paragraph: None,
            header_hook: None,
            footer_hook: None,
            debug: None,
        }
    }

    /// Reset for a fresh document render: page counter back to zero,
    /// first-page flag raised, state stack cleared.
    pub fn init(&mut self, orientation: Orientation, format: PageFormat) {
        self.first_page = true;
        self.page = 0;
        self.orientation = orientation;
        self.format = format;
        self.states.clear();
    }

    pub fn attach_debug(&mut self, logger: Arc<DebugLogger>) {
        self.debug = Some(logger);
    }

    pub fn set_header_hook(&mut self, hook: PageHook<S>) {
        self.header_hook = Some(hook);
    }

    pub fn set_footer_hook(&mut self, hook: PageHook<S>) {
        self.footer_hook = Some(hook);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn format(&self) -> PageFormat {
        self.format
    }

    pub fn is_first_page(&self) -> bool {
        self.first_page
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.page = page;
    }

    pub fn margin_left(&self) -> Mm {
        self.margin_left
    }

    pub fn margin_top(&self) -> Mm {
        self.margin_top
    }

    pub fn margin_right(&self) -> Mm {
        self.margin_right
    }

    pub fn margin_bottom(&self) -> Mm {
        self.margin_bottom
    }

    /// Default margins as (left, top, right, bottom).
    pub fn default_margins(&self) -> (Mm, Mm, Mm, Mm) {
        (
            self.default_left,
            self.default_top,
            self.default_right,
            self.default_bottom,
        )
    }

    /// Set the default page margins. Values are length expressions run
    /// through the unit converter; see [`MarginSpec`] for the fallback
    /// rules.
    pub fn set_default_margins(&mut self, spec: MarginSpec<'_>) -> Result<(), PageplanError> {
        let convert = |raw: &str| {
            to_mm(raw).ok_or_else(|| PageplanError::InvalidLength(raw.to_string()))
        };
        let fallback_bottom = Mm::from_i32(FALLBACK_BOTTOM_MM);
        match spec {
            MarginSpec::All(value) => {
                let value = convert(value)?;
                self.default_left = value;
                self.default_top = value;
                self.default_right = value;
                self.default_bottom = fallback_bottom;
            }
            MarginSpec::Edges {
                left,
                top,
                right,
                bottom,
            } => {
                self.default_left = convert(left)?;
                self.default_top = convert(top)?;
                self.default_right = match right {
                    Some(raw) => convert(raw)?,
                    None => self.default_left,
                };
                self.default_bottom = match bottom {
                    Some(raw) => convert(raw)?,
                    None => fallback_bottom,
                };
            }
        }
        Ok(())
    }

    pub fn set_background(&mut self, background: Option<Background>) {
        self.background = background;
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Paragraph-level horizontal override: when set, the next
    /// [`Pager::apply_margins`] seeds the top band from this pair
    /// instead of the page margins. Pass `None` to clear.
    pub fn set_paragraph_bounds(&mut self, bounds: Option<(Mm, Mm)>) {
        self.paragraph = bounds;
    }

    /// Recompute the active margin registers (defaults plus background
    /// insets), apply them to the surface and reseed the float map with
    /// the single top-of-page band.
    pub fn apply_margins(&mut self) {
        let (bg_left, bg_top, bg_right, bg_bottom) = match &self.background {
            Some(bg) => (bg.left, bg.top, bg.right, bg.bottom),
            None => (Mm::ZERO, Mm::ZERO, Mm::ZERO, Mm::ZERO),
        };

        self.margin_left = self.default_left + bg_left;
        self.margin_right = self.default_right + bg_right;
        self.margin_top = self.default_top + bg_top;
        self.margin_bottom = self.default_bottom + bg_bottom;

        self.surface
            .set_margins(self.margin_left, self.margin_top, self.margin_right);
        self.surface.set_auto_page_break(false, self.margin_bottom);

        self.bands.reset();
        let width = self.surface.page_width();
        match self.paragraph {
            Some((left, right)) => {
                self.bands.seed(self.margin_top, left, width - right);
            }
            None => {
                self.bands
                    .seed(self.margin_top, self.margin_left, width - self.margin_right);
            }
        }
    }

    /// Directly seed a band, overwriting any entry at the same row.
    pub fn seed_band(&mut self, y: Mm, left: Mm, right: Mm) {
        self.bands.seed(y, left, right);
    }

    fn surface_bounds(&self) -> Bounds {
        Bounds::new(
            self.surface.left_margin(),
            self.surface.page_width() - self.surface.right_margin(),
        )
    }

    /// Effective horizontal bounds a non-floated line may draw into at
    /// vertical position `y`.
    pub fn bounds_at(&self, y: Mm) -> Bounds {
        self.bands.lookup(y, self.surface_bounds())
    }

    /// Register a float occupying `[x_left, x_right]` from `y_top` to
    /// `y_bottom`; see [`FloatMarginMap::carve`] for the band algebra.
    pub fn carve_float(&mut self, side: Side, x_left: Mm, y_top: Mm, x_right: Mm, y_bottom: Mm) {
        let default = self.surface_bounds();
        self.bands
            .carve(side, x_left, y_top, x_right, y_bottom, default);
        if let Some(logger) = self.debug.as_deref() {
            logger.event(
                "pager.float_carved",
                &[
                    ("side", format!("\"{:?}\"", side)),
                    ("y_top_key", y_top.to_centi_i64().to_string()),
                    ("y_bottom_key", y_bottom.to_centi_i64().to_string()),
                    ("bands", self.bands.len().to_string()),
                ],
            );
        }
    }

    /// Enter a nested layout scope: snapshot the surface margins and
    /// the float map, apply the new margins, reseed a single band.
    pub fn push_state(&mut self, left: Mm, top: Mm, right: Mm) {
        self.states.push(SavedState {
            left: self.surface.left_margin(),
            top: self.surface.top_margin(),
            right: self.surface.right_margin(),
            bands: self.bands.clone(),
        });

        self.surface.set_margins(left, top, right);

        self.bands.reset();
        self.bands
            .seed(top, left, self.surface.page_width() - right);

        if let Some(logger) = self.debug.as_deref() {
            logger.event(
                "pager.state_pushed",
                &[("depth", self.states.len().to_string())],
            );
        }
    }

    /// Leave a nested layout scope, restoring margins and the float map
    /// atomically. Popping with an empty stack is safe: a default frame
    /// is synthesized from the stored page margins with top = 0.
    pub fn pop_state(&mut self) {
        let frame = match self.states.pop() {
            Some(frame) => frame,
            None => {
                if let Some(logger) = self.debug.as_deref() {
                    logger.event("pager.state_pop_empty", &[]);
                }
                let top = Mm::ZERO;
                let mut bands = FloatMarginMap::default();
                bands.seed(
                    top,
                    self.margin_left,
                    self.surface.page_width() - self.margin_right,
                );
                SavedState {
                    left: self.margin_left,
                    top,
                    right: self.margin_right,
                    bands,
                }
            }
        };

        self.surface.set_margins(frame.left, frame.top, frame.right);
        self.bands = frame.bands;
    }

    pub fn state_depth(&self) -> usize {
        self.states.len()
    }

    /// Snapshot the current margin registers plus the float map.
    pub fn current_margin(&self) -> MarginSnapshot {
        MarginSnapshot {
            left: self.margin_left,
            right: self.margin_right,
            top: self.margin_top,
            bottom: self.margin_bottom,
            bands: self.bands.clone(),
        }
    }

    /// Restore a snapshot taken with [`Pager::current_margin`].
    pub fn set_current_margin(&mut self, snapshot: MarginSnapshot) {
        self.margin_left = snapshot.left;
        self.margin_right = snapshot.right;
        self.margin_top = snapshot.top;
        self.margin_bottom = snapshot.bottom;
        self.bands = snapshot.bands;
    }

    /// Reset the registers to the defaults and drop every band.
    pub fn reset_current_margin(&mut self) {
        self.margin_left = self.default_left;
        self.margin_right = self.default_right;
        self.margin_top = self.default_top;
        self.margin_bottom = self.default_bottom;
        self.bands.reset();
    }

    /// Create a new physical page: apply overrides, reset the surface
    /// to the default margins, run the numbering-group hooks around
    /// page creation, bump the counter, draw background and page
    /// decorations, then recompute the active margins and park the
    /// cursor at the top margin.
    pub fn add_new_page(&mut self, options: NewPageOptions) {
        self.first_page = false;

        if let Some(format) = options.format {
            self.format = format;
        }
        if let Some(orientation) = options.orientation {
            self.orientation = orientation;
        }
        if let Some(background) = options.background {
            self.background = Some(background);
        }

        self.surface
            .set_margins(self.default_left, self.default_top, self.default_right);

        if options.reset_page_number {
            self.surface.begin_page_number_group();
        }

        self.surface.create_page(self.orientation, self.format);

        if options.reset_page_number {
            self.surface.begin_secondary_page_number_group();
        }

        self.page += 1;

        if !options.skip_decorations {
            self.draw_background();
            if let Some(hook) = self.header_hook.as_mut() {
                hook(&mut self.surface, self.page);
            }
            if let Some(hook) = self.footer_hook.as_mut() {
                hook(&mut self.surface, self.page);
            }
        }

        self.apply_margins();
        self.surface.set_cursor_y(self.margin_top);

        if let Some(logger) = self.debug.as_deref() {
            logger.event(
                "pager.page_created",
                &[
                    ("page", self.page.to_string()),
                    (
                        "orientation",
                        format!("\"{}\"", json_escape(&format!("{:?}", self.orientation))),
                    ),
                ],
            );
        }
    }

    /// Paint the page background: the fill color as a full-page
    /// rectangle first, then the image at its recorded position.
    /// Returns whether anything was drawn.
    pub fn draw_background(&mut self) -> bool {
        let Some(background) = &self.background else {
            return false;
        };

        let width = self.surface.page_width();
        let height = self.surface.page_height();
        let mut drew = false;
        if let Some(color) = background.color {
            self.surface.set_fill_color(color);
            self.surface.fill_rect(Mm::ZERO, Mm::ZERO, width, height);
            drew = true;
        }
        if let Some(image) = &background.image {
            self.surface
                .place_image(&image.path, image.x, image.y, image.width);
            drew = true;
        }
        drew
    }
}
