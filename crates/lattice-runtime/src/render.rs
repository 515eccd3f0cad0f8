//! Per-frame pipeline.

use std::time::Instant;

use lattice_core::{Canvas, ElementRef, Error, Point, Rect, UiContext};

/// Runs the three layout/paint phases in strict order every frame: measure
/// completes for the whole tree before arrange starts, arrange before render.
/// Overlays paint after the page, the modal popup last. Frame context is
/// logged up front so a panic inside the frame lands next to it in the log.
pub struct RenderService {
    ctx: UiContext,
    root: Option<ElementRef>,
    frame: u64,
}

impl RenderService {
    pub fn new(ctx: UiContext) -> Self {
        RenderService {
            ctx,
            root: None,
            frame: 0,
        }
    }

    pub fn set_root(&mut self, root: ElementRef) {
        self.root = Some(root);
    }

    /// Dispose the current root and remove it.
    pub fn clear_root(&mut self) {
        if let Some(root) = self.root.take() {
            root.borrow_mut().dispose();
        }
    }

    pub fn root(&self) -> Option<ElementRef> {
        self.root.clone()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn render_frame(&mut self, canvas: &mut dyn Canvas) -> Result<(), Error> {
        let root = self.root.clone().ok_or(Error::MissingRoot)?;
        let window = self.ctx.platform.window_size();
        self.frame += 1;
        log::debug!(
            "frame {} begin ({} x {})",
            self.frame,
            window.width,
            window.height
        );

        // Owners may have closed their overlays since the last frame.
        self.ctx.overlays.borrow_mut().prune_closed();

        let start = Instant::now();
        root.borrow_mut().measure(window, false);
        let measured = Instant::now();
        root.borrow_mut()
            .arrange(Rect::from_origin_size(Point::ZERO, window));
        let arranged = Instant::now();
        root.borrow_mut().render(canvas);
        self.ctx.overlays.borrow_mut().render(canvas, window);
        let rendered = Instant::now();

        log::debug!(
            "frame {} done: measure {:?}, arrange {:?}, render {:?}",
            self.frame,
            measured - start,
            arranged - measured,
            rendered - arranged
        );
        Ok(())
    }
}
