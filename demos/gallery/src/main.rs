//! Headless gallery: builds a page out of every container, runs frames
//! against the recording canvas, and drives a scroll gesture plus the
//! toolbar overflow menu through the input service.

use anyhow::Result;

use lattice_core::{
    Color, Element, ElementRef, Margin, Point, RecordedCanvas, Size, UiContext,
};
use lattice_runtime::{InputService, RenderService};
use lattice_ui::{
    Border, Grid, Label, ScrollView, Stack, ToolButton, Toolbar, ToolbarGroup, Track,
};

const WINDOW: Size = Size {
    width: 420.0,
    height: 600.0,
};

fn build_page() -> ElementRef {
    let page = Stack::vertical();

    let toolbar = Toolbar::new();
    for buttons in [3, 2, 4, 3] {
        let group = ToolbarGroup::new();
        for _ in 0..buttons {
            let button = ToolButton::new();
            button.borrow_mut().set_toggleable(true);
            group.borrow_mut().add_button(button);
        }
        toolbar.borrow_mut().add_group(group);
    }
    page.borrow_mut().add_child(toolbar);

    let grid = Grid::new();
    grid.borrow_mut().set_columns(vec![
        Track::absolute(120.0),
        Track::star(1.0),
        Track::star(2.0),
    ]);
    grid.borrow_mut().set_rows(vec![Track::auto(), Track::auto()]);
    for row in 0..2 {
        for col in 0..3 {
            let cell = Label::new(format!("cell {row},{col}"));
            cell.borrow_mut().set_color(Color::from_hex("#d8d8e0"));
            cell.borrow_mut().base_mut().set_margin(Margin::uniform(8.0));
            grid.borrow_mut().add_child(cell, col, row);
        }
    }
    let framed = Border::new();
    framed.borrow_mut().set_stroke(Color::from_hex("#5a5a66"), 2.0);
    framed.borrow_mut().set_fill(Color::from_hex("#26262c"));
    framed.borrow_mut().set_corner_radius(8.0);
    framed.borrow_mut().base_mut().set_margin(Margin::uniform(12.0));
    framed.borrow_mut().set_child(grid);
    page.borrow_mut().add_child(framed);

    let feed = Stack::vertical();
    for i in 0..40 {
        let line = Label::new(format!("item {i:02}"));
        line.borrow_mut().base_mut().set_margin(Margin::new(12.0, 4.0, 12.0, 4.0));
        feed.borrow_mut().add_child(line);
    }
    let scroll = ScrollView::new();
    scroll.borrow_mut().set_corner_radius(6.0);
    scroll.borrow_mut().set_content(feed);
    scroll
        .borrow_mut()
        .base_mut()
        .set_desired_size(Some(Size::new(396.0, 260.0)));
    scroll.borrow_mut().base_mut().set_margin(Margin::uniform(12.0));
    page.borrow_mut().add_child(scroll.clone());

    page
}

fn main() -> Result<()> {
    env_logger::init();

    let ctx = UiContext::headless(WINDOW);
    let page = build_page();

    let mut renderer = RenderService::new(ctx.clone());
    renderer.set_root(page.clone());
    let mut input = InputService::new(ctx.clone());
    input.set_root(page);

    let mut canvas = RecordedCanvas::new();
    renderer.render_frame(&mut canvas)?;
    log::info!("frame 1: {} display items", canvas.items.len());

    // Drag upward over the feed: three moves, one capture.
    input.pointer_down(Point::new(210.0, 380.0));
    input.pointer_move(Point::new(210.0, 340.0));
    input.pointer_move(Point::new(210.0, 300.0));
    input.pointer_move(Point::new(210.0, 260.0));
    input.pointer_up(Point::new(210.0, 260.0));

    canvas.clear();
    renderer.render_frame(&mut canvas)?;
    log::info!("frame 2 (scrolled): {} display items", canvas.items.len());

    // A narrow window forces toolbar overflow; open the menu.
    // The headless platform keeps its size, so shrink by replacing context.
    let narrow = UiContext::headless(Size::new(240.0, 600.0));
    let page = build_page();
    let mut renderer = RenderService::new(narrow.clone());
    renderer.set_root(page.clone());
    let mut input = InputService::new(narrow);
    input.set_root(page);

    canvas.clear();
    renderer.render_frame(&mut canvas)?;

    // Press the overflow button at the bar's right edge.
    input.pointer_down(Point::new(230.0, 24.0));
    input.pointer_up(Point::new(230.0, 24.0));

    canvas.clear();
    renderer.render_frame(&mut canvas)?;
    log::info!(
        "frame with overflow menu: {} display items over {} frames total",
        canvas.items.len(),
        renderer.frame_count()
    );

    Ok(())
}
