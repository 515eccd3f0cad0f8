//! Track-based grid.
//!
//! Tracks come in three modes: `Absolute` (fixed pixels), `Star` (weighted
//! share of leftover space), and `Auto` (sized to content). Sizing runs in
//! two star passes: a provisional distribution so star-spanning children see
//! a realistic constraint, then a final distribution after auto tracks have
//! absorbed content sizes. A child spanning several auto tracks contributes
//! an even share of its size to each.

use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    Children, Element, ElementBase, ElementRef, Rect, Size, into_ref,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackMode {
    Absolute(f32),
    Star(f32),
    Auto,
}

#[derive(Clone, Copy, Debug)]
pub struct Track {
    mode: TrackMode,
    measured: f32,
}

impl Track {
    pub fn absolute(px: f32) -> Track {
        Track {
            mode: TrackMode::Absolute(px),
            measured: 0.0,
        }
    }

    pub fn star(weight: f32) -> Track {
        Track {
            mode: TrackMode::Star(weight),
            measured: 0.0,
        }
    }

    pub fn auto() -> Track {
        Track {
            mode: TrackMode::Auto,
            measured: 0.0,
        }
    }

    pub fn mode(&self) -> TrackMode {
        self.mode
    }

    /// Resolved extent, valid after the owning grid's measure pass.
    pub fn measured(&self) -> f32 {
        self.measured
    }
}

#[derive(Clone, Copy, Debug)]
struct CellPlacement {
    col: usize,
    row: usize,
    col_span: usize,
    row_span: usize,
}

pub struct Grid {
    base: ElementBase,
    children: Children,
    placements: Vec<CellPlacement>,
    columns: Vec<Track>,
    rows: Vec<Track>,
}

impl Grid {
    pub fn new() -> Rc<RefCell<Grid>> {
        into_ref(Grid {
            base: ElementBase::new(),
            children: Children::new(),
            placements: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
        })
    }

    pub fn set_columns(&mut self, tracks: Vec<Track>) {
        self.columns = tracks;
        self.base.invalidate_measure();
    }

    pub fn set_rows(&mut self, tracks: Vec<Track>) {
        self.rows = tracks;
        self.base.invalidate_measure();
    }

    /// Rebind one column to a fixed width. Out-of-range indices are ignored.
    pub fn set_column_width(&mut self, index: usize, px: f32) {
        if let Some(track) = self.columns.get_mut(index) {
            track.mode = TrackMode::Absolute(px);
            self.base.invalidate_measure();
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Resolved width of a column, valid after measure.
    pub fn column_width(&self, index: usize) -> f32 {
        self.columns.get(index).map_or(0.0, Track::measured)
    }

    /// Resolved height of a row, valid after measure.
    pub fn row_height(&self, index: usize) -> f32 {
        self.rows.get(index).map_or(0.0, Track::measured)
    }

    pub fn add_child(&mut self, child: ElementRef, col: usize, row: usize) {
        self.add_child_spanned(child, col, row, 1, 1);
    }

    pub fn add_child_spanned(
        &mut self,
        child: ElementRef,
        col: usize,
        row: usize,
        col_span: usize,
        row_span: usize,
    ) {
        self.placements.push(CellPlacement {
            col,
            row,
            col_span: col_span.max(1),
            row_span: row_span.max(1),
        });
        self.children.add(&mut self.base, child);
    }

    pub fn clear_children(&mut self) {
        self.placements.clear();
        self.children.clear(&mut self.base);
    }

    /// Track indices a placement actually covers, clamped to the track list.
    fn span(tracks: &[Track], start: usize, span: usize) -> std::ops::Range<usize> {
        let lo = start.min(tracks.len());
        let hi = (start + span).min(tracks.len());
        lo..hi
    }

    fn spanned_extent(tracks: &[Track], range: std::ops::Range<usize>) -> f32 {
        tracks[range].iter().map(|t| t.measured).sum()
    }

    /// Reset absolute tracks to their pixel size and everything else to zero.
    fn seed(tracks: &mut [Track]) {
        for track in tracks.iter_mut() {
            track.measured = match track.mode {
                TrackMode::Absolute(px) => px,
                _ => 0.0,
            };
        }
    }

    /// Split the space left after non-star tracks among star tracks by
    /// weight. Zero total weight leaves star tracks at zero.
    fn distribute_stars(tracks: &mut [Track], available: f32) {
        if !available.is_finite() {
            return;
        }
        let fixed: f32 = tracks
            .iter()
            .filter(|t| !matches!(t.mode, TrackMode::Star(_)))
            .map(|t| t.measured)
            .sum();
        let total_weight: f32 = tracks
            .iter()
            .filter_map(|t| match t.mode {
                TrackMode::Star(w) if w > 0.0 => Some(w),
                _ => None,
            })
            .sum();
        if total_weight <= 0.0 {
            return;
        }
        let remaining = (available - fixed).max(0.0);
        for track in tracks.iter_mut() {
            if let TrackMode::Star(w) = track.mode {
                track.measured = if w > 0.0 {
                    remaining * w / total_weight
                } else {
                    0.0
                };
            }
        }
    }
}

impl Element for Grid {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn children(&self) -> &[ElementRef] {
        self.children.as_slice()
    }

    fn is_layout_container(&self) -> bool {
        true
    }

    fn measure_content(&mut self, available: Size, dont_stretch: bool) -> Size {
        Self::seed(&mut self.columns);
        Self::seed(&mut self.rows);
        Self::distribute_stars(&mut self.columns, available.width);
        Self::distribute_stars(&mut self.rows, available.height);

        for (child, place) in self.children.iter().zip(&self.placements) {
            let cols = Self::span(&self.columns, place.col, place.col_span);
            let rows = Self::span(&self.rows, place.row, place.row_span);
            let spans_auto_col = self.columns[cols.clone()]
                .iter()
                .any(|t| t.mode == TrackMode::Auto);
            let spans_auto_row = self.rows[rows.clone()]
                .iter()
                .any(|t| t.mode == TrackMode::Auto);

            // Auto tracks absorb content: offer everything not claimed by
            // fixed tracks outside the span (star tracks yield; they are
            // redistributed afterwards), and suppress stretch so the child
            // reports its natural size instead of filling the offer.
            let fixed_outside = |tracks: &[Track], span: &std::ops::Range<usize>| -> f32 {
                tracks
                    .iter()
                    .enumerate()
                    .filter(|(i, t)| !span.contains(i) && !matches!(t.mode, TrackMode::Star(_)))
                    .map(|(_, t)| t.measured)
                    .sum()
            };
            let avail_w = if spans_auto_col {
                (available.width - fixed_outside(&self.columns, &cols)).max(0.0)
            } else {
                Self::spanned_extent(&self.columns, cols.clone())
            };
            let avail_h = if spans_auto_row {
                (available.height - fixed_outside(&self.rows, &rows)).max(0.0)
            } else {
                Self::spanned_extent(&self.rows, rows.clone())
            };

            let child_dont_stretch = dont_stretch || spans_auto_col || spans_auto_row;
            let outer = child
                .borrow_mut()
                .measure(Size::new(avail_w, avail_h), child_dont_stretch);

            if spans_auto_col {
                let auto_cols: Vec<usize> = cols
                    .clone()
                    .filter(|&i| self.columns[i].mode == TrackMode::Auto)
                    .collect();
                let fixed_part = Self::spanned_extent(&self.columns, cols.clone())
                    - auto_cols.iter().map(|&i| self.columns[i].measured).sum::<f32>();
                let share = ((outer.width - fixed_part) / auto_cols.len() as f32).max(0.0);
                for i in auto_cols {
                    self.columns[i].measured = self.columns[i].measured.max(share);
                }
            }
            if spans_auto_row {
                let auto_rows: Vec<usize> = rows
                    .clone()
                    .filter(|&i| self.rows[i].mode == TrackMode::Auto)
                    .collect();
                let fixed_part = Self::spanned_extent(&self.rows, rows.clone())
                    - auto_rows.iter().map(|&i| self.rows[i].measured).sum::<f32>();
                let share = ((outer.height - fixed_part) / auto_rows.len() as f32).max(0.0);
                for i in auto_rows {
                    self.rows[i].measured = self.rows[i].measured.max(share);
                }
            }
        }

        // Auto absorption changed the leftover; redistribute stars once more.
        Self::distribute_stars(&mut self.columns, available.width);
        Self::distribute_stars(&mut self.rows, available.height);

        Size::new(
            Self::spanned_extent(&self.columns, 0..self.columns.len()),
            Self::spanned_extent(&self.rows, 0..self.rows.len()),
        )
    }

    fn arrange_content(&mut self, content: Rect) {
        let col_offset = |tracks: &[Track], upto: usize| -> f32 {
            tracks[..upto].iter().map(|t| t.measured).sum()
        };
        for (child, place) in self.children.iter().zip(&self.placements) {
            let cols = Self::span(&self.columns, place.col, place.col_span);
            let rows = Self::span(&self.rows, place.row, place.row_span);
            let x = content.x + col_offset(&self.columns, cols.start);
            let y = content.y + col_offset(&self.rows, rows.start);
            let w = Self::spanned_extent(&self.columns, cols);
            let h = Self::spanned_extent(&self.rows, rows);
            child.borrow_mut().arrange(Rect::new(x, y, w, h));
        }
    }

    fn dispose_content(&mut self) {
        self.placements.clear();
        self.children.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::{HAlign, VAlign};

    fn fixed(w: f32, h: f32) -> ElementRef {
        let label = crate::Label::new("");
        label.borrow_mut().base_mut().set_desired_size(Some(Size::new(w, h)));
        label
    }

    fn start_aligned(grid: &Rc<RefCell<Grid>>) {
        grid.borrow_mut().base_mut().set_h_align(HAlign::Start);
        grid.borrow_mut().base_mut().set_v_align(VAlign::Start);
    }

    #[test]
    fn star_tracks_split_leftover_by_weight() {
        let grid = Grid::new();
        start_aligned(&grid);
        grid.borrow_mut().set_columns(vec![
            Track::absolute(50.0),
            Track::star(1.0),
            Track::star(2.0),
        ]);
        grid.borrow_mut().set_rows(vec![Track::absolute(40.0)]);

        grid.borrow_mut().measure(Size::new(350.0, 40.0), false);

        assert_eq!(grid.borrow().column_width(0), 50.0);
        assert_eq!(grid.borrow().column_width(1), 100.0);
        assert_eq!(grid.borrow().column_width(2), 200.0);
    }

    #[test]
    fn auto_column_adopts_content_width() {
        let grid = Grid::new();
        start_aligned(&grid);
        grid.borrow_mut()
            .set_columns(vec![Track::auto(), Track::star(1.0)]);
        grid.borrow_mut().set_rows(vec![Track::auto()]);
        grid.borrow_mut().add_child(fixed(80.0, 20.0), 0, 0);

        grid.borrow_mut().measure(Size::new(300.0, 100.0), false);

        assert_eq!(grid.borrow().column_width(0), 80.0);
        assert_eq!(grid.borrow().column_width(1), 220.0);
        assert_eq!(grid.borrow().row_height(0), 20.0);
    }

    #[test]
    fn multi_span_child_splits_evenly_across_auto_tracks() {
        let grid = Grid::new();
        start_aligned(&grid);
        grid.borrow_mut()
            .set_columns(vec![Track::auto(), Track::auto()]);
        grid.borrow_mut().set_rows(vec![Track::auto()]);
        grid.borrow_mut()
            .add_child_spanned(fixed(100.0, 10.0), 0, 0, 2, 1);

        grid.borrow_mut().measure(Size::new(400.0, 100.0), false);

        assert_eq!(grid.borrow().column_width(0), 50.0);
        assert_eq!(grid.borrow().column_width(1), 50.0);
    }

    #[test]
    fn children_land_at_track_offsets() {
        let grid = Grid::new();
        start_aligned(&grid);
        grid.borrow_mut().set_columns(vec![
            Track::absolute(50.0),
            Track::absolute(70.0),
        ]);
        grid.borrow_mut()
            .set_rows(vec![Track::absolute(30.0), Track::absolute(40.0)]);
        let cell = fixed(10.0, 10.0);
        grid.borrow_mut().add_child(cell.clone(), 1, 1);

        grid.borrow_mut().measure(Size::new(120.0, 70.0), false);
        grid.borrow_mut().arrange(Rect::new(0.0, 0.0, 120.0, 70.0));

        assert_eq!(cell.borrow().base().position().x, 50.0);
        assert_eq!(cell.borrow().base().position().y, 30.0);
    }

    #[test]
    fn spanned_child_gets_combined_track_slot() {
        let grid = Grid::new();
        start_aligned(&grid);
        grid.borrow_mut().set_columns(vec![
            Track::absolute(50.0),
            Track::absolute(70.0),
        ]);
        grid.borrow_mut().set_rows(vec![Track::absolute(30.0)]);
        let wide = crate::Label::new("");
        grid.borrow_mut().add_child_spanned(wide.clone(), 0, 0, 2, 1);

        grid.borrow_mut().measure(Size::new(120.0, 30.0), false);
        grid.borrow_mut().arrange(Rect::new(0.0, 0.0, 120.0, 30.0));

        // Default Stretch alignment fills the combined slot.
        assert_eq!(wide.borrow().base().size().width, 120.0);
    }

    #[test]
    fn zero_tracks_measure_to_zero() {
        let grid = Grid::new();
        start_aligned(&grid);
        let outer = grid.borrow_mut().measure(Size::new(200.0, 200.0), false);
        assert_eq!(outer, Size::ZERO);
    }

    #[test]
    fn out_of_range_placement_is_clamped_not_fatal() {
        let grid = Grid::new();
        start_aligned(&grid);
        grid.borrow_mut().set_columns(vec![Track::absolute(50.0)]);
        grid.borrow_mut().set_rows(vec![Track::absolute(30.0)]);
        grid.borrow_mut().add_child(fixed(10.0, 10.0), 7, 7);

        let outer = grid.borrow_mut().measure(Size::new(200.0, 200.0), false);
        assert_eq!(outer, Size::new(50.0, 30.0));
        grid.borrow_mut().arrange(Rect::new(0.0, 0.0, 200.0, 200.0));
    }
}
