//! Placement, stacking and pointer-geometry helpers used by the window reducer.
//!
//! Everything here is pure: no function reads the clock, the host or any shared state.

use crate::model::{ResizeEdge, WindowInstance, WindowPosition, WindowSize};

/// Stacking value given to the first window and to the bottom of a re-densified stack.
pub const BASE_Z_INDEX: u32 = 100;
/// Top-left corner of the first cascaded window.
pub const CASCADE_ORIGIN: WindowPosition = WindowPosition { x: 40, y: 60 };
/// Per-window cascade offset on both axes.
pub const CASCADE_STEP: i32 = 20;
/// Number of cascade slots before placement wraps back to [`CASCADE_ORIGIN`].
pub const CASCADE_SLOTS: usize = 10;
/// Smallest `y` a window may be moved to; keeps title bars clear of the menu bar.
pub const MIN_TOP_OFFSET: i32 = 8;

/// Returns the staggered default position for the window opened after `open_count` others.
pub fn cascade_position(open_count: usize) -> WindowPosition {
    let slot = (open_count % CASCADE_SLOTS) as i32;
    CASCADE_ORIGIN.offset(slot * CASCADE_STEP, slot * CASCADE_STEP)
}

/// Returns a stacking value above every window in `windows`.
pub fn next_z_index(windows: &[WindowInstance]) -> u32 {
    windows
        .iter()
        .map(|w| w.z_index)
        .max()
        .map_or(BASE_Z_INDEX, |top| top.saturating_add(1))
}

/// Reassigns stacking values as `BASE_Z_INDEX + index` in list order.
pub fn restack_in_list_order(windows: &mut [WindowInstance]) {
    for (idx, window) in windows.iter_mut().enumerate() {
        window.z_index = BASE_Z_INDEX + idx as u32;
    }
}

/// Keeps the rectangle `[position, position + size]` inside `[0, viewport]`.
///
/// On an axis where the window is larger than the viewport it is pinned to `0`. `size` is never
/// changed.
pub fn clamp_to_viewport(
    position: WindowPosition,
    size: WindowSize,
    viewport: WindowSize,
) -> WindowPosition {
    WindowPosition {
        x: position.x.max(0).min(viewport.width.saturating_sub(size.width).max(0)),
        y: position.y.max(0).min(viewport.height.saturating_sub(size.height).max(0)),
    }
}

/// Floors the vertical coordinate at [`MIN_TOP_OFFSET`].
pub fn constrain_below_menu_bar(position: WindowPosition) -> WindowPosition {
    WindowPosition {
        y: position.y.max(MIN_TOP_OFFSET),
        ..position
    }
}

/// Position of a dragged window given the pointer delta since drag start.
pub fn drag_position(start: WindowPosition, dx: i32, dy: i32) -> WindowPosition {
    constrain_below_menu_bar(WindowPosition {
        x: start.x.saturating_add(dx),
        y: start.y.saturating_add(dy),
    })
}

/// Applies a pointer delta to an edge or corner drag.
///
/// The result never shrinks below `min_size`; when a west or north edge hits the minimum the
/// opposite edge stays where it was.
pub fn resize_from_edge(
    start_position: WindowPosition,
    start_size: WindowSize,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min_size: WindowSize,
) -> (WindowPosition, WindowSize) {
    let (west, east, north, south) = match edge {
        ResizeEdge::North => (false, false, true, false),
        ResizeEdge::South => (false, false, false, true),
        ResizeEdge::East => (false, true, false, false),
        ResizeEdge::West => (true, false, false, false),
        ResizeEdge::NorthEast => (false, true, true, false),
        ResizeEdge::NorthWest => (true, false, true, false),
        ResizeEdge::SouthEast => (false, true, false, true),
        ResizeEdge::SouthWest => (true, false, false, true),
    };

    let mut position = start_position;
    let mut size = start_size;

    if east {
        size.width = start_size.width.saturating_add(dx).max(min_size.width);
    }
    if west {
        size.width = start_size.width.saturating_sub(dx).max(min_size.width);
        position.x = start_position
            .x
            .saturating_add(start_size.width)
            .saturating_sub(size.width);
    }
    if south {
        size.height = start_size.height.saturating_add(dy).max(min_size.height);
    }
    if north {
        size.height = start_size.height.saturating_sub(dy).max(min_size.height);
        position.y = start_position
            .y
            .saturating_add(start_size.height)
            .saturating_sub(size.height);
    }

    (position, size)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use desktop_app_contract::ApplicationId;

    use super::*;
    use crate::{
        model::{OpenWindowRequest, WindowStoreState},
        reducer::{reduce_windows, WindowAction},
    };

    fn pos(x: i32, y: i32) -> WindowPosition {
        WindowPosition { x, y }
    }

    fn size(width: i32, height: i32) -> WindowSize {
        WindowSize { width, height }
    }

    #[test]
    fn cascade_steps_by_twenty_and_wraps_every_ten() {
        assert_eq!(cascade_position(0), pos(40, 60));
        assert_eq!(cascade_position(3), pos(100, 120));
        assert_eq!(cascade_position(9), pos(220, 240));
        assert_eq!(cascade_position(10), pos(40, 60));
        assert_eq!(cascade_position(13), cascade_position(3));
    }

    #[test]
    fn next_z_index_starts_at_base_and_exceeds_max() {
        assert_eq!(next_z_index(&[]), BASE_Z_INDEX);

        let mut state = WindowStoreState::default();
        for title in ["Notes", "Calendar"] {
            reduce_windows(
                &mut state,
                WindowAction::OpenWindow(OpenWindowRequest::new(
                    ApplicationId::trusted(title.to_lowercase()),
                    title,
                )),
                1,
            )
            .expect("open");
        }
        state.windows[0].z_index = 150;
        assert!(next_z_index(&state.windows) > 150);
    }

    #[test]
    fn restack_is_dense_in_list_order() {
        let mut state = WindowStoreState::default();
        for _ in 0..3 {
            reduce_windows(
                &mut state,
                WindowAction::OpenWindow(OpenWindowRequest::new(
                    ApplicationId::trusted("notes"),
                    "Notes",
                )),
                1,
            )
            .expect("open");
        }
        state.windows[0].z_index = 900;
        restack_in_list_order(&mut state.windows);
        let stack: Vec<u32> = state.windows.iter().map(|w| w.z_index).collect();
        assert_eq!(stack, vec![100, 101, 102]);
    }

    #[test]
    fn clamp_keeps_window_inside_viewport() {
        let viewport = size(1000, 700);
        let window = size(300, 200);
        assert_eq!(clamp_to_viewport(pos(-20, -5), window, viewport), pos(0, 0));
        assert_eq!(clamp_to_viewport(pos(900, 650), window, viewport), pos(700, 500));
        assert_eq!(clamp_to_viewport(pos(120, 80), window, viewport), pos(120, 80));
    }

    #[test]
    fn clamp_pins_oversized_axis_to_origin() {
        let viewport = size(800, 600);
        assert_eq!(clamp_to_viewport(pos(50, 40), size(1200, 200), viewport), pos(0, 40));
        assert_eq!(clamp_to_viewport(pos(50, 40), size(200, 900), viewport), pos(50, 0));
    }

    #[test]
    fn drag_respects_menu_bar_floor() {
        assert_eq!(drag_position(pos(100, 100), 25, 40), pos(125, 140));
        assert_eq!(drag_position(pos(100, 30), 0, -200), pos(100, MIN_TOP_OFFSET));
    }

    #[test]
    fn east_and_south_edges_grow_size_only() {
        let (p, s) = resize_from_edge(
            pos(10, 20),
            size(400, 300),
            ResizeEdge::SouthEast,
            30,
            15,
            size(100, 100),
        );
        assert_eq!(p, pos(10, 20));
        assert_eq!(s, size(430, 315));
    }

    #[test]
    fn west_edge_pins_right_side_at_minimum() {
        let (p, s) = resize_from_edge(
            pos(100, 50),
            size(400, 300),
            ResizeEdge::West,
            350,
            0,
            size(360, 260),
        );
        assert_eq!(s, size(360, 300));
        assert_eq!(p.x + s.width, 500);
    }

    #[test]
    fn north_west_corner_moves_origin() {
        let (p, s) = resize_from_edge(
            pos(100, 100),
            size(400, 300),
            ResizeEdge::NorthWest,
            -20,
            -10,
            size(100, 100),
        );
        assert_eq!(p, pos(80, 90));
        assert_eq!(s, size(420, 310));
    }

    #[test]
    fn extreme_deltas_saturate_instead_of_overflowing() {
        assert_eq!(
            clamp_to_viewport(pos(5, 5), size(i32::MAX, 10), size(i32::MIN, 600)),
            pos(0, 5)
        );
        assert_eq!(
            drag_position(pos(i32::MAX - 1, 100), 50, i32::MIN),
            pos(i32::MAX, MIN_TOP_OFFSET)
        );

        let (p, s) = resize_from_edge(
            pos(i32::MIN + 10, 0),
            size(400, 300),
            ResizeEdge::SouthWest,
            i32::MIN,
            i32::MAX,
            size(100, 100),
        );
        assert_eq!(s, size(i32::MAX, i32::MAX));
        assert_eq!(p.x, i32::MIN);
    }
}
