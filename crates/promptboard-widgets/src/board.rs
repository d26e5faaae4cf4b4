//! The interactive board surface: decoration, overlays, handles and grips.

use egui::{
    Color32, CornerRadius, CursorIcon, Key, Painter, Pos2, Rect, Response, Sense, Shape, Stroke,
    StrokeKind, Ui, Vec2, vec2,
};
use kurbo::Point;
use promptboard_core::{
    BoardConfig, BoardController, BoardEdge, Compass, HandleKind, HitTarget, Interaction, ObjectLocation,
    PlaceholderDecoration, WidgetState,
};

use crate::tasks::TaskRunner;
use crate::{sizing, theme};

/// Maps between screen positions and board-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardTransform {
    origin: Pos2,
}

impl BoardTransform {
    /// Transform with the board's top-left corner at `origin`.
    pub fn new(origin: Pos2) -> Self {
        Self { origin }
    }

    /// Transform for a board view allocated at `rect`, past its top-left margin.
    pub fn for_view(rect: Rect, config: &BoardConfig) -> Self {
        let margin = view_margin(config);
        Self::new(rect.min + vec2(margin, margin))
    }

    pub fn to_board(&self, pos: Pos2) -> Point {
        Point::new(
            f64::from(pos.x - self.origin.x),
            f64::from(pos.y - self.origin.y),
        )
    }

    pub fn to_screen(&self, point: Point) -> Pos2 {
        Pos2::new(
            self.origin.x + point.x as f32,
            self.origin.y + point.y as f32,
        )
    }

    pub fn rect_to_screen(&self, rect: kurbo::Rect) -> Rect {
        Rect::from_min_max(
            self.to_screen(Point::new(rect.x0, rect.y0)),
            self.to_screen(Point::new(rect.x1, rect.y1)),
        )
    }
}

/// Space kept above and left of the board so handles past its top and left
/// edges stay inside the view.
pub fn view_margin(config: &BoardConfig) -> f32 {
    (config.rotate_handle_offset + config.handle_hit_tolerance) as f32
}

/// Renders a [`BoardController`] and feeds it egui pointer input.
///
/// Every primary press in the window reaches the controller: presses over
/// the view are hit tested, presses inside the side panel rect are ignored
/// and any other press clears the selection.
pub struct BoardView {
    /// Extra space right of and below the grips.
    padding: f32,
    side_panel: Option<Rect>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            padding: sizing::BOARD_PADDING,
            side_panel: None,
        }
    }
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the padding around the grips.
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Screen rect of the metadata side panel; presses inside it keep the
    /// selection.
    pub fn side_panel_rect(mut self, rect: Rect) -> Self {
        self.side_panel = Some(rect);
        self
    }

    /// Show the board. Metadata requests triggered by clicks go to `tasks`.
    pub fn show(self, ui: &mut Ui, controller: &mut BoardController, tasks: &mut TaskRunner) -> Response {
        let board = controller.board();
        let gap = controller.config().board_handle_gap as f32;
        let margin = view_margin(controller.config());
        let size = vec2(
            margin + board.width() as f32 + gap + self.padding,
            margin + board.height() as f32 + gap + self.padding,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        let transform = BoardTransform::for_view(rect, controller.config());

        handle_input(ui, &transform, self.side_panel, controller, tasks);

        if ui.is_rect_visible(rect) {
            paint_board(ui.painter(), &transform, controller);
        }
        response
    }
}

fn handle_input(
    ui: &Ui,
    transform: &BoardTransform,
    side_panel: Option<Rect>,
    controller: &mut BoardController,
    tasks: &mut TaskRunner,
) {
    let (pressed, down, press_origin, latest, escape) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.pointer.press_origin(),
            i.pointer.latest_pos(),
            i.key_pressed(Key::Escape),
        )
    });
    // Handles may stick out of the allocated rect, so the whole visible part
    // of this ui counts, unless another layer covers it.
    let over_view = ui.rect_contains_pointer(ui.clip_rect());

    if escape {
        controller.cancel_interaction();
    }

    if pressed {
        if let Some(pos) = press_origin.or(latest) {
            let point = transform.to_board(pos);
            let target = if over_view {
                controller.hit_test(point)
            } else if side_panel.is_some_and(|rect| rect.contains(pos)) {
                HitTarget::SidePanel
            } else {
                HitTarget::Empty
            };
            if let Some(load) = controller.pointer_down_on(target, point) {
                tasks.spawn_metadata(load);
            }
        }
    }

    let active = controller.interaction().is_some();
    match latest {
        Some(pos) if active || over_view => controller.pointer_moved(transform.to_board(pos)),
        _ => controller.set_hovered(None),
    }

    // Release may happen outside the board, or outside the window.
    if active && !down {
        controller.pointer_up();
    }

    let hover = latest.filter(|_| over_view).map(|pos| transform.to_board(pos));
    if let Some(cursor) = cursor_for(controller, hover) {
        ui.ctx().set_cursor_icon(cursor);
    }
}

fn cursor_for(controller: &BoardController, hover: Option<Point>) -> Option<CursorIcon> {
    let rotation_of = |index: usize| controller.object(index).map_or(0.0, |o| o.rotation);

    if let Some(session) = controller.interaction() {
        return Some(match session {
            Interaction::Drag { .. } | Interaction::Rotate { .. } => CursorIcon::Grabbing,
            Interaction::Resize { index, snapshot } => resize_cursor(snapshot.handle(), rotation_of(*index)),
            Interaction::Board(resize) => edge_cursor(resize.edge),
        });
    }

    match controller.hit_test(hover?) {
        HitTarget::BoardGrip(edge) => Some(edge_cursor(edge)),
        HitTarget::ObjectHandle(index, HandleKind::Resize(compass)) => {
            Some(resize_cursor(compass, rotation_of(index)))
        }
        HitTarget::ObjectHandle(_, HandleKind::Rotate) => Some(CursorIcon::Grab),
        HitTarget::Object(_) if !controller.is_pending() => Some(CursorIcon::Move),
        _ => None,
    }
}

fn edge_cursor(edge: BoardEdge) -> CursorIcon {
    match edge {
        BoardEdge::Width => CursorIcon::ResizeHorizontal,
        BoardEdge::Height => CursorIcon::ResizeVertical,
    }
}

/// Resize cursor for a handle, turned with the object to the nearest 45 degrees.
pub fn resize_cursor(handle: Compass, rotation: f64) -> CursorIcon {
    let start = Compass::ALL.iter().position(|&c| c == handle).unwrap_or(0) as i64;
    let steps = if rotation.is_finite() {
        (rotation / 45.0).round() as i64
    } else {
        0
    };
    match Compass::ALL[(start + steps).rem_euclid(8) as usize] {
        Compass::N => CursorIcon::ResizeNorth,
        Compass::NE => CursorIcon::ResizeNorthEast,
        Compass::E => CursorIcon::ResizeEast,
        Compass::SE => CursorIcon::ResizeSouthEast,
        Compass::S => CursorIcon::ResizeSouth,
        Compass::SW => CursorIcon::ResizeSouthWest,
        Compass::W => CursorIcon::ResizeWest,
        Compass::NW => CursorIcon::ResizeNorthWest,
    }
}

/// Screen-space corners of a rotated object, clockwise from top-left.
fn object_corners(transform: &BoardTransform, object: &ObjectLocation) -> Vec<Pos2> {
    let (hw, hh) = (object.width / 2.0, object.height / 2.0);
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .into_iter()
        .map(|(x, y)| transform.to_screen(object.to_board(kurbo::Vec2::new(x, y))))
        .collect()
}

fn paint_board(painter: &Painter, transform: &BoardTransform, controller: &BoardController) {
    let board_rect = transform.rect_to_screen(controller.board().rect());
    let radius = CornerRadius::same(sizing::BOARD_RADIUS);
    painter.rect_filled(board_rect, radius, theme::BOARD_BG);

    // Objects may extend past the board edge; only the board area shows them.
    let clipped = painter.with_clip_rect(board_rect);
    if let Some(mounted) = controller.decoration() {
        if let Some(placeholder) = mounted.decoration.downcast_ref::<PlaceholderDecoration>() {
            paint_placeholder(&clipped, transform, controller.objects(), placeholder);
        }
    }
    for (index, object) in controller.objects().iter().enumerate() {
        paint_overlay(
            &clipped,
            transform,
            object,
            controller.widget_state(index),
            controller.show_areas(),
        );
    }

    painter.rect_stroke(board_rect, radius, Stroke::new(1.0, theme::BORDER), StrokeKind::Outside);

    paint_handles(painter, transform, controller);
    paint_grips(painter, transform, controller);
}

fn paint_placeholder(
    painter: &Painter,
    transform: &BoardTransform,
    objects: &[ObjectLocation],
    placeholder: &PlaceholderDecoration,
) {
    let fill = theme::PLACEHOLDER_FILL.gamma_multiply(placeholder.opacity as f32);
    let stroke = Stroke::new(1.0, theme::PLACEHOLDER_STROKE.gamma_multiply(placeholder.opacity as f32));

    let mut ordered: Vec<&ObjectLocation> = objects.iter().collect();
    ordered.sort_by_key(|object| object.z_index);

    for object in ordered {
        if object.rotation.abs() < f64::EPSILON {
            let rect = transform.rect_to_screen(object.rect());
            let radius = CornerRadius::same(placeholder.corner_radius.clamp(0.0, 255.0) as u8);
            painter.rect_filled(rect, radius, fill);
            painter.rect_stroke(rect, radius, stroke, StrokeKind::Inside);
        } else {
            painter.add(Shape::convex_polygon(object_corners(transform, object), fill, stroke));
        }
    }
}

fn paint_overlay(
    painter: &Painter,
    transform: &BoardTransform,
    object: &ObjectLocation,
    state: WidgetState,
    show_areas: bool,
) {
    let fill = if show_areas || state.is_manipulating() {
        theme::AREA_TINT
    } else {
        Color32::TRANSPARENT
    };
    let stroke = if state.is_selected() {
        Stroke::new(2.0, theme::ACCENT)
    } else if state.is_highlighted() {
        Stroke::new(1.0, theme::ACCENT)
    } else {
        Stroke::NONE
    };
    if fill == Color32::TRANSPARENT && stroke == Stroke::NONE {
        return;
    }
    painter.add(Shape::convex_polygon(object_corners(transform, object), fill, stroke));
}

fn paint_handles(painter: &Painter, transform: &BoardTransform, controller: &BoardController) {
    let handles = controller.handles();
    if handles.is_empty() {
        return;
    }
    let stroke = Stroke::new(1.5, theme::ACCENT);

    let position_of = |kind: HandleKind| {
        handles
            .iter()
            .find(|h| h.kind == kind)
            .map(|h| transform.to_screen(h.position))
    };
    if let (Some(rotate), Some(north)) = (
        position_of(HandleKind::Rotate),
        position_of(HandleKind::Resize(Compass::N)),
    ) {
        painter.line_segment([rotate, north], Stroke::new(1.0, theme::ACCENT));
    }

    for handle in &handles {
        let center = transform.to_screen(handle.position);
        match handle.kind {
            HandleKind::Rotate => {
                painter.circle_filled(center, sizing::ROTATE_HANDLE_RADIUS, theme::HANDLE_FILL);
                painter.circle_stroke(center, sizing::ROTATE_HANDLE_RADIUS, stroke);
            }
            HandleKind::Resize(_) => {
                let rect = Rect::from_center_size(center, Vec2::splat(sizing::HANDLE_SIZE));
                let radius = CornerRadius::same(sizing::HANDLE_RADIUS);
                painter.rect_filled(rect, radius, theme::HANDLE_FILL);
                painter.rect_stroke(rect, radius, stroke, StrokeKind::Inside);
            }
        }
    }
}

fn paint_grips(painter: &Painter, transform: &BoardTransform, controller: &BoardController) {
    let board = controller.board();
    let gap = controller.config().board_handle_gap;
    let active = match controller.interaction() {
        Some(Interaction::Board(resize)) => Some(resize.edge),
        _ => None,
    };

    for edge in [BoardEdge::Width, BoardEdge::Height] {
        let rect = transform.rect_to_screen(board.grip_rect(edge, gap)).shrink(sizing::GRIP_INSET);
        let fill = if active == Some(edge) { theme::ACCENT } else { theme::GRIP_BG };
        let radius = CornerRadius::same(sizing::PANEL_RADIUS);
        painter.rect_filled(rect, radius, fill);
        painter.rect_stroke(rect, radius, Stroke::new(1.0, theme::BORDER), StrokeKind::Inside);

        // Short bar along the grip's long axis.
        let c = rect.center();
        let bar = match edge {
            BoardEdge::Width => [Pos2::new(c.x, c.y - 10.0), Pos2::new(c.x, c.y + 10.0)],
            BoardEdge::Height => [Pos2::new(c.x - 10.0, c.y), Pos2::new(c.x + 10.0, c.y)],
        };
        let bar_color = if active == Some(edge) { Color32::WHITE } else { theme::TEXT_MUTED };
        painter.line_segment(bar, Stroke::new(2.0, bar_color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{prompt_bar, side_panel};
    use egui::epaint::ClippedShape;
    use egui::{Event, Modifiers, PointerButton, RawInput};
    use promptboard_core::{EditorImplementation, MemoryEditor};
    use std::sync::Arc;

    /// Drives the full window layout (side panel, prompt bar, board) through
    /// `egui::Context::run`, one frame per call.
    struct Window {
        ctx: egui::Context,
        controller: BoardController,
        tasks: TaskRunner,
        board: Rect,
        side: Rect,
        prompt: Rect,
        shapes: Vec<ClippedShape>,
    }

    impl Window {
        fn new(objects: Vec<ObjectLocation>) -> Self {
            Self::with_editor(Arc::new(MemoryEditor::with_seed(9).with_locations(objects)))
        }

        fn with_editor(editor: Arc<MemoryEditor>) -> Self {
            let mut window = Self {
                ctx: egui::Context::default(),
                controller: BoardController::new(editor),
                tasks: TaskRunner::new(),
                board: Rect::NOTHING,
                side: Rect::NOTHING,
                prompt: Rect::NOTHING,
                shapes: Vec::new(),
            };
            window.frame(Vec::new());
            window
        }

        fn frame(&mut self, events: Vec<Event>) {
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(1400.0, 1000.0))),
                events,
                ..Default::default()
            };
            let Self {
                ctx,
                controller,
                tasks,
                board,
                side,
                prompt,
                shapes,
            } = self;
            let output = ctx.run(input, |ctx| {
                tasks.poll_and_repaint(ctx, controller);
                *side = egui::SidePanel::right("data")
                    .show(ctx, |ui| side_panel(ui, controller))
                    .response
                    .rect;
                *prompt = egui::TopBottomPanel::bottom("prompt")
                    .show(ctx, |ui| prompt_bar(ui, controller, tasks))
                    .response
                    .rect;
                let side_rect = *side;
                *board = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        BoardView::new()
                            .side_panel_rect(side_rect)
                            .show(ui, controller, tasks)
                            .rect
                    })
                    .inner;
            });
            *shapes = output.shapes;
        }

        /// Center of the last painted text equal to `text`.
        fn text_center(&self, text: &str) -> Option<Pos2> {
            self.shapes.iter().rev().find_map(|clipped| match &clipped.shape {
                Shape::Text(shape) if shape.galley.text() == text => {
                    Some(shape.galley.rect.translate(shape.pos.to_vec2()).center())
                }
                _ => None,
            })
        }

        /// Screen position of a board-local point.
        fn at(&self, x: f64, y: f64) -> Pos2 {
            BoardTransform::for_view(self.board, self.controller.config()).to_screen(Point::new(x, y))
        }

        /// A point in the side panel below its widgets.
        fn side_panel_blank(&self) -> Pos2 {
            Pos2::new(self.side.center().x, self.side.bottom() - 20.0)
        }

        fn press(&mut self, pos: Pos2) {
            self.frame(vec![Event::PointerMoved(pos), button(pos, true)]);
        }

        fn release(&mut self, pos: Pos2) {
            self.frame(vec![Event::PointerMoved(pos), button(pos, false)]);
        }

        fn move_to(&mut self, pos: Pos2) {
            self.frame(vec![Event::PointerMoved(pos)]);
        }

        fn click(&mut self, pos: Pos2) {
            self.press(pos);
            self.release(pos);
        }
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    fn objects() -> Vec<ObjectLocation> {
        vec![
            ObjectLocation::new("middle", 100.0, 100.0, 80.0, 60.0),
            // Rotate handle ends up above the board.
            ObjectLocation::new("top", 100.0, 5.0, 80.0, 40.0),
            // West handles sit on the left board edge.
            ObjectLocation::new("left", 0.0, 300.0, 60.0, 60.0),
        ]
    }

    #[test]
    fn test_transform_offsets_by_origin() {
        let transform = BoardTransform::new(Pos2::new(100.0, 50.0));
        assert_eq!(transform.to_board(Pos2::new(110.0, 70.0)), Point::new(10.0, 20.0));
        assert_eq!(transform.to_screen(Point::new(0.0, 0.0)), Pos2::new(100.0, 50.0));
    }

    #[test]
    fn test_view_transform_skips_margin() {
        let config = BoardConfig::default();
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), vec2(500.0, 800.0));
        let transform = BoardTransform::for_view(rect, &config);
        assert_eq!(transform.to_screen(Point::ZERO), Pos2::new(50.0, 60.0));
        assert_eq!(transform.to_board(rect.min), Point::new(-40.0, -40.0));
    }

    #[test]
    fn test_resize_cursor_follows_rotation() {
        assert_eq!(resize_cursor(Compass::N, 0.0), CursorIcon::ResizeNorth);
        assert_eq!(resize_cursor(Compass::N, 90.0), CursorIcon::ResizeEast);
        assert_eq!(resize_cursor(Compass::NW, 50.0), CursorIcon::ResizeNorth);
        assert_eq!(resize_cursor(Compass::W, 350.0), CursorIcon::ResizeWest);
        assert_eq!(resize_cursor(Compass::SE, f64::NAN), CursorIcon::ResizeSouthEast);
    }

    #[test]
    fn test_press_on_object_starts_drag() {
        let mut window = Window::new(objects());
        window.press(window.at(140.0, 130.0));
        assert_eq!(window.controller.selected_index(), Some(0));
        assert!(matches!(
            window.controller.interaction(),
            Some(Interaction::Drag { index: 0, .. })
        ));

        window.move_to(window.at(150.0, 135.0));
        let moved = &window.controller.objects()[0];
        assert!((moved.left - 110.0).abs() < 1e-3);
        assert!((moved.top - 105.0).abs() < 1e-3);

        window.release(window.at(150.0, 135.0));
        assert!(window.controller.interaction().is_none());
        // The metadata load was polled by the next frame.
        assert_eq!(window.controller.metadata_panel().map(|p| p.object_id()), Some("middle"));
    }

    #[test]
    fn test_rotate_handle_above_board_is_reachable() {
        let mut window = Window::new(objects());
        window.click(window.at(140.0, 25.0));
        assert_eq!(window.controller.selected_index(), Some(1));

        // 32px above a north edge at y=5.
        window.press(window.at(140.0, -27.0));
        assert!(matches!(
            window.controller.interaction(),
            Some(Interaction::Rotate { index: 1, .. })
        ));
        window.release(window.at(140.0, -27.0));
        assert!(window.controller.interaction().is_none());
    }

    #[test]
    fn test_west_handle_on_left_edge_is_reachable() {
        let mut window = Window::new(objects());
        window.click(window.at(30.0, 330.0));
        assert_eq!(window.controller.selected_index(), Some(2));

        // Left of the board, within the hit tolerance of the west handle.
        window.press(window.at(-5.0, 330.0));
        match window.controller.interaction() {
            Some(Interaction::Resize { index, snapshot }) => {
                assert_eq!(*index, 2);
                assert_eq!(snapshot.handle(), Compass::W);
            }
            other => panic!("expected a resize session, got {:?}", other),
        }

        window.move_to(window.at(-15.0, 330.0));
        let resized = &window.controller.objects()[2];
        assert!((resized.left + 10.0).abs() < 1e-3);
        assert!((resized.width - 70.0).abs() < 1e-3);
        window.release(window.at(-15.0, 330.0));
    }

    #[test]
    fn test_press_outside_board_deselects() {
        let mut window = Window::new(objects());
        window.click(window.at(140.0, 130.0));
        assert_eq!(window.controller.selected_index(), Some(0));

        // Side panel presses keep the selection.
        window.click(window.side_panel_blank());
        assert_eq!(window.controller.selected_index(), Some(0));

        // Empty space of the central panel, above and left of the board.
        window.click(Pos2::new(20.0, 20.0));
        assert_eq!(window.controller.selected_index(), None);
        assert!(window.controller.metadata_panel().is_none());

        window.click(window.at(140.0, 130.0));
        assert_eq!(window.controller.selected_index(), Some(0));
        window.click(window.prompt.center());
        assert_eq!(window.controller.selected_index(), None);
    }

    #[test]
    fn test_release_outside_board_ends_session() {
        let mut window = Window::new(objects());
        window.press(window.at(140.0, 130.0));
        assert!(window.controller.interaction().is_some());

        let outside = window.side_panel_blank();
        window.move_to(outside);
        assert!(window.controller.interaction().is_some());
        assert!(window.controller.objects()[0].left > 100.0);

        window.release(outside);
        assert!(window.controller.interaction().is_none());
        assert_eq!(window.controller.selected_index(), Some(0));
    }

    #[test]
    fn test_refresh_button_rereads_store() {
        let editor = Arc::new(MemoryEditor::with_seed(9).with_locations(objects()));
        let mut window = Window::with_editor(editor.clone());
        window.click(window.at(140.0, 130.0));

        editor.set_locations(vec![ObjectLocation::new("fresh", 0.0, 0.0, 40.0, 40.0)]);
        assert_eq!(window.controller.objects().len(), 3);

        let refresh = window.text_center("Refresh").unwrap();
        window.click(refresh);
        assert_eq!(window.controller.objects(), editor.get_object_locations().as_slice());
        assert_eq!(window.controller.selected_index(), None);
    }
}
