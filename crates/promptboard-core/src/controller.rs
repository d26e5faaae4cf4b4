//! Board controller: selection, manipulation and store synchronization.
//!
//! The controller owns a read-replica of the editor's object collection.
//! Every geometry change is applied to the replica first and then pushed to
//! the editor; [`BoardController::refresh`] re-reads the canonical
//! collection.
//!
//! Async work is split in two halves so hosts can drive it without holding a
//! borrow of the controller: `begin_*` returns a `'static` request that can be
//! awaited anywhere, and `complete_*` applies its output.

use crate::board::Board;
use crate::config::{BoardConfig, ConfigError};
use crate::editor::{BoxFuture, Decoration, EditorImplementation, EditorResult, GenerationResult};
use crate::geometry::{DragAnchor, ResizeSnapshot, RotateSnapshot};
use crate::interaction::{HitTarget, Interaction};
use crate::metadata::MetadataPanel;
use crate::object::{LocationField, LocationPatch, ObjectDataPair, ObjectId, ObjectLocation};
use crate::widget::{Handle, HandleKind, WidgetManager, WidgetState, hit_test_handles, object_handles};
use kurbo::Point;
use std::future::IntoFuture;
use std::sync::Arc;

/// A pending metadata fetch for a newly selected object.
pub struct MetadataLoad {
    object_id: ObjectId,
    future: BoxFuture<'static, EditorResult<Vec<ObjectDataPair>>>,
}

impl MetadataLoad {
    /// Object whose metadata is being fetched.
    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

/// Metadata fetched for an object.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataLoaded {
    pub object_id: ObjectId,
    pub pairs: Vec<ObjectDataPair>,
}

impl IntoFuture for MetadataLoad {
    type Output = MetadataLoaded;
    type IntoFuture = BoxFuture<'static, MetadataLoaded>;

    fn into_future(self) -> Self::IntoFuture {
        let MetadataLoad { object_id, future } = self;
        Box::pin(async move {
            let pairs = match future.await {
                Ok(pairs) => pairs,
                Err(e) => {
                    log::warn!("Failed to load metadata for {}: {}", object_id, e);
                    Vec::new()
                }
            };
            MetadataLoaded { object_id, pairs }
        })
    }
}

/// A generation request in flight.
pub struct Generation {
    editor: Arc<dyn EditorImplementation>,
    prompt: String,
}

impl Generation {
    /// The submitted prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Result of a generation request.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub prompt: String,
    pub result: EditorResult<GenerationResult>,
}

impl IntoFuture for Generation {
    type Output = GenerationOutcome;
    type IntoFuture = BoxFuture<'static, GenerationOutcome>;

    fn into_future(self) -> Self::IntoFuture {
        let Generation { editor, prompt } = self;
        Box::pin(async move {
            let result = editor.generate_from_prompt(&prompt).await;
            GenerationOutcome { prompt, result }
        })
    }
}

/// Generated content mounted under the overlays.
#[derive(Debug, Clone)]
pub struct MountedDecoration {
    pub decoration: Decoration,
    /// Changes every time a new decoration is mounted, so hosts can remount.
    pub mount_key: u64,
}

/// Coordinates hover, selection, manipulation and generation for one board.
pub struct BoardController {
    editor: Arc<dyn EditorImplementation>,
    config: BoardConfig,
    /// Local replica of the editor's objects.
    objects: Vec<ObjectLocation>,
    widgets: WidgetManager,
    /// Active pointer session (at most one).
    interaction: Option<Interaction>,
    board: Board,
    /// Metadata of the selected object, once loaded.
    panel: Option<MetadataPanel>,
    prompt: String,
    pending: bool,
    decoration: Option<MountedDecoration>,
    mount_counter: u64,
    /// Bumped on numeric location edits so hosts can remount handle overlays.
    handles_revision: u64,
    show_areas: bool,
    last_error: Option<String>,
}

impl BoardController {
    /// Create a controller with the default configuration.
    pub fn new(editor: Arc<dyn EditorImplementation>) -> Self {
        Self::build(editor, BoardConfig::default())
    }

    /// Create a controller with a custom configuration.
    ///
    /// The configuration is validated first; sizes must be positive.
    pub fn with_config(
        editor: Arc<dyn EditorImplementation>,
        config: BoardConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(editor, config))
    }

    fn build(editor: Arc<dyn EditorImplementation>, config: BoardConfig) -> Self {
        let objects = editor.get_object_locations();
        let board = Board::new(&config);
        Self {
            editor,
            config,
            objects,
            widgets: WidgetManager::new(),
            interaction: None,
            board,
            panel: None,
            prompt: String::new(),
            pending: false,
            decoration: None,
            mount_counter: 0,
            handles_revision: 0,
            show_areas: false,
            last_error: None,
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The local object replica.
    pub fn objects(&self) -> &[ObjectLocation] {
        &self.objects
    }

    pub fn object(&self, index: usize) -> Option<&ObjectLocation> {
        self.objects.get(index)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Resize the board directly (clamped to the minimums).
    pub fn resize_board(&mut self, width: f64, height: f64) {
        self.board.resize_to(width, height);
    }

    pub fn widget_state(&self, index: usize) -> WidgetState {
        self.widgets.state(index)
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.widgets.hovered()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.widgets.selected()
    }

    pub fn selected_object(&self) -> Option<&ObjectLocation> {
        self.widgets.selected().and_then(|index| self.objects.get(index))
    }

    /// Handles of the selected object, rotate handle first.
    pub fn handles(&self) -> Vec<Handle> {
        self.selected_object()
            .map(|object| object_handles(object, self.config.rotate_handle_offset))
            .unwrap_or_default()
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    pub fn metadata_panel(&self) -> Option<&MetadataPanel> {
        self.panel.as_ref()
    }

    pub fn metadata_panel_mut(&mut self) -> Option<&mut MetadataPanel> {
        self.panel.as_mut()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Mutable prompt text for host text editors. Edits are ignored while pending.
    pub fn prompt_mut(&mut self) -> &mut String {
        &mut self.prompt
    }

    /// Whether a generation is in flight (input and manipulation disabled).
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn decoration(&self) -> Option<&MountedDecoration> {
        self.decoration.as_ref()
    }

    pub fn handles_revision(&self) -> u64 {
        self.handles_revision
    }

    pub fn show_areas(&self) -> bool {
        self.show_areas
    }

    pub fn toggle_areas(&mut self) {
        self.show_areas = !self.show_areas;
    }

    /// Message of the last failed generation, cleared on the next submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // --- Selection ---

    /// Set the hovered object directly (for hosts doing their own hit testing).
    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.widgets.set_hovered(index.filter(|&i| i < self.objects.len()));
    }

    /// Select an object and start fetching its metadata.
    ///
    /// Returns `None` when the index is invalid or the object is already
    /// selected with its metadata loaded.
    pub fn begin_select(&mut self, index: usize) -> Option<MetadataLoad> {
        let Some(object) = self.objects.get(index) else {
            log::warn!("Ignoring selection of missing object {}", index);
            return None;
        };
        let object_id = object.id.clone();

        let changed = self.widgets.select(index);
        if changed {
            log::debug!("Selected object {} ({})", index, object_id);
            if self.interaction.as_ref().and_then(Interaction::object_index).is_some() {
                self.interaction = None;
            }
            self.panel = None;
        } else if self.panel.as_ref().is_some_and(|p| p.object_id() == object_id) {
            return None;
        }

        let editor = Arc::clone(&self.editor);
        let id = object_id.clone();
        Some(MetadataLoad {
            object_id,
            future: Box::pin(async move { editor.get_object_data(&id).await }),
        })
    }

    /// Apply fetched metadata if its object is still selected.
    pub fn complete_select(&mut self, loaded: MetadataLoaded) {
        let current = self
            .selected_object()
            .is_some_and(|object| object.id == loaded.object_id);
        if current {
            self.panel = Some(MetadataPanel::new(loaded.object_id, loaded.pairs));
        } else {
            log::debug!("Discarding stale metadata for {}", loaded.object_id);
        }
    }

    /// Select an object and wait for its metadata.
    pub async fn select_object(&mut self, index: usize) {
        if let Some(load) = self.begin_select(index) {
            let loaded = load.await;
            self.complete_select(loaded);
        }
    }

    /// Clear the selection and close the metadata panel.
    pub fn deselect(&mut self) {
        if self.widgets.clear_selection() {
            log::debug!("Selection cleared");
        }
        if self.interaction.as_ref().and_then(Interaction::object_index).is_some() {
            self.interaction = None;
        }
        self.panel = None;
    }

    // --- Store synchronization ---

    /// Replace the replica with the editor's current objects.
    ///
    /// The selection survives only if the selected id is still present.
    pub fn refresh(&mut self) {
        let selected_id = self.selected_object().map(|object| object.id.clone());
        self.objects = self.editor.get_object_locations();

        if self.interaction.as_ref().and_then(Interaction::object_index).is_some() {
            self.interaction = None;
            self.widgets.end_manipulation();
        }
        self.widgets.set_hovered(None);

        let retained = selected_id
            .as_ref()
            .and_then(|id| self.objects.iter().position(|object| &object.id == id));
        match retained {
            Some(index) => self.widgets.retarget(index),
            None => {
                self.widgets.reset();
                self.panel = None;
            }
        }
    }

    /// Apply a location change to the replica and push it to the editor.
    ///
    /// Returns false if the index is out of range.
    pub fn mutate_location(&mut self, index: usize, patch: impl Into<LocationPatch>) -> bool {
        let Some(current) = self.objects.get(index) else {
            log::warn!("Ignoring location change for missing object {}", index);
            return false;
        };
        let updated = patch.into().apply(current, self.config.min_object_size);
        if let Err(e) = self.editor.set_object_location(&updated.id, &updated) {
            log::warn!("Failed to store location of {}: {}", updated.id, e);
        }
        self.objects[index] = updated;
        true
    }

    /// Numeric edit of one location field of the selected object.
    pub fn edit_location_field(&mut self, field: LocationField, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let Some(index) = self.widgets.selected() else {
            return false;
        };
        let changed = self.mutate_location(index, field.patch(value));
        if changed {
            self.handles_revision += 1;
        }
        changed
    }

    /// Update one metadata value in place and push the full sequence.
    pub fn mutate_metadata(&mut self, id: &str, key: &str, value: &str) -> bool {
        let Some(panel) = self.panel_for(id) else {
            return false;
        };
        if !panel.set_value(key, value) {
            log::warn!("Unknown metadata key {} on {}", key, id);
            return false;
        }
        self.push_metadata();
        true
    }

    /// Update the value of one metadata row and push the full sequence.
    pub fn mutate_metadata_at(&mut self, id: &str, row: usize, value: &str) -> bool {
        let Some(panel) = self.panel_for(id) else {
            return false;
        };
        if !panel.set_value_at(row, value) {
            log::warn!("No metadata row {} on {}", row, id);
            return false;
        }
        self.push_metadata();
        true
    }

    /// Append a placeholder key with an empty value and focus it.
    ///
    /// Returns the row index of the new pair.
    pub fn add_metadata_key(&mut self, id: &str) -> Option<usize> {
        let prefix = self.config.metadata_key_prefix.clone();
        let row = self.panel_for(id)?.add_key(&prefix);
        self.push_metadata();
        Some(row)
    }

    /// Remove one metadata key and push the remaining sequence.
    pub fn remove_metadata_key(&mut self, id: &str, key: &str) -> bool {
        let Some(panel) = self.panel_for(id) else {
            return false;
        };
        if !panel.remove_key(key) {
            return false;
        }
        self.push_metadata();
        true
    }

    /// Remove one metadata row and push the remaining sequence.
    pub fn remove_metadata_at(&mut self, id: &str, row: usize) -> bool {
        let Some(panel) = self.panel_for(id) else {
            return false;
        };
        if !panel.remove_at(row) {
            return false;
        }
        self.push_metadata();
        true
    }

    fn panel_for(&mut self, id: &str) -> Option<&mut MetadataPanel> {
        match self.panel.as_mut() {
            Some(panel) if panel.object_id() == id => Some(panel),
            _ => {
                log::warn!("No metadata loaded for {}", id);
                None
            }
        }
    }

    fn push_metadata(&self) {
        if let Some(panel) = &self.panel {
            if let Err(e) = self.editor.set_object_data(panel.object_id(), panel.pairs()) {
                log::warn!("Failed to store metadata of {}: {}", panel.object_id(), e);
            }
        }
    }

    // --- Generation ---

    /// Start a generation from the current prompt.
    ///
    /// Returns `None` while another generation is pending.
    pub fn begin_submit(&mut self) -> Option<Generation> {
        if self.pending {
            log::debug!("Generation already pending, ignoring submit");
            return None;
        }
        self.deselect();
        self.pending = true;
        self.last_error = None;
        Some(Generation {
            editor: Arc::clone(&self.editor),
            prompt: self.prompt.clone(),
        })
    }

    /// Apply a finished generation. Always leaves the pending state.
    ///
    /// On failure the prompt, board and replica are kept so the user can
    /// retry.
    pub fn complete_submit(&mut self, outcome: GenerationOutcome) {
        self.pending = false;
        match outcome.result {
            Ok(result) => {
                if result.has_valid_size() {
                    self.board.resize_to(result.width, result.height);
                } else {
                    log::warn!(
                        "Ignoring invalid board size {}x{} from generation",
                        result.width,
                        result.height
                    );
                }
                self.mount_counter += 1;
                self.decoration = Some(MountedDecoration {
                    decoration: result.decoration,
                    mount_key: self.mount_counter,
                });
                self.refresh();
                self.prompt.clear();
                log::info!("Generation produced {} objects", self.objects.len());
            }
            Err(e) => {
                log::error!("Generation failed for prompt {:?}: {}", outcome.prompt, e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Run a generation from the current prompt to completion.
    pub async fn submit(&mut self) {
        if let Some(generation) = self.begin_submit() {
            let outcome = generation.await;
            self.complete_submit(outcome);
        }
    }

    // --- Pointer handling ---

    /// Find what lies under a board-local point.
    ///
    /// Board grips win over handles, handles over object bodies, and bodies
    /// are tested topmost first (higher z-index, then later in the list).
    pub fn hit_test(&self, point: Point) -> HitTarget {
        if let Some(edge) = self.board.hit_test_grip(point, self.config.board_handle_gap) {
            return HitTarget::BoardGrip(edge);
        }
        if let Some(index) = self.widgets.selected() {
            if let Some(object) = self.objects.get(index) {
                if let Some(kind) = hit_test_handles(
                    object,
                    point,
                    self.config.rotate_handle_offset,
                    self.config.handle_hit_tolerance,
                ) {
                    return HitTarget::ObjectHandle(index, kind);
                }
            }
        }
        if !self.board.rect().contains(point) {
            return HitTarget::Empty;
        }
        let mut order: Vec<usize> = (0..self.objects.len()).collect();
        order.sort_by_key(|&i| (self.objects[i].z_index, i));
        order
            .into_iter()
            .rev()
            .find(|&i| self.objects[i].contains(point))
            .map_or(HitTarget::Empty, HitTarget::Object)
    }

    /// Pointer pressed at a board-local point.
    pub fn pointer_down(&mut self, point: Point) -> Option<MetadataLoad> {
        let target = self.hit_test(point);
        self.pointer_down_on(target, point)
    }

    /// Pointer pressed on a known target.
    ///
    /// Returns a metadata request when the press changed the selection.
    pub fn pointer_down_on(&mut self, target: HitTarget, point: Point) -> Option<MetadataLoad> {
        match target {
            HitTarget::BoardGrip(edge) => {
                let session = Interaction::board(&self.board, edge, point);
                self.start_interaction(session);
                None
            }
            HitTarget::ObjectHandle(index, kind) => {
                if self.pending || !self.widgets.is_selected(index) {
                    return None;
                }
                let object = self.objects.get(index)?;
                let session = match kind {
                    HandleKind::Resize(compass) => Interaction::Resize {
                        index,
                        snapshot: ResizeSnapshot::capture(
                            object,
                            compass,
                            point,
                            self.config.min_object_size,
                        ),
                    },
                    HandleKind::Rotate => Interaction::Rotate {
                        index,
                        snapshot: RotateSnapshot::capture(object, point),
                    },
                };
                self.start_interaction(session);
                None
            }
            HitTarget::Object(index) => {
                let load = self.begin_select(index);
                if !self.pending {
                    if let Some(object) = self.objects.get(index) {
                        let anchor = DragAnchor::capture(object, point);
                        self.start_interaction(Interaction::Drag { index, anchor });
                    }
                }
                load
            }
            HitTarget::SidePanel => None,
            HitTarget::Empty => {
                self.deselect();
                None
            }
        }
    }

    /// Pointer moved to a board-local point.
    pub fn pointer_moved(&mut self, point: Point) {
        if self.interaction.is_none() {
            let hovered = match self.hit_test(point) {
                HitTarget::Object(index) | HitTarget::ObjectHandle(index, _) => Some(index),
                _ => None,
            };
            self.widgets.set_hovered(hovered);
            return;
        }

        let (index, patch) = match &self.interaction {
            Some(Interaction::Board(resize)) => {
                resize.apply(&mut self.board, point);
                return;
            }
            Some(Interaction::Drag { index, anchor }) => {
                let rotation = self.objects.get(*index).map_or(0.0, |object| object.rotation);
                (*index, anchor.apply(point, rotation))
            }
            Some(Interaction::Resize { index, snapshot }) => (*index, snapshot.apply(point)),
            Some(Interaction::Rotate { index, snapshot }) => {
                (*index, LocationPatch::rotation(snapshot.apply(point)))
            }
            None => return,
        };
        self.mutate_location(index, patch);
    }

    /// Pointer released. Always ends the active session.
    pub fn pointer_up(&mut self) {
        if let Some(session) = self.interaction.take() {
            log::debug!("Ended {:?} session", session.manipulation());
        }
        self.widgets.end_manipulation();
    }

    /// End an abandoned session (pointer lost, window blurred).
    pub fn cancel_interaction(&mut self) {
        self.pointer_up();
    }

    fn start_interaction(&mut self, session: Interaction) {
        if let Some(previous) = self.interaction.take() {
            log::debug!("Replacing active {:?} session", previous.manipulation());
        }
        self.widgets.end_manipulation();
        if let Some(kind) = session.manipulation() {
            self.widgets.begin_manipulation(kind);
        }
        self.interaction = Some(session);
    }
}
