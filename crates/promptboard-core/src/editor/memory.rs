//! In-memory editor implementation with a placeholder generator.

use super::{BoxFuture, Decoration, EditorError, EditorImplementation, EditorResult, GenerationResult};
use crate::object::{ObjectDataPair, ObjectId, ObjectLocation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Number of objects produced by one placeholder generation.
const PLACEHOLDER_OBJECT_COUNT: usize = 5;

/// Decoration returned by [`MemoryEditor`]: a hatched rectangle per object.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderDecoration {
    pub corner_radius: f64,
    pub opacity: f64,
}

impl Default for PlaceholderDecoration {
    fn default() -> Self {
        Self {
            corner_radius: 8.0,
            opacity: 0.7,
        }
    }
}

#[derive(Default)]
struct MemoryState {
    locations: Vec<ObjectLocation>,
    data: HashMap<ObjectId, Vec<ObjectDataPair>>,
    /// Number of generations run so far; part of every generated id.
    generation: u64,
}

/// In-memory editor for testing, demos and ephemeral use.
///
/// Generation ignores the prompt and lays out five random rectangles on a
/// random board, the way the placeholder generator of the widget does.
pub struct MemoryEditor {
    state: RwLock<MemoryState>,
    rng: Mutex<StdRng>,
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEditor {
    /// Create an empty editor seeded from the OS.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Create an empty editor with deterministic generation.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the stored objects.
    pub fn with_locations(self, locations: Vec<ObjectLocation>) -> Self {
        self.set_locations(locations);
        self
    }

    /// Replace the stored objects, e.g. when a host loads another document.
    pub fn set_locations(&self, locations: Vec<ObjectLocation>) {
        match self.state.write() {
            Ok(mut state) => state.locations = locations,
            Err(e) => log::warn!("Memory editor lock poisoned: {}", e),
        }
    }

    /// Default metadata for an object the store has never seen.
    pub fn default_object_data(id: &str) -> Vec<ObjectDataPair> {
        vec![
            ObjectDataPair::new("name", format!("Object {}", id)),
            ObjectDataPair::new("type", "rectangle"),
            ObjectDataPair::new("note", ""),
        ]
    }

    /// Metadata recorded for an object created by generation.
    pub fn generated_object_data(id: &str) -> Vec<ObjectDataPair> {
        vec![
            ObjectDataPair::new("id", id),
            ObjectDataPair::new("type", "rectangle"),
            ObjectDataPair::new("note", ""),
        ]
    }

    fn generate_layout(&self, generation: u64) -> EditorResult<(f64, f64, Vec<ObjectLocation>)> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| EditorError::Other(format!("Lock error: {}", e)))?;

        let board_width: u32 = rng.random_range(300..500);
        let board_height: u32 = rng.random_range(500..700);
        let locations = (0..PLACEHOLDER_OBJECT_COUNT)
            .map(|i| {
                let width: u32 = rng.random_range(40..160);
                let height: u32 = rng.random_range(40..160);
                let left: u32 = rng.random_range(0..board_width - width);
                let top: u32 = rng.random_range(0..board_height - height);
                let id = format!("obj-{}-{}-{}", generation, i, Uuid::new_v4().simple());
                ObjectLocation::new(
                    id,
                    f64::from(left),
                    f64::from(top),
                    f64::from(width),
                    f64::from(height),
                )
                .with_z_index(rng.random_range(1..=10))
                .with_rotation(f64::from(rng.random_range(0..360_u32)))
            })
            .collect();

        Ok((f64::from(board_width), f64::from(board_height), locations))
    }
}

impl EditorImplementation for MemoryEditor {
    fn get_object_locations(&self) -> Vec<ObjectLocation> {
        match self.state.read() {
            Ok(state) => state.locations.clone(),
            Err(e) => {
                log::warn!("Memory editor lock poisoned: {}", e);
                Vec::new()
            }
        }
    }

    fn generate_from_prompt(&self, prompt: &str) -> BoxFuture<'_, EditorResult<GenerationResult>> {
        log::debug!("Placeholder generation for prompt of {} chars", prompt.len());
        Box::pin(async move {
            let mut state = self
                .state
                .write()
                .map_err(|e| EditorError::Other(format!("Lock error: {}", e)))?;
            state.generation += 1;
            let (width, height, locations) = self.generate_layout(state.generation)?;
            for location in &locations {
                state
                    .data
                    .insert(location.id.clone(), Self::generated_object_data(&location.id));
            }
            state.locations = locations;
            Ok(GenerationResult {
                decoration: Decoration::new(PlaceholderDecoration::default()),
                width,
                height,
            })
        })
    }

    fn set_object_location(&self, id: &str, location: &ObjectLocation) -> EditorResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| EditorError::Other(format!("Lock error: {}", e)))?;
        let slot = state
            .locations
            .iter_mut()
            .find(|loc| loc.id == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        *slot = location.clone();
        Ok(())
    }

    fn get_object_data(&self, id: &str) -> BoxFuture<'_, EditorResult<Vec<ObjectDataPair>>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut state = self
                .state
                .write()
                .map_err(|e| EditorError::Other(format!("Lock error: {}", e)))?;
            Ok(state
                .data
                .entry(id.clone())
                .or_insert_with(|| Self::default_object_data(&id))
                .clone())
        })
    }

    fn set_object_data(&self, id: &str, pairs: &[ObjectDataPair]) -> EditorResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| EditorError::Other(format!("Lock error: {}", e)))?;
        state.data.insert(id.to_string(), pairs.to_vec());
        Ok(())
    }
}
