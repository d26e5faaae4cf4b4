//! Frame-driven polling of controller futures.

use promptboard_core::{BoardController, BoxFuture, Generation, GenerationOutcome, MetadataLoad, MetadataLoaded};
use std::future::IntoFuture;
use std::task::{Context, Poll, Waker};

enum TaskOutput {
    Generation(GenerationOutcome),
    Metadata(MetadataLoaded),
}

/// Holds in-flight generation and metadata requests.
///
/// egui has no executor, so every task is polled once per frame with a no-op
/// waker and the UI keeps repainting while anything is outstanding.
#[derive(Default)]
pub struct TaskRunner {
    tasks: Vec<BoxFuture<'static, TaskOutput>>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a generation started with [`BoardController::begin_submit`].
    pub fn spawn_generation(&mut self, generation: Generation) {
        log::debug!("Tracking generation for a {} char prompt", generation.prompt().len());
        let future = generation.into_future();
        self.tasks
            .push(Box::pin(async move { TaskOutput::Generation(future.await) }));
    }

    /// Track a metadata fetch started by a selection.
    pub fn spawn_metadata(&mut self, load: MetadataLoad) {
        log::debug!("Tracking metadata load for {}", load.object_id());
        let future = load.into_future();
        self.tasks
            .push(Box::pin(async move { TaskOutput::Metadata(future.await) }));
    }

    /// Number of outstanding tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Poll every task once and apply finished ones to the controller.
    ///
    /// Returns the number of tasks that completed.
    pub fn poll(&mut self, controller: &mut BoardController) -> usize {
        let mut cx = Context::from_waker(Waker::noop());
        let mut completed = 0;
        self.tasks.retain_mut(|task| match task.as_mut().poll(&mut cx) {
            Poll::Ready(output) => {
                match output {
                    TaskOutput::Generation(outcome) => controller.complete_submit(outcome),
                    TaskOutput::Metadata(loaded) => controller.complete_select(loaded),
                }
                completed += 1;
                false
            }
            Poll::Pending => true,
        });
        completed
    }

    /// Poll, then keep frames coming while work is outstanding.
    pub fn poll_and_repaint(&mut self, ctx: &egui::Context, controller: &mut BoardController) {
        let completed = self.poll(controller);
        if completed > 0 || !self.is_empty() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptboard_core::{
        Decoration, EditorImplementation, EditorResult, GenerationResult, MemoryEditor, ObjectDataPair,
        ObjectLocation,
    };
    use std::future::poll_fn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Editor whose generation stays pending until released.
    struct GatedEditor {
        open: Arc<AtomicBool>,
    }

    impl EditorImplementation for GatedEditor {
        fn get_object_locations(&self) -> Vec<ObjectLocation> {
            vec![ObjectLocation::new("a", 0.0, 0.0, 50.0, 50.0)]
        }

        fn generate_from_prompt(&self, _prompt: &str) -> BoxFuture<'_, EditorResult<GenerationResult>> {
            let open = Arc::clone(&self.open);
            Box::pin(poll_fn(move |_| {
                if open.load(Ordering::SeqCst) {
                    Poll::Ready(Ok(GenerationResult {
                        decoration: Decoration::new(()),
                        width: 320.0,
                        height: 480.0,
                    }))
                } else {
                    Poll::Pending
                }
            }))
        }

        fn set_object_location(&self, _id: &str, _location: &ObjectLocation) -> EditorResult<()> {
            Ok(())
        }

        fn get_object_data(&self, _id: &str) -> BoxFuture<'_, EditorResult<Vec<ObjectDataPair>>> {
            Box::pin(async { Ok(vec![ObjectDataPair::new("name", "A")]) })
        }

        fn set_object_data(&self, _id: &str, _pairs: &[ObjectDataPair]) -> EditorResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ready_tasks_complete_in_one_poll() {
        let mut controller = BoardController::new(Arc::new(MemoryEditor::with_seed(11)));
        let mut tasks = TaskRunner::new();

        let generation = controller.begin_submit().unwrap();
        tasks.spawn_generation(generation);
        assert_eq!(tasks.len(), 1);

        assert_eq!(tasks.poll(&mut controller), 1);
        assert!(tasks.is_empty());
        assert!(!controller.is_pending());
        assert_eq!(controller.objects().len(), 5);
    }

    #[test]
    fn test_pending_generation_survives_polls() {
        let open = Arc::new(AtomicBool::new(false));
        let editor = GatedEditor {
            open: Arc::clone(&open),
        };
        let mut controller = BoardController::new(Arc::new(editor));
        let mut tasks = TaskRunner::new();

        tasks.spawn_generation(controller.begin_submit().unwrap());
        assert_eq!(tasks.poll(&mut controller), 0);
        assert_eq!(tasks.poll(&mut controller), 0);
        assert!(controller.is_pending());

        open.store(true, Ordering::SeqCst);
        assert_eq!(tasks.poll(&mut controller), 1);
        assert!(!controller.is_pending());
        assert!((controller.board().width() - 320.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metadata_task_fills_panel() {
        let open = Arc::new(AtomicBool::new(true));
        let mut controller = BoardController::new(Arc::new(GatedEditor { open }));
        let mut tasks = TaskRunner::new();

        tasks.spawn_metadata(controller.begin_select(0).unwrap());
        assert!(controller.metadata_panel().is_none());
        tasks.poll(&mut controller);
        assert_eq!(controller.metadata_panel().unwrap().value("name"), Some("A"));
    }
}
