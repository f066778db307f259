//! The compile panel: state, lifecycle, debounced compile scheduling,
//! response rendering and colour correlation.

pub mod colours;
pub mod debounce;
pub mod saved;

pub use debounce::Debouncer;
pub use saved::SavedPanelState;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::catalog::{CompilerCatalog, CompilerDescriptor};
use crate::config::WorkspaceConfig;
use crate::core::{EventQueue, WorkspaceEvent};
use crate::models::{
    fake_asm, now_millis, AsmLine, BufferId, Colour, CompileRequest, CompileResult, FilterSet,
    FilterToggle, PanelId,
};
use crate::services::ports::{LayoutStore, OutputView};

const DEFAULT_SOURCE_BUFFER: BufferId = BufferId(1);

/// One compile-and-display panel bound to a single source buffer.
///
/// All mutation happens on the hub's thread; the only asynchronous boundary
/// is the transport, which hands results back through the hub.
pub struct CompilerPanel {
    id: PanelId,
    source_buffer: BufferId,
    /// Resolved compiler id; always a catalog member, `None` only when the
    /// catalog itself is empty.
    compiler: Option<String>,
    options: String,
    filters: FilterSet,
    source: String,
    assembly: Vec<AsmLine>,
    catalog: Arc<CompilerCatalog>,
    view: Box<dyn OutputView>,
    debouncer: Debouncer,
}

impl CompilerPanel {
    /// Builds a panel from saved layout state where present, falling back
    /// field by field to configured defaults. Source and assembly start
    /// empty; both are transient and re-derived.
    pub fn open(
        id: PanelId,
        catalog: Arc<CompilerCatalog>,
        config: &WorkspaceConfig,
        view: Box<dyn OutputView>,
        toggles: &[FilterToggle],
        saved: Option<&SavedPanelState>,
    ) -> Self {
        let compiler = catalog
            .resolve_saved(saved.and_then(|s| s.compiler.as_deref()))
            .map(|c| c.id.clone());
        let options = saved
            .and_then(|s| s.options.clone())
            .unwrap_or_else(|| config.default_options.clone());
        let filters = saved
            .and_then(|s| s.filters.clone())
            .unwrap_or_else(|| FilterSet::from_toggles(toggles));
        let source_buffer = saved
            .and_then(|s| s.source_buffer)
            .unwrap_or(DEFAULT_SOURCE_BUFFER);

        Self {
            id,
            source_buffer,
            compiler,
            options,
            filters,
            source: String::new(),
            assembly: Vec::new(),
            catalog,
            view,
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn source_buffer(&self) -> BufferId {
        self.source_buffer
    }

    pub fn compiler(&self) -> Option<&CompilerDescriptor> {
        self.compiler.as_deref().and_then(|id| self.catalog.get(id))
    }

    pub fn options(&self) -> &str {
        &self.options
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn assembly(&self) -> &[AsmLine] {
        &self.assembly
    }

    /// Emits the persistable slice of state. Source and assembly are not
    /// part of it, and the id stays with the layout manager.
    pub fn saved_state(&self) -> SavedPanelState {
        SavedPanelState {
            id: None,
            compiler: self.compiler.clone(),
            options: Some(self.options.clone()),
            source_buffer: Some(self.source_buffer),
            filters: Some(self.filters.clone()),
        }
    }

    pub fn set_compiler(&mut self, id: &str, now: Instant, layout: &mut dyn LayoutStore) {
        self.compiler = self.catalog.resolve(id).map(|c| c.id.clone());
        self.save_state(layout);
        self.request_compile(now);
    }

    pub fn set_options(&mut self, options: &str, now: Instant, layout: &mut dyn LayoutStore) {
        self.options = options.to_string();
        self.save_state(layout);
        self.request_compile(now);
    }

    pub fn set_filters(&mut self, filters: FilterSet, now: Instant, layout: &mut dyn LayoutStore) {
        self.filters = filters;
        self.save_state(layout);
        self.request_compile(now);
    }

    /// Editor-driven; not persisted, unlike the other mutators.
    pub fn set_source(&mut self, text: String, now: Instant) {
        self.source = text;
        self.request_compile(now);
    }

    /// Snapshots the current state and schedules it behind the debouncer.
    /// Empty source or an unresolvable compiler is a no-op: no request is
    /// issued and the prior output is left standing.
    pub fn request_compile(&mut self, now: Instant) {
        if self.source.is_empty() {
            return;
        }
        let Some(compiler) = self.compiler.clone() else {
            return;
        };

        let request = CompileRequest {
            source_buffer: self.source_buffer,
            source: self.source.clone(),
            compiler,
            options: self.options.clone(),
            filters: self.filters.clone(),
            issued_at: now_millis(),
        };
        self.debouncer.schedule(now, request);
    }

    /// Yields the coalesced request once the quiescence window has elapsed.
    pub fn poll_request(&mut self, now: Instant) -> Option<CompileRequest> {
        self.debouncer.poll(now)
    }

    /// Applies a compile outcome: replaces the assembly (a single synthetic
    /// line when the service produced none), rewrites the output view and
    /// announces the result on the bus. In-flight results are applied even
    /// if the panel state changed after submission.
    pub fn apply_response(
        &mut self,
        request: &CompileRequest,
        result: CompileResult,
        events: &mut EventQueue,
    ) {
        tracing::debug!(
            compiler = %request.compiler,
            options = %request.options,
            code = ?result.code,
            elapsed_ms = now_millis().saturating_sub(request.issued_at),
            "compile finished"
        );

        let assembly = result
            .asm
            .clone()
            .unwrap_or_else(|| fake_asm("[no output]"));
        self.set_assembly(assembly);

        if let Some(compiler) = self.compiler() {
            events.publish(WorkspaceEvent::CompileResult {
                panel: self.id,
                compiler: compiler.clone(),
                result,
            });
        }
    }

    fn set_assembly(&mut self, assembly: Vec<AsmLine>) {
        let text = assembly
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.assembly = assembly;
        self.view.set_text(&text);
    }

    /// Re-highlights the output view from a source-line colour mapping.
    /// Safe with mappings that are stale relative to the current assembly.
    pub fn apply_colours(&mut self, source_colours: &FxHashMap<u32, Colour>) {
        self.view.clear_highlights();
        for (index, colour) in colours::asm_colours(&self.assembly, source_colours) {
            self.view.highlight_line(index, colour);
        }
    }

    /// Bus subscription: reacts only to events for the bound source buffer.
    pub fn on_event(&mut self, event: &WorkspaceEvent, now: Instant) {
        match event {
            WorkspaceEvent::EditorChange { buffer, text } if *buffer == self.source_buffer => {
                self.set_source(text.clone(), now);
            }
            WorkspaceEvent::Colours { buffer, colours } if *buffer == self.source_buffer => {
                self.apply_colours(colours);
            }
            _ => {}
        }
    }

    fn save_state(&self, layout: &mut dyn LayoutStore) {
        layout.save_panel(self.id, &self.saved_state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct ViewLog {
        text: String,
        highlights: Vec<(usize, Colour)>,
        clears: usize,
    }

    #[derive(Clone, Default)]
    struct RecordingView {
        log: Rc<RefCell<ViewLog>>,
    }

    impl OutputView for RecordingView {
        fn set_text(&mut self, text: &str) {
            self.log.borrow_mut().text = text.to_string();
        }

        fn clear_highlights(&mut self) {
            let mut log = self.log.borrow_mut();
            log.highlights.clear();
            log.clears += 1;
        }

        fn highlight_line(&mut self, index: usize, colour: Colour) {
            self.log.borrow_mut().highlights.push((index, colour));
        }
    }

    #[derive(Default)]
    struct MemoryLayout {
        saves: Vec<(PanelId, SavedPanelState)>,
    }

    impl LayoutStore for MemoryLayout {
        fn save_panel(&mut self, panel: PanelId, state: &SavedPanelState) {
            self.saves.push((panel, state.clone()));
        }
    }

    fn config() -> WorkspaceConfig {
        WorkspaceConfig::default()
    }

    fn catalog() -> Arc<CompilerCatalog> {
        let config = config();
        Arc::new(CompilerCatalog::new(
            config.compilers.clone(),
            &config.default_compiler,
        ))
    }

    fn open_panel(saved: Option<SavedPanelState>) -> (CompilerPanel, RecordingView) {
        let view = RecordingView::default();
        let panel = CompilerPanel::open(
            PanelId(1),
            catalog(),
            &config(),
            Box::new(view.clone()),
            &[
                FilterToggle::new("labels", true),
                FilterToggle::new("directives", false),
            ],
            saved.as_ref(),
        );
        (panel, view)
    }

    #[test]
    fn defaults_come_from_config_and_toggles() {
        let (panel, _view) = open_panel(None);
        assert_eq!(panel.compiler().map(|c| c.id.as_str()), Some("gcc"));
        assert_eq!(panel.options(), "-O2");
        assert!(panel.filters().contains("labels"));
        assert!(!panel.filters().contains("directives"));
        assert_eq!(panel.source_buffer(), BufferId(1));
        assert!(panel.source().is_empty());
        assert!(panel.assembly().is_empty());
    }

    #[test]
    fn unknown_restored_compiler_falls_back_to_default() {
        let (panel, _view) = open_panel(Some(SavedPanelState {
            compiler: Some("nonexistent-id".to_string()),
            ..Default::default()
        }));
        assert_eq!(panel.compiler().map(|c| c.id.as_str()), Some("gcc"));
    }

    #[test]
    fn saved_state_round_trips_through_open() {
        let (mut panel, _view) = open_panel(None);
        let mut layout = MemoryLayout::default();
        let now = Instant::now();
        panel.set_compiler("clang", now, &mut layout);
        panel.set_options("-O3 -march=native", now, &mut layout);

        let saved = panel.saved_state();
        let (restored, _view) = open_panel(Some(saved.clone()));
        assert_eq!(restored.saved_state(), saved);
        assert_eq!(restored.compiler().map(|c| c.id.as_str()), Some("clang"));
        assert_eq!(restored.options(), "-O3 -march=native");
        assert_eq!(restored.filters(), panel.filters());
        assert_eq!(restored.source_buffer(), panel.source_buffer());
    }

    #[test]
    fn empty_source_issues_no_request_and_keeps_output() {
        let (mut panel, _view) = open_panel(None);
        let now = Instant::now();
        panel.set_source("int main() {}".to_string(), now);
        assert!(panel
            .poll_request(now + Duration::from_millis(300))
            .is_some());

        let mut events = EventQueue::new();
        let request = CompileRequest {
            source_buffer: BufferId(1),
            source: "int main() {}".to_string(),
            compiler: "gcc".to_string(),
            options: "-O2".to_string(),
            filters: FilterSet::new(),
            issued_at: 0,
        };
        panel.apply_response(
            &request,
            CompileResult {
                asm: Some(vec![AsmLine::new("  ret", Some(1))]),
                code: Some(0),
            },
            &mut events,
        );
        let before = panel.assembly().to_vec();

        panel.set_source(String::new(), now);
        assert!(panel
            .poll_request(now + Duration::from_millis(300))
            .is_none());
        assert_eq!(panel.assembly(), before.as_slice());
    }

    #[test]
    fn mutators_persist_state_set_source_does_not() {
        let (mut panel, _view) = open_panel(None);
        let mut layout = MemoryLayout::default();
        let now = Instant::now();

        panel.set_source("int main() {}".to_string(), now);
        assert!(layout.saves.is_empty());

        panel.set_filters(
            ["intel".to_string()].into_iter().collect(),
            now,
            &mut layout,
        );
        panel.set_options("-O0", now, &mut layout);
        assert_eq!(layout.saves.len(), 2);
        let (panel_id, last) = layout.saves.last().expect("saved state");
        assert_eq!(*panel_id, PanelId(1));
        assert_eq!(last.options.as_deref(), Some("-O0"));
    }

    #[test]
    fn response_without_asm_renders_placeholder_line() {
        let (mut panel, view) = open_panel(None);
        let now = Instant::now();
        panel.set_source("int main() {}".to_string(), now);
        let request = panel
            .poll_request(now + Duration::from_millis(300))
            .expect("request fired");

        let mut events = EventQueue::new();
        panel.apply_response(&request, CompileResult::default(), &mut events);

        assert_eq!(view.log.borrow().text, "[no output]");
        assert_eq!(panel.assembly().len(), 1);
        assert!(panel.assembly()[0].synthetic);
        assert!(matches!(
            events.pop(),
            Some(WorkspaceEvent::CompileResult { panel: PanelId(1), .. })
        ));
    }

    #[test]
    fn assembly_text_is_newline_joined_in_order() {
        let (mut panel, view) = open_panel(None);
        let now = Instant::now();
        panel.set_source("int main() {}".to_string(), now);
        let request = panel
            .poll_request(now + Duration::from_millis(300))
            .expect("request fired");

        let mut events = EventQueue::new();
        panel.apply_response(
            &request,
            CompileResult {
                asm: Some(vec![
                    AsmLine::new("main:", None),
                    AsmLine::new("  ret", Some(1)),
                ]),
                code: Some(0),
            },
            &mut events,
        );
        assert_eq!(view.log.borrow().text, "main:\n  ret");
    }

    #[test]
    fn colours_for_other_buffers_are_ignored() {
        let (mut panel, view) = open_panel(None);
        let now = Instant::now();
        panel.set_source("int main() {}".to_string(), now);
        let request = panel
            .poll_request(now + Duration::from_millis(300))
            .expect("request fired");
        let mut events = EventQueue::new();
        panel.apply_response(
            &request,
            CompileResult {
                asm: Some(vec![AsmLine::new("  ret", Some(1))]),
                code: Some(0),
            },
            &mut events,
        );

        let colours: FxHashMap<u32, Colour> = [(1, Colour(0xff0000))].into_iter().collect();
        panel.on_event(
            &WorkspaceEvent::Colours {
                buffer: BufferId(99),
                colours: colours.clone(),
            },
            now,
        );
        assert!(view.log.borrow().highlights.is_empty());

        panel.on_event(
            &WorkspaceEvent::Colours {
                buffer: BufferId(1),
                colours,
            },
            now,
        );
        assert_eq!(view.log.borrow().highlights, vec![(0, Colour(0xff0000))]);
    }

    #[test]
    fn reapplying_colours_clears_before_highlighting() {
        let (mut panel, view) = open_panel(None);
        let now = Instant::now();
        panel.set_source("int main() {}".to_string(), now);
        let request = panel
            .poll_request(now + Duration::from_millis(300))
            .expect("request fired");
        let mut events = EventQueue::new();
        panel.apply_response(
            &request,
            CompileResult {
                asm: Some(vec![AsmLine::new("  ret", Some(1))]),
                code: Some(0),
            },
            &mut events,
        );

        let colours: FxHashMap<u32, Colour> = [(1, Colour(0xff0000))].into_iter().collect();
        panel.apply_colours(&colours);
        panel.apply_colours(&colours);
        let log = view.log.borrow();
        assert_eq!(log.highlights, vec![(0, Colour(0xff0000))]);
        assert_eq!(log.clears, 2);
    }

    #[test]
    fn edits_for_unrelated_buffers_do_not_schedule() {
        let (mut panel, _view) = open_panel(None);
        let now = Instant::now();
        panel.on_event(
            &WorkspaceEvent::EditorChange {
                buffer: BufferId(2),
                text: "int main() {}".to_string(),
            },
            now,
        );
        assert!(panel
            .poll_request(now + Duration::from_millis(300))
            .is_none());
        assert!(panel.source().is_empty());
    }
}
