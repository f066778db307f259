//! The hub: owns every compile panel in a workspace, allocates panel ids,
//! pumps the event bus, polls debouncers and drains transport responses.
//!
//! Everything here runs on one thread. The transport adapter is the only
//! component allowed to cross threads, and it reports back exclusively
//! through the `CompileMessage` channel drained by `tick`.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::catalog::CompilerCatalog;
use crate::config::WorkspaceConfig;
use crate::core::{EventQueue, WorkspaceEvent};
use crate::models::{BufferId, Colour, CompileResult, FilterSet, FilterToggle, PanelId};
use crate::panel::{CompilerPanel, SavedPanelState};
use crate::services::{
    CompileMessage, CompileTransport, HttpCompileService, JsonLayoutStore, LayoutStore,
};

pub struct Hub {
    config: WorkspaceConfig,
    catalog: Arc<CompilerCatalog>,
    panels: FxHashMap<PanelId, CompilerPanel>,
    /// Panel ids in open order; fixes event fan-out and poll order.
    order: Vec<PanelId>,
    next_id: u32,
    events: EventQueue,
    /// Events already fanned out to panels, awaiting pickup by the
    /// embedding workspace (diff panels, timing panels, ...).
    outbound: Vec<WorkspaceEvent>,
    transport: Box<dyn CompileTransport>,
    layout: Box<dyn LayoutStore>,
    responses: Receiver<CompileMessage>,
}

impl Hub {
    pub fn new(
        config: WorkspaceConfig,
        transport: Box<dyn CompileTransport>,
        layout: Box<dyn LayoutStore>,
        responses: Receiver<CompileMessage>,
    ) -> Self {
        let catalog = Arc::new(CompilerCatalog::new(
            config.compilers.clone(),
            &config.default_compiler,
        ));
        Self {
            config,
            catalog,
            panels: FxHashMap::default(),
            order: Vec::new(),
            next_id: 1,
            events: EventQueue::new(),
            outbound: Vec::new(),
            transport,
            layout,
            responses,
        }
    }

    /// Wires the hub to the concrete adapters: HTTP transport against the
    /// configured endpoint and the JSON-backed layout store.
    pub fn with_default_services(config: WorkspaceConfig) -> std::io::Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel();
        let transport = HttpCompileService::new(config.compile_url.clone(), tx)?;
        let layout_path = crate::config::get_layout_path().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Cannot determine layout directory",
            )
        })?;
        let layout = JsonLayoutStore::load(layout_path);
        Ok(Self::new(config, Box::new(transport), Box::new(layout), rx))
    }

    pub fn catalog(&self) -> &Arc<CompilerCatalog> {
        &self.catalog
    }

    pub fn panel(&self, id: PanelId) -> Option<&CompilerPanel> {
        self.panels.get(&id)
    }

    pub fn panel_count(&self) -> usize {
        self.order.len()
    }

    /// Opens a panel, reusing a restored id when the saved state carries one
    /// and allocating a fresh workspace-unique id otherwise. Announces
    /// `CompilerOpen` on the bus.
    pub fn open_panel(
        &mut self,
        saved: Option<SavedPanelState>,
        view: Box<dyn crate::services::OutputView>,
        toggles: &[FilterToggle],
    ) -> PanelId {
        let id = self.allocate_id(saved.as_ref().and_then(|s| s.id));
        let panel = CompilerPanel::open(
            id,
            Arc::clone(&self.catalog),
            &self.config,
            view,
            toggles,
            saved.as_ref(),
        );
        self.panels.insert(id, panel);
        self.order.push(id);
        tracing::info!(panel = id.0, "compiler panel opened");
        self.events.publish(WorkspaceEvent::CompilerOpen { panel: id });
        self.pump(Instant::now());
        id
    }

    /// Closes a panel and announces `CompilerClose`. Requests already in
    /// flight are not aborted; their late responses are dropped in `tick`.
    pub fn close_panel(&mut self, id: PanelId) {
        if self.panels.remove(&id).is_none() {
            return;
        }
        self.order.retain(|panel| *panel != id);
        tracing::info!(panel = id.0, "compiler panel closed");
        self.events
            .publish(WorkspaceEvent::CompilerClose { panel: id });
        self.pump(Instant::now());
    }

    /// Entry point for the external editor widget: a source buffer changed.
    pub fn notify_editor_change(&mut self, buffer: BufferId, text: impl Into<String>) {
        self.events.publish(WorkspaceEvent::EditorChange {
            buffer,
            text: text.into(),
        });
        self.pump(Instant::now());
    }

    /// Entry point for the editor's per-line colour announcements.
    pub fn notify_colours(&mut self, buffer: BufferId, colours: FxHashMap<u32, Colour>) {
        self.events
            .publish(WorkspaceEvent::Colours { buffer, colours });
        self.pump(Instant::now());
    }

    pub fn set_panel_compiler(&mut self, id: PanelId, compiler: &str) {
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.set_compiler(compiler, Instant::now(), self.layout.as_mut());
        }
    }

    pub fn set_panel_options(&mut self, id: PanelId, options: &str) {
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.set_options(options, Instant::now(), self.layout.as_mut());
        }
    }

    pub fn set_panel_filters(&mut self, id: PanelId, filters: FilterSet) {
        if let Some(panel) = self.panels.get_mut(&id) {
            panel.set_filters(filters, Instant::now(), self.layout.as_mut());
        }
    }

    /// One turn of the cooperative loop: apply transport outcomes, dispatch
    /// requests whose quiescence window has elapsed, fan out resulting
    /// events.
    pub fn tick(&mut self, now: Instant) {
        self.drain_responses();
        self.dispatch_due_requests(now);
        self.pump(now);
    }

    /// Hands processed events to the embedding workspace.
    pub fn drain_outbound(&mut self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.outbound)
    }

    fn allocate_id(&mut self, restored: Option<PanelId>) -> PanelId {
        match restored {
            // A restored id that is already open would clobber a live panel;
            // fall through to a fresh allocation instead.
            Some(id) if self.panels.contains_key(&id) => {
                tracing::warn!(panel = id.0, "restored panel id already open, allocating fresh");
                self.fresh_id()
            }
            Some(id) => {
                // Keep fresh ids clear of everything restored so far.
                self.next_id = self.next_id.max(id.0.saturating_add(1));
                id
            }
            None => self.fresh_id(),
        }
    }

    fn fresh_id(&mut self) -> PanelId {
        let id = PanelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn drain_responses(&mut self) {
        while let Ok(message) = self.responses.try_recv() {
            let (panel_id, request, result) = match message {
                CompileMessage::Response {
                    panel,
                    request,
                    result,
                } => (panel, request, result),
                CompileMessage::TransportError {
                    panel,
                    request,
                    error,
                } => {
                    tracing::warn!(panel = panel.0, error = %error, "compile transport failed");
                    (
                        panel,
                        request,
                        CompileResult::error(format!("Remote compilation failed: {error}")),
                    )
                }
            };

            match self.panels.get_mut(&panel_id) {
                Some(panel) => panel.apply_response(&request, result, &mut self.events),
                // The panel closed while the request was in flight.
                None => tracing::debug!(
                    panel = panel_id.0,
                    "dropping compile response for closed panel"
                ),
            }
        }
    }

    fn dispatch_due_requests(&mut self, now: Instant) {
        for id in self.order.clone() {
            if let Some(panel) = self.panels.get_mut(&id) {
                if let Some(request) = panel.poll_request(now) {
                    tracing::debug!(
                        panel = id.0,
                        compiler = %request.compiler,
                        "submitting compile request"
                    );
                    self.transport.submit(id, request);
                }
            }
        }
    }

    fn pump(&mut self, now: Instant) {
        while let Some(event) = self.events.pop() {
            for id in self.order.clone() {
                if let Some(panel) = self.panels.get_mut(&id) {
                    panel.on_event(&event, now);
                }
            }
            self.outbound.push(event);
        }
    }
}
