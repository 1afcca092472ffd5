use crate::config::{ConfigError, HighlighterConfig};
use crate::debounce::Debouncer;
use crate::error::HighlightError;
use crate::events::HighlightEvents;
use crate::render::{HighlightRenderer, apply_rendered_highlight};
use core_types::Point;
use dom::{Document, NodeKey, Range, traverse};
use highlight_core::{
    CUSTOM_HIGHLIGHT_ATTR, ContainmentCache, HIGHLIGHT_ID_ATTR, HighlightId, HighlightRecord,
    HighlightStore, TextSelection, Viewport, adjusted_selection, find_text_in_element,
    is_already_highlighted, is_valid_selection, is_within_existing_highlight, unwrap_highlight,
    wrap_range_as_highlight, wrap_range_in,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Re-entrancy state of the selection processing cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProcessingGuard {
    #[default]
    Idle,
    Running,
    /// A confirmation UI was opened; released on the next animation frame.
    AwaitingFrame,
}

/// A transient highlight waiting for the user to confirm or cancel it.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingConfirmation {
    pub id: HighlightId,
    /// Document coordinates for the confirmation UI.
    pub position: Point,
    /// Becomes `true` on the animation frame after creation.
    pub visible: bool,
}

/// An already known annotation to restore. Descriptors with the same
/// `(text, start_offset, end_offset)` are applied once.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreselectedContent {
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Why a selection did not become a highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing selected, a caret, or only whitespace.
    NoSelection,
    /// Crosses elements without permission.
    Invalid,
    OutsideContainer,
    /// Intersects or sits inside an existing highlight.
    Overlapping,
    /// The tree or the renderer failed; nothing was left behind.
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    Highlighted(HighlightId),
    AwaitingConfirmation(HighlightId),
    Rejected(Rejection),
}

/// Turns user selections inside one container element into highlights.
///
/// The highlighter never owns the [`Document`]. Hosts forward input to the
/// `on_*` handlers, call [`poll`](Self::poll) from their event loop so the
/// debounced selection can run, and call
/// [`on_animation_frame`](Self::on_animation_frame) once per frame.
pub struct Highlighter<E = ()> {
    config: HighlighterConfig,
    container: NodeKey,
    store: HighlightStore,
    cache: ContainmentCache,
    debouncer: Debouncer,
    guard: ProcessingGuard,
    current: Option<TextSelection>,
    pending: Option<PendingConfirmation>,
    events: E,
    renderer: Option<Box<dyn HighlightRenderer>>,
}

impl<E: HighlightEvents> Highlighter<E> {
    /// Bind a highlighter to `container`. Fails when `config` does not
    /// validate, e.g. an unusable `highlight_element` tag.
    pub fn new(
        container: NodeKey,
        config: HighlighterConfig,
        events: E,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let debouncer = Debouncer::new(config.debounce());
        Ok(Self {
            config,
            container,
            store: HighlightStore::new(),
            cache: ContainmentCache::new(),
            debouncer,
            guard: ProcessingGuard::Idle,
            current: None,
            pending: None,
            events,
            renderer: None,
        })
    }

    /// Render new selection highlights through `renderer` instead of the
    /// configured style.
    pub fn with_renderer(mut self, renderer: impl HighlightRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn config(&self) -> &HighlighterConfig {
        &self.config
    }

    pub fn container(&self) -> NodeKey {
        self.container
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn store(&self) -> &HighlightStore {
        &self.store
    }

    /// Selections of every highlight, transient ones included, ordered by
    /// document position.
    pub fn highlights(&self) -> Vec<&TextSelection> {
        let mut selections: Vec<_> = self.store.iter().map(|r| &r.selection).collect();
        selections.sort_by(|a, b| {
            (a.position.y, a.position.x)
                .partial_cmp(&(b.position.y, b.position.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        selections
    }

    /// The last selection that passed validation, until it is cleared.
    pub fn selection(&self) -> Option<&TextSelection> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn guard(&self) -> ProcessingGuard {
        self.guard
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.debouncer.cancel();
        }
    }

    /// The selection that would be processed right now, without side effects.
    pub fn current_text_selection(
        &self,
        doc: &Document,
        viewport: &dyn Viewport,
    ) -> Option<TextSelection> {
        if !self.config.enabled {
            return None;
        }
        adjusted_selection(doc, viewport, self.config.selection_boundary)
    }

    // ---------------------------------------------------------------------
    // Selection cycle
    // ---------------------------------------------------------------------

    /// A pointer was released inside the container: (re)start the debounce
    /// window.
    pub fn on_pointer_up(&mut self, now: Instant) {
        if !self.config.enabled || self.guard != ProcessingGuard::Idle {
            return;
        }
        if self.pending.is_some() {
            log::trace!(target: "highlighter", "selection ignored while a confirmation is open");
            return;
        }
        self.debouncer.schedule(now);
    }

    /// Run the debounced selection cycle if its window has elapsed.
    pub fn poll(
        &mut self,
        doc: &mut Document,
        viewport: &dyn Viewport,
        now: Instant,
    ) -> Option<SelectionOutcome> {
        if !self.debouncer.fire(now) {
            return None;
        }
        if !self.config.enabled || self.guard != ProcessingGuard::Idle {
            return None;
        }
        Some(self.process_selection(doc, viewport))
    }

    fn process_selection(
        &mut self,
        doc: &mut Document,
        viewport: &dyn Viewport,
    ) -> SelectionOutcome {
        self.guard = ProcessingGuard::Running;

        let Some(selection) = adjusted_selection(doc, viewport, self.config.selection_boundary)
        else {
            return self.reject(Rejection::NoSelection);
        };
        if !is_valid_selection(Some(&selection), self.config.allow_cross_element_selection) {
            return self.reject(Rejection::Invalid);
        }
        let range = selection.range;
        if !doc.is_inclusive_ancestor(self.container, range.start.node)
            || !doc.is_inclusive_ancestor(self.container, range.end.node)
        {
            return self.reject(Rejection::OutsideContainer);
        }
        if self.is_blocked(doc, &range) {
            doc.selection_mut().remove_all_ranges();
            return self.reject(Rejection::Overlapping);
        }

        self.current = Some(selection.clone());
        self.events.on_text_selected(&selection);

        let id = HighlightId::generate("highlight");
        let wrapped = if self.renderer.is_some() {
            self.wrap_custom(doc, &selection, &id)
        } else {
            self.wrap_styled(doc, &range, &id)
        };
        let element = match wrapped {
            Ok(element) => element,
            Err(err) => {
                log::error!(target: "highlighter", "error creating highlight: {err}");
                return self.reject(Rejection::Failed);
            }
        };

        let confirm = self.config.confirm_highlights;
        let mut record = HighlightRecord::new(id.clone(), element, selection.clone());
        record.transient = confirm;
        record.custom = self.renderer.is_some();
        self.store.insert(record);
        log::debug!(target: "highlighter", "created {id} for {:?}", selection.text);

        if confirm {
            let scroll = viewport.scroll_offset();
            let rect = selection.bounding_rect;
            self.pending = Some(PendingConfirmation {
                id: id.clone(),
                position: Point::new(
                    rect.left() + scroll.x,
                    rect.top() + scroll.y - self.config.confirmation_offset_y,
                ),
                visible: false,
            });
            self.guard = ProcessingGuard::AwaitingFrame;
            return SelectionOutcome::AwaitingConfirmation(id);
        }

        self.events.on_text_highlighted(&selection);
        self.guard = ProcessingGuard::Idle;
        if self.config.clear_selection_after_highlight {
            doc.selection_mut().remove_all_ranges();
        }
        SelectionOutcome::Highlighted(id)
    }

    fn reject(&mut self, reason: Rejection) -> SelectionOutcome {
        log::trace!(target: "highlighter", "selection rejected: {reason:?}");
        self.current = None;
        self.guard = ProcessingGuard::Idle;
        SelectionOutcome::Rejected(reason)
    }

    fn is_blocked(&mut self, doc: &Document, range: &Range) -> bool {
        is_already_highlighted(doc, range, &self.store)
            || is_within_existing_highlight(doc, range, self.container, &mut self.cache)
    }

    fn wrap_styled(
        &self,
        doc: &mut Document,
        range: &Range,
        id: &HighlightId,
    ) -> Result<NodeKey, HighlightError> {
        let element = wrap_range_as_highlight(
            doc,
            range,
            &self.config.highlight_element,
            self.config.highlight_style.as_ref(),
        )?;
        if let Err(err) = doc.set_attribute(element, HIGHLIGHT_ID_ATTR, id.as_str()) {
            discard(doc, element);
            return Err(err.into());
        }
        Ok(element)
    }

    fn wrap_custom(
        &mut self,
        doc: &mut Document,
        selection: &TextSelection,
        id: &HighlightId,
    ) -> Result<NodeKey, HighlightError> {
        let element = doc.create_element("span");
        doc.set_attribute(element, HIGHLIGHT_ID_ATTR, id.as_str())?;
        doc.set_attribute(element, CUSTOM_HIGHLIGHT_ATTR, "true")?;
        wrap_range_in(doc, &selection.range, element)?;

        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(element);
        };
        let applied = renderer
            .render(selection)
            .map_err(HighlightError::from)
            .and_then(|rendered| {
                apply_rendered_highlight(doc, element, &rendered).map_err(HighlightError::from)
            });
        if let Err(err) = applied {
            discard(doc, element);
            return Err(err);
        }
        Ok(element)
    }

    /// Release a guard held for the confirmation UI and show it.
    pub fn on_animation_frame(&mut self) {
        if self.guard != ProcessingGuard::AwaitingFrame {
            return;
        }
        self.guard = ProcessingGuard::Idle;
        if let Some(pending) = self.pending.as_mut() {
            pending.visible = true;
        }
    }

    // ---------------------------------------------------------------------
    // Confirmation flow
    // ---------------------------------------------------------------------

    /// Make the pending highlight permanent, replacing its text with `text`
    /// when given and different.
    pub fn confirm_pending(
        &mut self,
        doc: &mut Document,
        text: Option<&str>,
    ) -> Result<HighlightId, HighlightError> {
        let id = self
            .pending
            .as_ref()
            .map(|p| p.id.clone())
            .ok_or(HighlightError::NothingPending)?;
        let record = self
            .store
            .get_mut(id.as_str())
            .ok_or_else(|| HighlightError::UnknownHighlight(id.clone()))?;

        if let Some(text) = text {
            if doc.text_content(record.element) != text {
                doc.set_text_content(record.element, text)?;
                record.selection.text = text.to_string();
            }
        }
        record.transient = false;
        let selection = record.selection.clone();

        self.close_selection_ui();
        if self.guard == ProcessingGuard::AwaitingFrame {
            self.guard = ProcessingGuard::Idle;
        }
        self.events.on_text_highlighted(&selection);
        Ok(id)
    }

    /// Confirmation UI callback: cancel, or confirm with `selection.text`.
    pub fn modify_highlight(
        &mut self,
        doc: &mut Document,
        selection: &TextSelection,
        cancel: bool,
    ) -> Result<(), HighlightError> {
        if cancel {
            self.cancel_pending(doc);
            return Ok(());
        }
        self.confirm_pending(doc, Some(&selection.text)).map(|_| ())
    }

    /// Drop the pending highlight and clear all selection state.
    pub fn cancel_pending(&mut self, doc: &mut Document) {
        if let Some(pending) = self.pending.take() {
            let transient = self
                .store
                .get(pending.id.as_str())
                .is_some_and(|r| r.transient);
            if transient {
                if let Some(record) = self.store.remove(pending.id.as_str()) {
                    self.cache.forget(record.element);
                    discard(doc, record.element);
                    log::debug!(target: "highlighter", "cancelled {}", record.id);
                }
            }
        }
        self.current = None;
        if self.guard == ProcessingGuard::AwaitingFrame {
            self.guard = ProcessingGuard::Idle;
        }
        doc.selection_mut().remove_all_ranges();
    }

    /// Hide the confirmation UI. The highlight stays in the tree, still
    /// transient.
    pub fn close_selection_ui(&mut self) {
        self.pending = None;
    }

    /// A pointer went down on `target`. Cancels a visible confirmation unless
    /// the target is inside the container, inside the confirmation UI, or a
    /// highlight element. Returns whether a confirmation was cancelled.
    pub fn on_pointer_down(
        &mut self,
        doc: &mut Document,
        target: NodeKey,
        inside_confirmation_ui: bool,
    ) -> bool {
        if !self.pending.as_ref().is_some_and(|p| p.visible) {
            return false;
        }
        if inside_confirmation_ui
            || doc.is_inclusive_ancestor(self.container, target)
            || doc.has_attribute(target, HIGHLIGHT_ID_ATTR)
        {
            return false;
        }
        self.cancel_pending(doc);
        true
    }

    // ---------------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------------

    /// A click landed on `target`. With click removal enabled, removes the
    /// highlight it belongs to and returns `true`.
    pub fn on_click(&mut self, doc: &mut Document, target: NodeKey) -> bool {
        if !self.config.remove_highlight_on_click {
            return false;
        }
        let Some(id) = traverse::closest_with_attribute(doc, target, HIGHLIGHT_ID_ATTR)
            .and_then(|el| doc.attribute(el, HIGHLIGHT_ID_ATTR))
            .map(HighlightId::new)
        else {
            return false;
        };
        if !self.store.contains(id.as_str()) {
            return false;
        }
        match self.remove_highlight(doc, id.as_str()) {
            Ok(_) => true,
            Err(err) => {
                log::error!(target: "highlighter", "error removing highlight {id}: {err}");
                false
            }
        }
    }

    /// Unwrap and forget the highlight `id`, returning the selection it was
    /// created from.
    pub fn remove_highlight(
        &mut self,
        doc: &mut Document,
        id: &str,
    ) -> Result<TextSelection, HighlightError> {
        let element = self
            .store
            .get(id)
            .map(|r| r.element)
            .ok_or_else(|| HighlightError::UnknownHighlight(HighlightId::new(id)))?;
        unwrap_highlight(doc, element)?;
        let record = self
            .store
            .remove(id)
            .ok_or_else(|| HighlightError::UnknownHighlight(HighlightId::new(id)))?;
        self.cache.forget(record.element);
        if self.pending.as_ref().is_some_and(|p| p.id == record.id) {
            self.pending = None;
        }
        doc.selection_mut().remove_all_ranges();
        log::debug!(target: "highlighter", "removed {}", record.id);
        self.events.on_highlight_removed(&record.selection);
        Ok(record.selection)
    }

    /// Remove the highlight whose selection has the same text at the same
    /// position as `selection`.
    pub fn remove_highlight_matching(
        &mut self,
        doc: &mut Document,
        selection: &TextSelection,
    ) -> Option<TextSelection> {
        let id = self.store.find_matching(selection)?.id.clone();
        self.remove_highlight(doc, id.as_str()).ok()
    }

    pub fn clear_highlights(&mut self, doc: &mut Document) {
        for record in self.store.drain() {
            discard(doc, record.element);
            self.events.on_highlight_removed(&record.selection);
        }
        self.cache.clear();
        self.pending = None;
        self.current = None;
    }

    // ---------------------------------------------------------------------
    // Programmatic highlighting
    // ---------------------------------------------------------------------

    /// Highlight every free occurrence of `text` under `scope` (the container
    /// when `None` or outside it). Fires `on_text_highlighted` per highlight,
    /// in document order.
    pub fn highlight_text(
        &mut self,
        doc: &mut Document,
        viewport: &dyn Viewport,
        text: &str,
        scope: Option<NodeKey>,
    ) -> Vec<HighlightId> {
        let root = scope
            .filter(|s| doc.is_inclusive_ancestor(self.container, *s))
            .unwrap_or(self.container);
        let created = self.highlight_matches(doc, viewport, root, text, "manual");
        for (_, selection) in &created {
            self.events.on_text_highlighted(selection);
        }
        created.into_iter().map(|(id, _)| id).collect()
    }

    /// Restore known annotations. Fires no callbacks.
    pub fn apply_preselected(
        &mut self,
        doc: &mut Document,
        viewport: &dyn Viewport,
        descriptors: &[PreselectedContent],
    ) -> Vec<HighlightId> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for content in descriptors {
            if !seen.insert(content) {
                continue;
            }
            let created =
                self.highlight_matches(doc, viewport, self.container, &content.text, "preselected");
            ids.extend(created.into_iter().map(|(id, _)| id));
        }
        ids
    }

    /// Wrap each non-overlapping match of `text` under `root`. Matches are
    /// wrapped from last to first so offsets of earlier matches in the same
    /// text node stay valid; the result is in document order.
    fn highlight_matches(
        &mut self,
        doc: &mut Document,
        viewport: &dyn Viewport,
        root: NodeKey,
        text: &str,
        prefix: &str,
    ) -> Vec<(HighlightId, TextSelection)> {
        let mut created = Vec::new();
        for range in find_text_in_element(doc, root, text).into_iter().rev() {
            if self.is_blocked(doc, &range) {
                continue;
            }
            let selection = TextSelection::measure(doc, viewport, range, text);
            let id = HighlightId::generate(prefix);
            match self.wrap_styled(doc, &range, &id) {
                Ok(element) => {
                    self.store
                        .insert(HighlightRecord::new(id.clone(), element, selection.clone()));
                    created.push((id, selection));
                }
                Err(err) => {
                    log::error!(target: "highlighter", "error highlighting {text:?}: {err}");
                }
            }
        }
        created.reverse();
        created
    }
}

/// Unwrap `element` where a failure cannot be reported to the caller.
fn discard(doc: &mut Document, element: NodeKey) {
    if let Err(err) = unwrap_highlight(doc, element) {
        log::error!(target: "highlighter", "error unwrapping {element:?}: {err}");
    }
}
