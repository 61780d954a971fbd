use crate::feed::{FetchOutcome, FetchSettings, NewsItem, Source, SourceRegistry};
use crate::theme::{StyleMap, ThemeVariant};
use chrono::{DateTime, Local};
use ratatui::style::Style;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;

// ============================================================================
// Focus and Source State
// ============================================================================

/// Which panel receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    News,
}

/// Fetch state of one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    /// Not selected, nothing fetched.
    Idle,
    Loading,
    Ready(FetchOutcome),
}

/// A registry source together with its checkbox and latest fetch state.
#[derive(Debug, Clone)]
pub struct SourceSlot {
    pub source: Source,
    pub selected: bool,
    pub state: SourceState,
    /// Bumped on every new fetch or deselection; results carrying an older
    /// generation are stale and dropped.
    generation: u64,
}

/// Everything a background task needs to fetch one source.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub index: usize,
    pub generation: u64,
    pub source: Source,
}

/// Events sent from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    SourceFetched {
        index: usize,
        generation: u64,
        outcome: FetchOutcome,
    },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub slots: Vec<SourceSlot>,
    pub settings: Arc<FetchSettings>,
    pub http_client: reqwest::Client,
    /// Bounds the number of fetches in flight.
    pub fetch_permits: Arc<Semaphore>,

    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub focus: Focus,
    pub sidebar_cursor: usize,
    /// Index into the selected sources, not into `slots`.
    pub active_tab: usize,
    pub selected_item: usize,
    /// Expanded entries of the active tab, by item index.
    pub expanded: HashSet<usize>,

    pub show_help: bool,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Time of the last fetch round that completed.
    pub last_updated: Option<DateTime<Local>>,
    pub spinner_frame: usize,
    pub needs_redraw: bool,
}

impl App {
    /// Create the application state with every registry source selected.
    pub fn new(
        registry: &SourceRegistry,
        settings: FetchSettings,
        http_client: reqwest::Client,
        theme_variant: ThemeVariant,
    ) -> Self {
        let slots = registry
            .iter()
            .map(|source| SourceSlot {
                source: source.clone(),
                selected: true,
                state: SourceState::Idle,
                generation: 0,
            })
            .collect();
        let fetch_permits = Arc::new(Semaphore::new(settings.max_concurrent.max(1)));

        Self {
            slots,
            settings: Arc::new(settings),
            http_client,
            fetch_permits,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            focus: Focus::News,
            sidebar_cursor: 0,
            active_tab: 0,
            selected_item: 0,
            expanded: HashSet::new(),
            show_help: false,
            status_message: None,
            last_updated: None,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }

    /// Restrict the initial selection to the given slot indices.
    pub fn select_only(&mut self, indices: &[usize]) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.selected = indices.contains(&i);
        }
        self.clamp_active_tab();
    }

    // ------------------------------------------------------------------------
    // Selection and tabs
    // ------------------------------------------------------------------------

    /// Slot indices of the selected sources, in registry order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn active_slot_index(&self) -> Option<usize> {
        self.selected_indices().get(self.active_tab).copied()
    }

    pub fn active_slot(&self) -> Option<&SourceSlot> {
        self.active_slot_index().and_then(|i| self.slots.get(i))
    }

    /// Items of the active tab; empty while loading or when unavailable.
    pub fn active_items(&self) -> &[NewsItem] {
        match self.active_slot().map(|slot| &slot.state) {
            Some(SourceState::Ready(outcome)) => outcome.items(),
            _ => &[],
        }
    }

    pub fn selected_news_item(&self) -> Option<&NewsItem> {
        self.active_items().get(self.selected_item)
    }

    fn reset_item_view(&mut self) {
        self.selected_item = 0;
        self.expanded.clear();
    }

    fn clamp_active_tab(&mut self) {
        let count = self.selected_indices().len();
        let clamped = self.active_tab.min(count.saturating_sub(1));
        if clamped != self.active_tab {
            self.active_tab = clamped;
            self.reset_item_view();
        }
    }

    pub fn next_tab(&mut self) {
        let count = self.selected_indices().len();
        if count > 1 {
            self.active_tab = (self.active_tab + 1) % count;
            self.reset_item_view();
        }
    }

    pub fn prev_tab(&mut self) {
        let count = self.selected_indices().len();
        if count > 1 {
            self.active_tab = (self.active_tab + count - 1) % count;
            self.reset_item_view();
        }
    }

    /// Flip the checkbox of a source.
    ///
    /// Selecting a source starts a fresh fetch and returns its ticket.
    /// Deselecting clears its items and invalidates any fetch in flight.
    pub fn toggle_source(&mut self, index: usize) -> Option<FetchTicket> {
        let previously_active = self.active_slot_index();
        let slot = self.slots.get_mut(index)?;
        slot.selected = !slot.selected;
        let now_selected = slot.selected;

        let ticket = if now_selected {
            self.begin_fetch(index)
        } else {
            let slot = &mut self.slots[index];
            slot.state = SourceState::Idle;
            slot.generation = slot.generation.wrapping_add(1);
            None
        };

        // Keep the same tab in view when possible
        match previously_active.and_then(|active| {
            self.selected_indices().iter().position(|&i| i == active)
        }) {
            Some(tab) => self.active_tab = tab,
            None => {
                self.reset_item_view();
                self.clamp_active_tab();
            }
        }

        ticket
    }

    // ------------------------------------------------------------------------
    // Fetch bookkeeping
    // ------------------------------------------------------------------------

    /// Mark a selected source as loading and hand out a ticket for its fetch.
    pub fn begin_fetch(&mut self, index: usize) -> Option<FetchTicket> {
        let slot = self.slots.get_mut(index)?;
        if !slot.selected {
            return None;
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = SourceState::Loading;
        Some(FetchTicket {
            index,
            generation: slot.generation,
            source: slot.source.clone(),
        })
    }

    /// Start a fetch for every selected source (initial load and refresh).
    pub fn begin_fetch_all(&mut self) -> Vec<FetchTicket> {
        let tickets = self
            .selected_indices()
            .into_iter()
            .filter_map(|i| self.begin_fetch(i))
            .collect();
        self.reset_item_view();
        tickets
    }

    /// Store a fetch result. Returns `false` when the result is stale.
    pub fn apply_fetch(&mut self, index: usize, generation: u64, outcome: FetchOutcome) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if !slot.selected || slot.generation != generation {
            tracing::debug!(
                source = %slot.source.label,
                generation,
                current = slot.generation,
                "Dropping stale fetch result"
            );
            return false;
        }
        slot.state = SourceState::Ready(outcome);

        if self.loading_progress().is_none() {
            self.last_updated = Some(Local::now());
        }

        // Items of the active tab may have shrunk
        let len = self.active_items().len();
        if self.selected_item >= len {
            self.selected_item = len.saturating_sub(1);
        }
        true
    }

    /// `(finished, total)` over the selected sources while any is still loading.
    pub fn loading_progress(&self) -> Option<(usize, usize)> {
        let selected = self.slots.iter().filter(|s| s.selected);
        let (total, loading) = selected.fold((0, 0), |(total, loading), slot| {
            let is_loading = matches!(slot.state, SourceState::Loading);
            (total + 1, loading + usize::from(is_loading))
        });
        (loading > 0).then_some((total - loading, total))
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::News,
            Focus::News => Focus::Sidebar,
        };
    }

    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Sidebar => {
                if self.sidebar_cursor + 1 < self.slots.len() {
                    self.sidebar_cursor += 1;
                }
            }
            Focus::News => {
                if self.selected_item + 1 < self.active_items().len() {
                    self.selected_item += 1;
                }
            }
        }
    }

    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Sidebar => self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1),
            Focus::News => self.selected_item = self.selected_item.saturating_sub(1),
        }
    }

    /// Expand or collapse the selected entry of the active tab.
    pub fn toggle_expanded(&mut self) {
        if self.selected_item >= self.active_items().len() {
            return;
        }
        if !self.expanded.remove(&self.selected_item) {
            self.expanded.insert(self.selected_item);
        }
    }

    // ------------------------------------------------------------------------
    // Status and theme
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Cycle to the next theme variant, returning its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.theme_variant = next;
        self.theme = StyleMap::from_palette(&next.palette());
        self.needs_redraw = true;
        next.name()
    }
}
