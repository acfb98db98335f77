//! Application state and input handling

use crossterm::event::KeyCode;
use questlog_catalog::{CatalogClient, CatalogError, GameDetails, GameSummary};
use questlog_library::{
    GameId, GameStatus, LibraryError, LibraryStore, NewEntry, Slot, StatusFilter, StatusUpdate,
    TrackedGame,
};
use ratatui::widgets::ListState;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use crate::requests::{CatalogReply, Requests};

/// Current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Search,
    Detail,
    Library,
    Stats,
}

impl Page {
    /// Pages reachable with Tab, in order
    pub const TABS: [Page; 4] = [Page::Dashboard, Page::Search, Page::Library, Page::Stats];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Search => "Search",
            Page::Detail => "Game Info",
            Page::Library => "Library",
            Page::Stats => "Statistics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Status line message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Featured games region
#[derive(Debug, Clone, PartialEq)]
pub enum Featured {
    Loading,
    Loaded(Vec<GameSummary>),
    Failed,
}

/// Game info page contents
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPane {
    /// Summary shown while the full record loads
    Loading(GameSummary),
    Loaded(GameDetails),
}

impl DetailPane {
    pub fn id(&self) -> &str {
        match self {
            DetailPane::Loading(summary) => &summary.id,
            DetailPane::Loaded(details) => &details.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DetailPane::Loading(summary) => &summary.name,
            DetailPane::Loaded(details) => &details.name,
        }
    }
}

/// Search page state
#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub editing: bool,
    /// `None` while results are hidden
    pub results: Option<Vec<GameSummary>>,
    pub list: ListState,
}

/// Application state
pub struct App<S: Slot> {
    /// Game library
    pub store: LibraryStore<S>,

    /// Catalog requests in flight
    requests: Requests,

    /// Current page
    pub page: Page,

    /// Page to return to when the game info page closes
    return_page: Page,

    /// Library filter
    pub filter: StatusFilter,

    /// Library list state
    pub library_list: ListState,

    pub search: SearchState,

    pub detail: Option<DetailPane>,

    pub featured: Featured,

    /// Featured list state
    pub featured_list: ListState,

    /// Status line message
    pub notice: Option<Notice>,

    /// Should quit
    pub should_quit: bool,
}

impl<S: Slot> App<S> {
    /// Create new application and start loading the featured list
    pub fn new(store: LibraryStore<S>, client: CatalogClient, runtime: Handle) -> Self {
        let mut app = Self {
            store,
            requests: Requests::new(client, runtime),
            page: Page::Dashboard,
            return_page: Page::Dashboard,
            filter: StatusFilter::All,
            library_list: ListState::default(),
            search: SearchState::default(),
            detail: None,
            featured: Featured::Loading,
            featured_list: ListState::default(),
            notice: None,
            should_quit: false,
        };
        app.requests.featured();
        app
    }

    /// Whether a search is outstanding
    pub fn search_loading(&self) -> bool {
        self.requests.search_pending()
    }

    /// Games shown on the library page
    pub fn visible_games(&self) -> Vec<&TrackedGame> {
        self.store.filter(self.filter)
    }

    /// Handle input
    pub fn handle_input(&mut self, key: KeyCode) {
        if self.page == Page::Search && self.search.editing {
            self.handle_search_typing(key);
            return;
        }

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.cycle_page(1);
                return;
            }
            KeyCode::BackTab => {
                self.cycle_page(Page::TABS.len() - 1);
                return;
            }
            KeyCode::Char('/') => {
                self.show_page(Page::Search);
                self.search.editing = true;
                return;
            }
            _ => {}
        }

        match self.page {
            Page::Dashboard => self.handle_dashboard_input(key),
            Page::Search => self.handle_search_input(key),
            Page::Detail => self.handle_detail_input(key),
            Page::Library => self.handle_library_input(key),
            Page::Stats => {}
        }
    }

    /// Apply finished catalog requests
    pub fn poll(&mut self) {
        while let Some(reply) = self.requests.try_recv() {
            match reply {
                CatalogReply::Search {
                    query, result, ..
                } => self.on_search(&query, result),
                CatalogReply::Details { id, result, .. } => self.on_details(&id, result),
                CatalogReply::Featured { result, .. } => self.on_featured(result),
            }
        }
    }

    /// Switch pages, refreshing what the target page shows
    pub fn show_page(&mut self, page: Page) {
        if page != Page::Detail {
            self.detail = None;
        }
        self.page = page;

        match page {
            Page::Dashboard => {
                self.featured = Featured::Loading;
                self.requests.featured();
            }
            Page::Library => self.clamp_library_selection(),
            Page::Search | Page::Detail | Page::Stats => {}
        }
    }

    fn cycle_page(&mut self, step: usize) {
        let current = Page::TABS
            .iter()
            .position(|p| *p == self.page)
            .unwrap_or(0);
        let next = Page::TABS[(current + step) % Page::TABS.len()];
        self.show_page(next);
    }

    /// Handle dashboard input
    fn handle_dashboard_input(&mut self, key: KeyCode) {
        let len = match &self.featured {
            Featured::Loaded(games) => games.len(),
            Featured::Loading | Featured::Failed => 0,
        };

        match key {
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.featured_list, len),
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.featured_list, len),
            KeyCode::Enter => {
                let selected = match (&self.featured, self.featured_list.selected()) {
                    (Featured::Loaded(games), Some(i)) => games.get(i).cloned(),
                    _ => None,
                };
                if let Some(summary) = selected {
                    self.open_detail(summary);
                }
            }
            KeyCode::Char('r') => self.show_page(Page::Dashboard),
            _ => {}
        }
    }

    /// Handle search page input while typing
    fn handle_search_typing(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.search.input.push(c),
            KeyCode::Backspace => {
                self.search.input.pop();
            }
            KeyCode::Enter => self.submit_search(),
            KeyCode::Esc => self.search.editing = false,
            KeyCode::Down => {
                self.search.editing = false;
                let len = self.search.results.as_ref().map_or(0, Vec::len);
                select_next(&mut self.search.list, len);
            }
            _ => {}
        }
    }

    /// Handle search page input while browsing results
    fn handle_search_input(&mut self, key: KeyCode) {
        let len = self.search.results.as_ref().map_or(0, Vec::len);

        match key {
            KeyCode::Char('i') | KeyCode::Char('s') => self.search.editing = true,
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.search.list, len),
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.search.list, len),
            KeyCode::Enter => {
                let selected = self
                    .search
                    .list
                    .selected()
                    .and_then(|i| self.search.results.as_ref()?.get(i).cloned());
                if let Some(summary) = selected {
                    self.hide_search_results();
                    self.search.input.clear();
                    self.open_detail(summary);
                }
            }
            KeyCode::Esc => self.hide_search_results(),
            _ => {}
        }
    }

    /// Handle game info input
    fn handle_detail_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => self.close_detail(),
            KeyCode::Char(c) => {
                if let Some(status) = status_for_key(c) {
                    self.add_detail_to_library(status);
                }
            }
            _ => {}
        }
    }

    /// Handle library input
    fn handle_library_input(&mut self, key: KeyCode) {
        let len = self.visible_games().len();

        match key {
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.library_list, len),
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.library_list, len),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_filter(StatusFilter::ALL.len() - 1),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_filter(1),
            KeyCode::Char('s') => self.cycle_selected_status(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char(c) => {
                if let Some(status) = status_for_key(c) {
                    self.set_selected_status(|_| status);
                }
            }
            _ => {}
        }
    }

    fn cycle_filter(&mut self, step: usize) {
        let current = StatusFilter::ALL
            .iter()
            .position(|f| *f == self.filter)
            .unwrap_or(0);
        self.filter = StatusFilter::ALL[(current + step) % StatusFilter::ALL.len()];
        self.library_list.select(None);
        self.clamp_library_selection();
    }

    fn selected_library_game(&self) -> Option<&TrackedGame> {
        let visible = self.visible_games();
        self.library_list
            .selected()
            .and_then(|i| visible.get(i).copied())
    }

    fn cycle_selected_status(&mut self) {
        self.set_selected_status(GameStatus::next);
    }

    /// Move the selected library game to the status picked from its current one
    fn set_selected_status(&mut self, pick: impl Fn(&GameStatus) -> GameStatus) {
        let Some((id, status)) = self
            .selected_library_game()
            .map(|game| (game.id.clone(), pick(&game.status)))
        else {
            return;
        };

        let result = self.store.update_status(&id, status);
        if let Some(StatusUpdate::NotFound) = self.settle(result) {
            warn!("Selected game {} vanished from the library", id);
        }
        self.clamp_library_selection();
    }

    fn remove_selected(&mut self) {
        let Some(id) = self.selected_library_game().map(|game| game.id.clone()) else {
            return;
        };
        self.remove_game(&id);
    }

    /// Remove a game from the library
    pub fn remove_game(&mut self, id: &GameId) {
        let result = self.store.remove(id);
        self.settle(result);
        self.clamp_library_selection();
    }

    fn add_detail_to_library(&mut self, status: GameStatus) {
        let Some(DetailPane::Loaded(details)) = &self.detail else {
            return;
        };

        let entry = NewEntry::new(details.id.clone(), details.name.clone(), status)
            .with_genres(details.genres.iter().cloned());
        let entry = match &details.image {
            Some(image) => entry.with_image(image.clone()),
            None => entry,
        };

        let result = self.store.add_or_update(entry);
        self.settle(result);
        self.close_detail();
    }

    fn open_detail(&mut self, summary: GameSummary) {
        info!("Opening game {}", summary.id);
        if self.page != Page::Detail {
            self.return_page = self.page;
        }
        self.requests.details(summary.id.clone());
        self.detail = Some(DetailPane::Loading(summary));
        self.page = Page::Detail;
    }

    fn close_detail(&mut self) {
        self.requests.cancel_details();
        self.detail = None;
        if self.page == Page::Detail {
            self.page = self.return_page;
        }
    }

    fn submit_search(&mut self) {
        let query = self.search.input.trim().to_string();

        if !CatalogClient::is_searchable(&query) {
            self.requests.cancel_search();
            self.hide_search_results();
            return;
        }

        self.requests.search(query);
    }

    fn hide_search_results(&mut self) {
        self.search.results = None;
        self.search.list.select(None);
    }

    fn on_search(&mut self, query: &str, result: Result<Vec<GameSummary>, CatalogError>) {
        match result {
            Ok(games) if games.is_empty() => self.hide_search_results(),
            Ok(games) => {
                info!("Search {:?} found {} games", query, games.len());
                self.search.results = Some(games);
                self.search.list.select(Some(0));
            }
            Err(e) => {
                error!("Search {:?} failed: {}", query, e);
                self.hide_search_results();
                self.notify(NoticeLevel::Error, "Could not search games. Try again later.");
            }
        }
    }

    fn on_details(&mut self, id: &str, result: Result<Option<GameDetails>, CatalogError>) {
        let showing = self
            .detail
            .as_ref()
            .is_some_and(|pane| pane.id() == id && self.page == Page::Detail);
        if !showing {
            return;
        }

        match result {
            Ok(Some(details)) => self.detail = Some(DetailPane::Loaded(details)),
            Ok(None) => {
                warn!("Game {} not found in catalog", id);
                self.notify(NoticeLevel::Error, "Could not find the game.");
                self.close_detail();
            }
            Err(e) => {
                error!("Loading game {} failed: {}", id, e);
                self.notify(NoticeLevel::Error, "Could not load game details.");
                self.close_detail();
            }
        }
    }

    fn on_featured(&mut self, result: Result<Vec<GameSummary>, CatalogError>) {
        match result {
            Ok(games) => {
                self.featured_list
                    .select(if games.is_empty() { None } else { Some(0) });
                self.featured = Featured::Loaded(games);
            }
            Err(e) => {
                error!("Loading featured games failed: {}", e);
                self.featured = Featured::Failed;
                self.featured_list.select(None);
                self.notify(NoticeLevel::Error, "Could not load featured games.");
            }
        }
    }

    /// Report a library mutation: its events first, then any save failure,
    /// so the failure is what stays on the status line
    fn settle<T>(&mut self, result: Result<T, LibraryError>) -> Option<T> {
        for event in self.store.drain_events() {
            info!("{} [{}]", event.message(), event.id());
            self.notify(NoticeLevel::Success, event.message());
        }

        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.save_failed(e);
                None
            }
        }
    }

    fn save_failed(&mut self, e: LibraryError) {
        error!("Saving library failed: {}", e);
        self.notify(NoticeLevel::Error, format!("Could not save library: {}", e));
    }

    fn clamp_library_selection(&mut self) {
        let len = self.visible_games().len();
        match self.library_list.selected() {
            _ if len == 0 => self.library_list.select(None),
            Some(i) if i >= len => self.library_list.select(Some(len - 1)),
            None => self.library_list.select(Some(0)),
            Some(_) => {}
        }
    }

    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
    }
}

/// Status bound to a number key on the game info and library pages
fn status_for_key(c: char) -> Option<GameStatus> {
    match c {
        '1' => Some(GameStatus::Playing),
        '2' => Some(GameStatus::Completed),
        '3' => Some(GameStatus::Wishlist),
        '4' => Some(GameStatus::Abandoned),
        _ => None,
    }
}

/// Select previous item, wrapping around
fn select_prev(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }

    let i = match state.selected() {
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

/// Select next item, wrapping around
fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }

    let i = match state.selected() {
        Some(i) => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}
