use crate::api::{ApiError, Movie, MovieApi};
use crate::favorites::{AddOutcome, FavoritesStore};
use crate::paginate;
use crate::store::{DataStore, SearchOutcome};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Cards shown side by side in card mode.
pub const CARDS_PER_ROW: usize = 4;

/// How the current page is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DisplayMode {
    #[default]
    Card,
    List,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Card => Self::List,
            Self::List => Self::Card,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "Cards",
            Self::List => "List",
        }
    }
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// The two per-movie actions every rendered entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Details,
    Favorite,
}

/// A blocking message; any key dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Contents of the shared detail popup.
#[derive(Debug, Clone, Default)]
pub struct DetailPanel {
    pub request_id: u64,
    pub movie_id: i64,
    pub loading: bool,
    pub title: String,
    pub poster_url: String,
    pub release_date: String,
    pub description: String,
    pub error: Option<String>,
}

/// Results delivered back to the UI loop by background requests.
#[derive(Debug)]
pub enum AppEvent {
    MoviesLoaded(Result<Vec<Movie>, ApiError>),
    DetailLoaded {
        request_id: u64,
        result: Result<Movie, ApiError>,
    },
}

/// Main application state.
pub struct App {
    pub api: MovieApi,
    pub store: DataStore,
    pub favorites: FavoritesStore,
    pub should_quit: bool,
    pub show_help: bool,
    pub loading: bool,

    // Paging and layout
    pub page_size: usize,
    pub current_page: usize,
    pub mode: DisplayMode,
    pub selected: usize, // index within the visible page

    pub search_input: String,
    pub input_mode: InputMode,

    pub detail: Option<DetailPanel>,
    last_request_id: u64,

    pub notice: Option<Notice>,
    pub status_msg: String,

    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(api: MovieApi, favorites: FavoritesStore, page_size: usize, mode: DisplayMode) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            store: DataStore::new(),
            favorites,
            should_quit: false,
            show_help: false,
            loading: false,

            page_size: page_size.max(1),
            current_page: 1,
            mode,
            selected: 0,

            search_input: String::new(),
            input_mode: InputMode::Normal,

            detail: None,
            last_request_id: 0,

            notice: None,
            status_msg: String::new(),

            events_tx,
            events_rx,
        }
    }

    /// Kick off the one-time bulk fetch.
    pub fn start_loading(&mut self) {
        self.loading = true;
        self.status_msg = "Loading movies...".to_string();
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list_movies().await;
            let _ = tx.send(AppEvent::MoviesLoaded(result));
        });
    }

    /// Apply every event that has arrived since the last tick.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::MoviesLoaded(Ok(movies)) => {
                tracing::info!(count = movies.len(), "movies loaded");
                self.load_movies(movies);
            }
            AppEvent::MoviesLoaded(Err(e)) => {
                tracing::error!(error = %e, "failed to load movies");
                self.loading = false;
                self.status_msg = e.user_message();
            }
            AppEvent::DetailLoaded { request_id, result } => {
                self.apply_detail(request_id, result);
            }
        }
    }

    pub fn load_movies(&mut self, movies: Vec<Movie>) {
        self.store.load(movies);
        self.loading = false;
        self.current_page = 1;
        self.selected = 0;
        self.status_msg = format!("{} movies loaded", self.store.total());
    }

    // ── Paging ──

    pub fn page_count(&self) -> usize {
        paginate::page_count(self.store.active_len(), self.page_size)
    }

    /// Movies on the current page of the active set.
    pub fn visible_movies(&self) -> &[Arc<Movie>] {
        paginate::page(self.store.active_set(), self.current_page, self.page_size)
    }

    /// Jump to page `n`; pages that do not exist are ignored.
    pub fn go_to_page(&mut self, n: usize) {
        if n == 0 || n > self.page_count() {
            self.status_msg = format!("No page {}", n);
            return;
        }
        self.current_page = n;
        self.selected = 0;
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.page_count() {
            self.go_to_page(self.current_page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.go_to_page(self.current_page - 1);
        }
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
        self.selected = 0;
    }

    pub fn last_page(&mut self) {
        self.current_page = self.page_count().max(1);
        self.selected = 0;
    }

    fn clamp_page(&mut self) {
        self.current_page =
            paginate::clamp_page(self.current_page, self.store.active_len(), self.page_size);
        let visible = self.visible_movies().len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    // ── Layout ──

    /// Change layout only; page and active set are untouched.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggle());
    }

    // ── Selection ──

    fn move_selection(&mut self, delta: isize) {
        let visible = self.visible_movies().len();
        if visible == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        if target >= 0 && (target as usize) < visible {
            self.selected = target as usize;
        }
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_prev(&mut self) {
        self.move_selection(-1);
    }

    /// Down one row: a full card row in card mode, one line in list mode.
    pub fn select_down(&mut self) {
        match self.mode {
            DisplayMode::Card => self.move_selection(CARDS_PER_ROW as isize),
            DisplayMode::List => self.move_selection(1),
        }
    }

    pub fn select_up(&mut self) {
        match self.mode {
            DisplayMode::Card => self.move_selection(-(CARDS_PER_ROW as isize)),
            DisplayMode::List => self.move_selection(-1),
        }
    }

    pub fn selected_movie_id(&self) -> Option<i64> {
        self.visible_movies().get(self.selected).map(|m| m.id)
    }

    // ── Search ──

    /// Search the full collection with the current input.
    pub fn submit_search(&mut self) {
        match self.store.search(&self.search_input) {
            SearchOutcome::Cleared => {
                self.current_page = 1;
                self.selected = 0;
                self.status_msg = format!("Showing all {} movies", self.store.total());
            }
            SearchOutcome::Matched(count) => {
                self.current_page = 1;
                self.selected = 0;
                self.status_msg = format!(
                    "{} movies match \"{}\"",
                    count,
                    self.store.keyword().unwrap_or_default()
                );
            }
            SearchOutcome::NoMatch { keyword } => {
                tracing::info!(%keyword, "search matched nothing");
                self.notice = Some(Notice {
                    title: "No results".to_string(),
                    message: format!("No movies match the keyword \"{}\".", keyword),
                });
            }
        }
        self.clamp_page();
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        if self.store.is_filtered() {
            self.submit_search();
        }
    }

    // ── Entry actions ──

    /// Route an entry action to the movie it was triggered on.
    pub fn dispatch(&mut self, action: EntryAction, id: i64) {
        match action {
            EntryAction::Details => self.show_details(id),
            EntryAction::Favorite => self.add_favorite(id),
        }
    }

    /// Run `action` on the selected entry, if any.
    pub fn dispatch_selected(&mut self, action: EntryAction) {
        if let Some(id) = self.selected_movie_id() {
            self.dispatch(action, id);
        }
    }

    /// Reset the detail panel for `id` and return the new request id.
    pub fn begin_detail(&mut self, id: i64) -> u64 {
        self.last_request_id += 1;
        self.detail = Some(DetailPanel {
            request_id: self.last_request_id,
            movie_id: id,
            loading: true,
            ..DetailPanel::default()
        });
        self.last_request_id
    }

    /// Open the detail popup and fetch the movie in the background.
    pub fn show_details(&mut self, id: i64) {
        let request_id = self.begin_detail(id);
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.get_movie(id).await;
            let _ = tx.send(AppEvent::DetailLoaded { request_id, result });
        });
    }

    fn apply_detail(&mut self, request_id: u64, result: Result<Movie, ApiError>) {
        let Some(panel) = self.detail.as_mut().filter(|p| p.request_id == request_id) else {
            tracing::warn!(request_id, "discarding stale detail response");
            return;
        };
        panel.loading = false;
        match result {
            Ok(movie) => {
                panel.poster_url = self.api.poster_url(&movie.image);
                panel.title = movie.title;
                panel.release_date = movie.release_date;
                panel.description = movie.description;
            }
            Err(e) => {
                tracing::error!(movie_id = panel.movie_id, error = %e, "failed to load movie detail");
                panel.error = Some(e.user_message());
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn add_favorite(&mut self, id: i64) {
        let Some(movie) = self.store.find(id) else {
            self.status_msg = format!("Unknown movie id {}", id);
            return;
        };
        let title = movie.title.clone();
        match self.favorites.add(movie) {
            Ok(AddOutcome::Added { total }) => {
                self.status_msg = format!("Added \"{}\" to favorites ({} total)", title, total);
            }
            Ok(AddOutcome::AlreadyPresent) => {
                self.notice = Some(Notice {
                    title: "Already a favorite".to_string(),
                    message: format!("\"{}\" is already in your favorites.", title),
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save favorite");
                self.status_msg = e.user_message();
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
pub(crate) fn test_app(count: i64) -> App {
    use crate::favorites::MemoryStorage;
    use crate::store::sample_movies;

    let mut app = App::new(
        MovieApi::new("http://localhost:9"),
        FavoritesStore::new(Box::new(MemoryStorage::default())),
        12,
        DisplayMode::Card,
    );
    app.load_movies(sample_movies(count));
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryStorage;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> App {
        App::new(
            MovieApi::new(&server.uri()),
            FavoritesStore::new(Box::new(MemoryStorage::default())),
            12,
            DisplayMode::Card,
        )
    }

    /// Drain the channel on a short tick, like the UI loop, until `done` holds.
    async fn drain_until(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..300 {
            app.drain_events();
            if done(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background request did not finish");
    }

    fn movie_body(id: i64, title: &str) -> serde_json::Value {
        serde_json::json!({
            "results": {"id": id, "title": title, "image": format!("poster{}.jpg", id),
                        "release_date": "2018-01-01", "description": format!("About {}", title)}
        })
    }

    #[test]
    fn test_initial_load_shows_first_page() {
        let app = test_app(80);
        assert_eq!(app.page_count(), 7);
        assert_eq!(app.current_page, 1);
        let ids: Vec<i64> = app.visible_movies().iter().map(|m| m.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
        assert_eq!(app.status_msg, "80 movies loaded");
    }

    #[test]
    fn test_last_page_is_short() {
        let mut app = test_app(80);
        app.go_to_page(7);
        assert_eq!(app.visible_movies().len(), 8);
        assert_eq!(app.selected_movie_id(), Some(73));
    }

    #[test]
    fn test_go_to_missing_page_is_ignored() {
        let mut app = test_app(80);
        app.go_to_page(3);
        app.go_to_page(8);
        assert_eq!(app.current_page, 3);
        app.go_to_page(0);
        assert_eq!(app.current_page, 3);
    }

    #[test]
    fn test_next_and_prev_stop_at_edges() {
        let mut app = test_app(30);
        app.prev_page();
        assert_eq!(app.current_page, 1);
        app.next_page();
        app.next_page();
        app.next_page();
        assert_eq!(app.current_page, 3);
        app.first_page();
        assert_eq!(app.current_page, 1);
        app.last_page();
        assert_eq!(app.current_page, 3);
    }

    #[test]
    fn test_mode_switch_keeps_page_and_items() {
        let mut app = test_app(80);
        app.go_to_page(3);
        let before: Vec<i64> = app.visible_movies().iter().map(|m| m.id).collect();
        app.set_mode(DisplayMode::List);
        let after: Vec<i64> = app.visible_movies().iter().map(|m| m.id).collect();
        assert_eq!(app.current_page, 3);
        assert_eq!(app.mode, DisplayMode::List);
        assert_eq!(before, after);
        assert_eq!(after.len(), 12);
    }

    #[test]
    fn test_search_resets_page() {
        let mut app = test_app(80);
        app.go_to_page(5);
        app.search_input = "Movie 1".to_string();
        app.submit_search();
        // Movie 1, 10..=19
        assert_eq!(app.store.active_len(), 11);
        assert_eq!(app.current_page, 1);
        assert_eq!(app.page_count(), 1);
    }

    #[test]
    fn test_search_with_batman_titles() {
        let mut app = test_app(80);
        let mut movies = crate::store::sample_movies(80);
        movies[4].title = "Batman Returns".to_string();
        movies[40].title = "The Dark Knight: BATMAN".to_string();
        movies[70].title = "batman & robin".to_string();
        app.load_movies(movies);
        app.go_to_page(4);
        app.search_input = "batman".to_string();
        app.submit_search();
        assert_eq!(app.store.active_len(), 3);
        assert_eq!(app.current_page, 1);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_search_without_match_keeps_view_and_raises_notice() {
        let mut app = test_app(80);
        app.go_to_page(4);
        app.search_input = "nothing like this".to_string();
        app.submit_search();
        assert_eq!(app.current_page, 4);
        assert_eq!(app.store.active_len(), 80);
        let notice = app.notice.clone().unwrap();
        assert!(notice.message.contains("nothing like this"));
        app.dismiss_notice();
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_blank_search_shows_everything_from_page_one() {
        let mut app = test_app(80);
        app.search_input = "movie 7".to_string();
        app.submit_search();
        assert_eq!(app.store.active_len(), 11);
        app.go_to_page(1);
        app.search_input = "   ".to_string();
        app.submit_search();
        assert_eq!(app.store.active_len(), 80);
        assert_eq!(app.current_page, 1);
    }

    #[test]
    fn test_clear_search_restores_full_set() {
        let mut app = test_app(40);
        app.search_input = "movie 3".to_string();
        app.submit_search();
        assert!(app.store.is_filtered());
        app.clear_search();
        assert!(!app.store.is_filtered());
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn test_card_selection_moves_by_rows() {
        let mut app = test_app(80);
        app.select_down();
        assert_eq!(app.selected, CARDS_PER_ROW);
        app.select_down();
        app.select_down();
        // no fourth row on a 12-item page
        assert_eq!(app.selected, 2 * CARDS_PER_ROW);
        app.select_next();
        assert_eq!(app.selected_movie_id(), Some(10));
        app.select_up();
        assert_eq!(app.selected, CARDS_PER_ROW + 1);
    }

    #[test]
    fn test_list_selection_moves_by_one() {
        let mut app = test_app(80);
        app.set_mode(DisplayMode::List);
        app.select_down();
        app.select_down();
        assert_eq!(app.selected, 2);
        app.select_up();
        assert_eq!(app.selected, 1);
        app.select_prev();
        app.select_prev();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_favorite_added_then_rejected() {
        let mut app = test_app(10);
        app.dispatch(EntryAction::Favorite, 5);
        assert!(app.status_msg.contains("Added \"Movie 5\""));
        assert!(app.notice.is_none());

        app.dispatch(EntryAction::Favorite, 5);
        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.title, "Already a favorite");
    }

    #[test]
    fn test_favorite_unknown_id() {
        let mut app = test_app(10);
        app.add_favorite(404);
        assert_eq!(app.status_msg, "Unknown movie id 404");
    }

    #[test]
    fn test_detail_clears_previous_contents() {
        let mut app = test_app(10);
        let first = app.begin_detail(1);
        app.handle_event(AppEvent::DetailLoaded {
            request_id: first,
            result: Ok(app.store.find(1).cloned().unwrap()),
        });
        assert_eq!(app.detail.as_ref().unwrap().title, "Movie 1");

        app.begin_detail(2);
        let panel = app.detail.as_ref().unwrap();
        assert!(panel.loading);
        assert!(panel.title.is_empty());
        assert!(panel.description.is_empty());
        assert!(panel.poster_url.is_empty());
    }

    #[test]
    fn test_detail_fills_panel() {
        let mut app = test_app(10);
        let id = app.begin_detail(3);
        app.handle_event(AppEvent::DetailLoaded {
            request_id: id,
            result: Ok(app.store.find(3).cloned().unwrap()),
        });
        let panel = app.detail.as_ref().unwrap();
        assert!(!panel.loading);
        assert_eq!(panel.release_date, "2018-01-01");
        assert_eq!(panel.poster_url, "http://localhost:9/posters/poster3.jpg");
    }

    #[test]
    fn test_stale_detail_response_is_discarded() {
        let mut app = test_app(10);
        let stale = app.begin_detail(1);
        let current = app.begin_detail(2);
        app.handle_event(AppEvent::DetailLoaded {
            request_id: stale,
            result: Ok(app.store.find(1).cloned().unwrap()),
        });
        let panel = app.detail.as_ref().unwrap();
        assert!(panel.loading);
        assert_eq!(panel.request_id, current);
        assert!(panel.title.is_empty());

        app.close_detail();
        app.handle_event(AppEvent::DetailLoaded {
            request_id: current,
            result: Ok(app.store.find(2).cloned().unwrap()),
        });
        assert!(app.detail.is_none());
    }

    #[test]
    fn test_detail_error_is_shown_in_panel() {
        let mut app = test_app(10);
        let id = app.begin_detail(3);
        app.handle_event(AppEvent::DetailLoaded {
            request_id: id,
            result: Err(ApiError::Status {
                status: 500,
                url: app.api.movie_url(3),
            }),
        });
        let panel = app.detail.as_ref().unwrap();
        assert!(!panel.loading);
        assert_eq!(panel.error.as_deref(), Some("Movie API returned HTTP 500"));
    }

    #[test]
    fn test_failed_bulk_load_leaves_view_empty() {
        let mut app = test_app(0);
        app.loading = true;
        app.handle_event(AppEvent::MoviesLoaded(Err(ApiError::Status {
            status: 502,
            url: app.api.index_url(),
        })));
        assert!(!app.loading);
        assert!(app.visible_movies().is_empty());
        assert_eq!(app.page_count(), 0);
        assert_eq!(app.status_msg, "Movie API returned HTTP 502");
    }

    #[test]
    fn test_events_are_drained_from_channel() {
        let mut app = test_app(0);
        app.events_tx
            .send(AppEvent::MoviesLoaded(Ok(crate::store::sample_movies(25))))
            .unwrap();
        app.drain_events();
        assert_eq!(app.store.total(), 25);
        assert_eq!(app.page_count(), 3);
    }

    #[tokio::test]
    async fn test_startup_fetch_fills_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/movies/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": crate::store::sample_movies(80)
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.start_loading();
        assert!(app.loading);
        drain_until(&mut app, |a| !a.loading).await;

        assert_eq!(app.store.total(), 80);
        assert_eq!(app.page_count(), 7);
        assert_eq!(app.visible_movies().len(), 12);
        assert_eq!(app.status_msg, "80 movies loaded");
    }

    #[tokio::test]
    async fn test_startup_fetch_failure_leaves_view_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/movies/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.start_loading();
        drain_until(&mut app, |a| !a.loading).await;

        assert_eq!(app.status_msg, "Movie API returned HTTP 500");
        assert!(app.visible_movies().is_empty());
        assert_eq!(app.page_count(), 0);
    }

    #[tokio::test]
    async fn test_show_details_fetches_and_drops_superseded_reply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/movies/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(movie_body(1, "Slow One"))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/movies/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(movie_body(2, "Fast Two")))
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        app.show_details(1);
        app.show_details(2);
        drain_until(&mut app, |a| a.detail.as_ref().is_some_and(|p| !p.loading)).await;

        let panel = app.detail.as_ref().unwrap();
        assert_eq!(panel.movie_id, 2);
        assert_eq!(panel.title, "Fast Two");
        assert_eq!(panel.description, "About Fast Two");
        assert_eq!(panel.poster_url, format!("{}/posters/poster2.jpg", server.uri()));

        // let the slow reply for movie 1 land, then make sure it was ignored
        tokio::time::sleep(Duration::from_millis(400)).await;
        app.drain_events();
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        let panel = app.detail.as_ref().unwrap();
        assert_eq!(panel.movie_id, 2);
        assert_eq!(panel.title, "Fast Two");
    }
}
