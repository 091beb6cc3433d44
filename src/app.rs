//! Application state management for Skycast
//!
//! This module contains the main application state, handling keyboard input,
//! data loading for each tab, and reactions to store changes.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::api::geocoding::{GeoPlace, GeocodingClient};
use crate::api::weather::{OneCall, WeatherClient};
use crate::api::ApiError;
use crate::cli::StartupConfig;
use crate::stores::{KvStore, Location, LocationStore, SettingsStore, Units};
use crate::worker::{FetchGateway, Fetcher};

/// Shown when a request fails offline with nothing cached
pub const OFFLINE_MESSAGE: &str = "You are offline and no cached data is available";
/// Shown for any other load failure
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load weather data. Please try again.";
/// Shown when a city search matches nothing
pub const EMPTY_RESULT_MESSAGE: &str = "Check your input.";
/// Shown on the current tab when no location has been saved yet
pub const NO_LOCATION_MESSAGE: &str =
    "No saved location. Search for a city and press 's' to save it.";

/// The three top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Conditions at the saved location
    Current,
    /// City search and forecast
    Search,
    /// Unit preference and saved location
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Current, Tab::Search, Tab::Settings];

    /// Tab bar label
    pub fn title(self) -> &'static str {
        match self {
            Tab::Current => "Current",
            Tab::Search => "Search",
            Tab::Settings => "Settings",
        }
    }

    /// Parses the CLI form; anything unrecognized is `None`
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "current" => Some(Tab::Current),
            "search" => Some(Tab::Search),
            "settings" => Some(Tab::Settings),
            _ => None,
        }
    }

    /// Position in the tab bar
    pub fn index(self) -> usize {
        match self {
            Tab::Current => 0,
            Tab::Search => 1,
            Tab::Settings => 2,
        }
    }

    /// The tab to the right, wrapping around
    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    /// The tab to the left, wrapping around
    pub fn previous(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Whether keystrokes on the search tab edit the query or navigate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Store change notifications delivered to the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    UnitsChanged(Units),
    LocationChanged,
}

/// Deferred work queued by key handlers and run by the event loop
#[derive(Debug, Clone, PartialEq)]
enum PendingAction {
    /// Load weather for the saved location into the current tab
    LoadCurrent,
    /// Geocode a city and load its forecast into the search tab
    Search(String),
    /// Load a forecast for known coordinates into the search tab
    Forecast(Location),
}

/// State backing the current conditions tab
#[derive(Debug, Default)]
pub struct CurrentTab {
    pub weather: Option<OneCall>,
    /// Whether the shown data came from the offline cache
    pub from_cache: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// State backing the search tab
#[derive(Debug, Default)]
pub struct SearchTab {
    pub query: String,
    pub input_mode: InputMode,
    /// Place the shown forecast belongs to
    pub place: Option<GeoPlace>,
    pub weather: Option<OneCall>,
    pub from_cache: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Number of selectable rows on the settings tab
pub const SETTINGS_ROWS: usize = 2;

/// State backing the settings tab
#[derive(Debug, Default)]
pub struct SettingsTab {
    /// Selected row: 0 = unit toggle, 1 = clear saved location
    pub selected: usize,
}

/// Main application struct managing state and data
pub struct App<F: Fetcher> {
    /// Currently active tab
    pub tab: Tab,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    pub current: CurrentTab,
    pub search: SearchTab,
    pub settings_tab: SettingsTab,
    /// Unit preference store
    pub settings: SettingsStore,
    /// Saved location store
    pub locations: LocationStore,
    /// Session-only unit override from the CLI
    units_override: Option<Units>,
    /// Work queued by key handlers, drained each loop iteration
    pending: Vec<PendingAction>,
    store_events: mpsc::UnboundedReceiver<StoreEvent>,
    weather_client: WeatherClient<F>,
    geocoding_client: GeocodingClient<F>,
}

impl<F: Fetcher> App<F> {
    /// Creates an App wired to the given gateway and persistent store,
    /// with CLI startup options applied.
    pub fn new(
        gateway: Arc<FetchGateway<F>>,
        api_key: &str,
        kv: KvStore,
        config: StartupConfig,
    ) -> Self {
        let mut settings = SettingsStore::new(kv.clone());
        let mut locations = LocationStore::new(kv);

        let (tx, mut store_events) = mpsc::unbounded_channel();
        let units_tx = tx.clone();
        settings.subscribe(move |units| {
            let _ = units_tx.send(StoreEvent::UnitsChanged(units));
        });
        locations.subscribe(move |_| {
            let _ = tx.send(StoreEvent::LocationChanged);
        });
        // Subscribing replays the stores' current values; the initial
        // pending actions already cover startup, so discard those events.
        while store_events.try_recv().is_ok() {}

        let tab = config.initial_tab.unwrap_or(Tab::Current);
        let mut search = SearchTab::default();
        // The current tab loads independently of any startup search
        let pending = match &config.initial_city {
            Some(city) => {
                search.query = city.clone();
                search.loading = true;
                vec![PendingAction::LoadCurrent, PendingAction::Search(city.clone())]
            }
            None => vec![PendingAction::LoadCurrent],
        };

        Self {
            tab,
            should_quit: false,
            show_help: false,
            current: CurrentTab {
                loading: true,
                ..CurrentTab::default()
            },
            search,
            settings_tab: SettingsTab::default(),
            settings,
            locations,
            units_override: config.units_override,
            pending,
            store_events,
            weather_client: WeatherClient::new(Arc::clone(&gateway), api_key),
            geocoding_client: GeocodingClient::new(gateway, api_key),
        }
    }

    /// Units in effect for this session
    pub fn units(&self) -> Units {
        self.units_override.unwrap_or_else(|| self.settings.units())
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (outside query editing)
    /// - `1`/`2`/`3`, `Tab`/`BackTab`: Switch tabs
    /// - `r`: Refresh the active tab's data
    /// - `/`: Edit the search query; `Enter` submits, `Esc` cancels
    /// - `s`: Save the searched place as the default location
    /// - `o`: Load the saved location's forecast on the search tab
    /// - `j`/`k`, `Enter`: Navigate and activate settings rows
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Query editing captures every key until Enter or Esc
        if self.tab == Tab::Search && self.search.input_mode == InputMode::Editing {
            self.handle_editing_key(key_event);
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Char('1') => {
                self.tab = Tab::Current;
                return;
            }
            KeyCode::Char('2') => {
                self.tab = Tab::Search;
                return;
            }
            KeyCode::Char('3') => {
                self.tab = Tab::Settings;
                return;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Current => self.handle_current_key(key_event),
            Tab::Search => self.handle_search_key(key_event),
            Tab::Settings => self.handle_settings_key(key_event),
        }
    }

    fn handle_editing_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                self.search.input_mode = InputMode::Normal;
                let query = self.search.query.trim().to_string();
                if !query.is_empty() {
                    self.search.loading = true;
                    self.search.error = None;
                    self.pending.push(PendingAction::Search(query));
                }
            }
            KeyCode::Esc => {
                self.search.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.search.query.pop();
            }
            KeyCode::Char(c) => {
                self.search.query.push(c);
            }
            _ => {}
        }
    }

    fn handle_current_key(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('r') {
            self.current.loading = true;
            self.current.error = None;
            self.pending.push(PendingAction::LoadCurrent);
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('/') | KeyCode::Char('e') => {
                self.search.input_mode = InputMode::Editing;
            }
            KeyCode::Char('r') => {
                if let Some(place) = &self.search.place {
                    self.search.loading = true;
                    self.search.error = None;
                    self.pending.push(PendingAction::Forecast(Location::new(
                        place.lat,
                        place.lon,
                        place.name.clone(),
                    )));
                } else if !self.search.query.trim().is_empty() {
                    self.search.loading = true;
                    self.search.error = None;
                    self.pending
                        .push(PendingAction::Search(self.search.query.trim().to_string()));
                }
            }
            KeyCode::Char('s') => {
                if let Some(place) = &self.search.place {
                    let location = Location::new(place.lat, place.lon, place.name.clone());
                    self.locations.set_location(location);
                }
            }
            KeyCode::Char('o') => {
                if let Some(saved) = self.locations.location().cloned() {
                    self.search.query = saved.name.clone();
                    self.search.loading = true;
                    self.search.error = None;
                    self.pending.push(PendingAction::Forecast(saved));
                }
            }
            _ => {}
        }
    }

    fn handle_settings_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings_tab.selected = self.settings_tab.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.settings_tab.selected + 1 < SETTINGS_ROWS {
                    self.settings_tab.selected += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.settings_tab.selected {
                0 => {
                    let toggled = self.units().toggled();
                    // Toggling in the UI clears any session override
                    self.units_override = None;
                    self.settings.set_units(toggled);
                }
                _ => {
                    self.locations.clear();
                }
            },
            _ => {}
        }
    }

    /// Whether the event loop has deferred work to run
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Runs all deferred work queued by key handlers and store events
    pub async fn process_pending(&mut self) {
        let actions = std::mem::take(&mut self.pending);
        for action in actions {
            match action {
                PendingAction::LoadCurrent => self.load_current().await,
                PendingAction::Search(query) => self.run_search(&query).await,
                PendingAction::Forecast(location) => {
                    let place = GeoPlace {
                        name: location.name.clone(),
                        lat: location.lat,
                        lon: location.lon,
                        country: None,
                        state: None,
                    };
                    self.load_search_forecast(place).await;
                }
            }
        }
    }

    /// Applies store change notifications: refetches displayed weather when
    /// the unit preference changes and reloads the current tab when the
    /// saved location is replaced or cleared.
    pub fn drain_store_events(&mut self) {
        while let Ok(event) = self.store_events.try_recv() {
            match event {
                StoreEvent::UnitsChanged(_) => {
                    if self.current.weather.is_some() {
                        self.current.loading = true;
                        self.pending.push(PendingAction::LoadCurrent);
                    }
                    if let Some(place) = &self.search.place {
                        self.search.loading = true;
                        self.pending.push(PendingAction::Forecast(Location::new(
                            place.lat,
                            place.lon,
                            place.name.clone(),
                        )));
                    }
                }
                StoreEvent::LocationChanged => {
                    // A reload may already be queued (e.g. the subscription
                    // replay at startup); avoid fetching twice.
                    if !self.pending.contains(&PendingAction::LoadCurrent) {
                        self.current.loading = true;
                        self.pending.push(PendingAction::LoadCurrent);
                    }
                }
            }
        }
    }

    /// Loads weather for the saved location into the current tab
    async fn load_current(&mut self) {
        let Some(mut location) = self.locations.location().cloned() else {
            self.current.loading = false;
            self.current.weather = None;
            self.current.error = Some(NO_LOCATION_MESSAGE.to_string());
            return;
        };

        // Locations saved from coordinates may lack a display name
        if location.name.is_empty() {
            if let Ok(fetched) = self.geocoding_client.reverse(location.lat, location.lon).await {
                if let Some(place) = fetched.data.into_iter().next() {
                    location.name = place.name;
                }
            }
        }

        match self
            .weather_client
            .one_call(location.lat, location.lon, self.units())
            .await
        {
            Ok(fetched) => {
                self.current.weather = Some(fetched.data);
                self.current.from_cache = fetched.from_cache;
                self.current.error = None;
            }
            Err(err) => {
                self.current.error = Some(error_message(&err).to_string());
            }
        }
        self.current.loading = false;
    }

    /// Geocodes a city and loads its forecast into the search tab
    async fn run_search(&mut self, query: &str) {
        match self.geocoding_client.geocode(query).await {
            Ok(fetched) => match fetched.data.into_iter().next() {
                Some(place) => self.load_search_forecast(place).await,
                None => {
                    self.search.loading = false;
                    self.search.place = None;
                    self.search.weather = None;
                    self.search.error = Some(EMPTY_RESULT_MESSAGE.to_string());
                }
            },
            Err(err) => {
                self.search.loading = false;
                self.search.error = Some(error_message(&err).to_string());
            }
        }
    }

    async fn load_search_forecast(&mut self, place: GeoPlace) {
        match self
            .weather_client
            .one_call(place.lat, place.lon, self.units())
            .await
        {
            Ok(fetched) => {
                self.search.weather = Some(fetched.data);
                self.search.from_cache = fetched.from_cache;
                self.search.place = Some(place);
                self.search.error = None;
            }
            Err(err) => {
                self.search.error = Some(error_message(&err).to_string());
            }
        }
        self.search.loading = false;
    }
}

fn error_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Offline => OFFLINE_MESSAGE,
        _ => LOAD_ERROR_MESSAGE,
    }
}
