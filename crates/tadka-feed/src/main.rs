use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    DefaultTerminal, Frame,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tadka_feed_core::prelude::*;
use tadka_feed_core::Tz;
use tokio::time::interval;
use tracing::{info, warn};

mod config;
mod logging;
mod widgets;
use config::{FeedConfig, LoadedConfig};
use widgets::*;

const RELOAD_INTERVAL: Duration = Duration::from_secs(30);
const STANDARD_FEED_PATHS: [&str; 2] = ["~/.tadka/feeds", "~/.config/tadka/feeds"];
const DEFAULT_LOG_FILE: &str = "~/.tadka-feed.log";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopupType {
    ItemDetail,
    Categories,
}

#[derive(Parser, Debug)]
#[clap(author = "Tadka Web Team", version, about)]
struct Args {
    #[arg(short = 'v')]
    verbose: bool,

    /// Bucket to open on: latest, today, yesterday, thisWeek, last7Days, ...
    #[arg(short = 'b', long = "bucket")]
    bucket: Option<String>,

    /// IANA zone used for day boundaries
    #[arg(short = 't', long = "timezone")]
    timezone: Option<String>,

    /// Feed file or directory; repeat to add fallbacks, tried in order
    #[arg(short = 'd', long = "data-dir")]
    data_dirs: Vec<String>,

    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Print the items in the bucket and exit
    #[arg(long = "list")]
    list: bool,
}

fn discover_feed_paths() -> Vec<PathBuf> {
    let mut discovered_paths = Vec::new();

    for path_str in &STANDARD_FEED_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            discovered_paths.push(path.to_path_buf());
        }
    }

    discovered_paths
}

fn resolve_sources(cli_sources: &[String], config: &FeedConfig) -> Vec<PathBuf> {
    let configured = if !cli_sources.is_empty() {
        cli_sources
    } else {
        config.sources.as_slice()
    };

    if configured.is_empty() {
        return discover_feed_paths();
    }

    configured
        .iter()
        .map(|s| PathBuf::from(shellexpand::tilde(s).as_ref()))
        .collect()
}

pub struct AppState {
    pub feed_monitor: FeedMonitor,
    pub bucket: Bucket,
    pub selected: usize,
    pub sources: Vec<PathBuf>,
    pub last_update: DateTime<Utc>,
    pub is_loading: bool,
    pub spinner_state: usize,
    pub data_loaded: bool,
    pub error_message: Option<String>,
    pub active_popup: Option<PopupType>,
    clock: Box<dyn Clock>,
}

impl AppState {
    fn new(
        classifier: DateRangeClassifier,
        bucket: Bucket,
        selected: usize,
        sources: Vec<PathBuf>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            feed_monitor: FeedMonitor::with_classifier(classifier),
            bucket,
            selected,
            sources,
            last_update: clock.now(),
            is_loading: false,
            spinner_state: 0,
            data_loaded: false,
            error_message: None,
            active_popup: None,
            clock,
        }
    }

    fn load_data(&mut self) -> Result<()> {
        self.is_loading = true;
        self.error_message = None;

        let result = if self.sources.is_empty() {
            Err(anyhow::anyhow!(
                "No feeds found in standard locations:\n  ~/.tadka/feeds\n  ~/.config/tadka/feeds"
            ))
        } else {
            self.feed_monitor.load_with_fallback(&self.sources)
        };

        match &result {
            Ok(_) => {
                info!(items = self.feed_monitor.item_count(), "feed loaded");
                self.data_loaded = true;
                self.clamp_selection();
            }
            Err(e) => {
                warn!(error = %e, "feed load failed");
                self.error_message = Some(e.to_string());
                self.data_loaded = false;
            }
        }

        self.is_loading = false;
        self.last_update = self.clock.now();

        result
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn timezone(&self) -> Tz {
        self.feed_monitor.classifier().timezone()
    }

    pub fn visible_items(&self) -> Vec<FeedItem> {
        self.feed_monitor.filtered(self.bucket, self.now())
    }

    pub fn selected_item(&self) -> Option<FeedItem> {
        self.visible_items().into_iter().nth(self.selected)
    }

    pub fn format_timestamp(&self, published_at: Option<DateTime<Utc>>) -> String {
        match published_at {
            Some(ts) => ts
                .with_timezone(&self.timezone())
                .format("%d %b %Y, %H:%M")
                .to_string(),
            None => "undated".to_string(),
        }
    }

    fn select_bucket(&mut self, bucket: Bucket) {
        if self.bucket != bucket {
            self.bucket = bucket;
            self.selected = 0;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible_items().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn toggle_popup(&mut self, popup: PopupType) {
        self.active_popup = if self.active_popup == Some(popup) {
            None
        } else {
            Some(popup)
        };
    }

    fn update_spinner(&mut self) {
        self.spinner_state = (self.spinner_state + 1) % 10;
    }

    pub fn get_spinner_char(&self) -> char {
        match self.spinner_state {
            0 => '⠋',
            1 => '⠙',
            2 => '⠹',
            3 => '⠸',
            4 => '⠼',
            5 => '⠴',
            6 => '⠦',
            7 => '⠧',
            8 => '⠇',
            9 => '⠏',
            _ => '⠋',
        }
    }
}

pub struct App {
    state: Arc<Mutex<AppState>>,
    exit: bool,
}

impl App {
    pub fn new(mut app_state: AppState) -> Self {
        if let Err(e) = app_state.load_data() {
            app_state.error_message = Some(format!("Initial load failed: {}", e));
        }

        Self {
            state: Arc::new(Mutex::new(app_state)),
            exit: false,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let state_clone = Arc::clone(&self.state);

        let reload = tokio::spawn(async move {
            let mut interval = interval(RELOAD_INTERVAL);
            // The first tick fires immediately; data was just loaded.
            interval.tick().await;
            loop {
                interval.tick().await;

                if let Ok(mut state) = state_clone.lock() {
                    let _ = state.load_data();
                }
            }
        });

        let mut tick_interval = interval(Duration::from_millis(100));

        while !self.exit {
            tick_interval.tick().await;

            if let Ok(mut state) = self.state.lock() {
                state.update_spinner();
            }

            terminal.draw(|frame| self.draw(frame))?;

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }
        }

        reload.abort();
        Ok(())
    }

    /// Bucket and row to restore on the next run.
    pub fn position(&self) -> Option<(Bucket, usize)> {
        self.state
            .lock()
            .ok()
            .map(|state| (state.bucket, state.selected))
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[2]);

        if let Ok(state) = self.state.lock() {
            HeaderWidget::render(frame, chunks[0], &state);
            BucketTabsWidget::render(frame, chunks[1], &state);
            ItemListWidget::render(frame, body[0], &state);
            StatisticsWidget::render(frame, body[1], &state);
            ShortcutsWidget::render(frame, chunks[3], &state);

            match &state.active_popup {
                Some(PopupType::ItemDetail) => {
                    ItemDetailPopupWidget::render(frame, area, &state);
                }
                Some(PopupType::Categories) => {
                    CategoriesPopupWidget::render(frame, area, &state);
                }
                None => {}
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key_event) = event else {
            return;
        };
        if key_event.kind != KeyEventKind::Press {
            return;
        }
        if key_event.code == KeyCode::Char('q') {
            self.exit = true;
            return;
        }

        let Ok(mut state) = self.state.lock() else {
            return;
        };

        match key_event.code {
            KeyCode::Char('r') => {
                let _ = state.load_data();
            }
            KeyCode::Right | KeyCode::Tab => {
                let next = state.bucket.next();
                state.select_bucket(next);
            }
            KeyCode::Left | KeyCode::BackTab => {
                let previous = state.bucket.previous();
                state.select_bucket(previous);
            }
            KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
            KeyCode::Enter => {
                if state.selected_item().is_some() {
                    state.toggle_popup(PopupType::ItemDetail);
                }
            }
            KeyCode::Char('c') => state.toggle_popup(PopupType::Categories),
            KeyCode::Esc => state.active_popup = None,
            _ => {}
        }
    }
}

fn print_list(monitor: &FeedMonitor, bucket: &str, now: DateTime<Utc>) {
    let tz = monitor.classifier().timezone();
    let items = monitor.filtered_named(bucket, now);

    if items.is_empty() {
        println!("No items in {}", bucket);
        return;
    }

    for item in &items {
        let stamp = item
            .published_at()
            .map(|ts| ts.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "undated".to_string());
        println!("{:<16}  [{}] {}", stamp, item.category(), item.title());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let log_file = if args.list {
        args.log_file.clone()
    } else {
        Some(
            args.log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(shellexpand::tilde(DEFAULT_LOG_FILE).as_ref())),
        )
    };
    logging::init(level, log_file.as_deref())?;

    let mut loaded = LoadedConfig::load();
    let config = &mut loaded.config;

    let timezone = args.timezone.clone().or_else(|| config.timezone.clone());
    let classifier = match &timezone {
        Some(name) => DateRangeClassifier::from_timezone_name(name)?,
        None => DateRangeClassifier::new(),
    };

    let sources = resolve_sources(&args.data_dirs, config);

    if args.list {
        let mut monitor = FeedMonitor::with_classifier(classifier);
        monitor.load_with_fallback(&sources)?;
        let bucket = args.bucket.clone().unwrap_or_else(|| config.bucket.to_string());
        print_list(&monitor, &bucket, SystemClock.now());
        return Ok(());
    }

    let (bucket, selected) = match &args.bucket {
        Some(name) => (name.parse::<Bucket>()?, 0),
        None => (config.bucket, config.selected),
    };

    let state = AppState::new(classifier, bucket, selected, sources, Box::new(SystemClock));

    let mut terminal = ratatui::init();
    let mut app = App::new(state);

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    if let Some((bucket, selected)) = app.position() {
        config.bucket = bucket;
        config.selected = selected;
    }
    config.timezone = timezone;
    if !args.data_dirs.is_empty() {
        config.sources = args.data_dirs.clone();
    }
    match loaded.save() {
        Ok(true) => {}
        Ok(false) => warn!("config file could not be read at startup, not saving"),
        Err(e) => warn!(error = %e, "could not save config"),
    }

    result
}
