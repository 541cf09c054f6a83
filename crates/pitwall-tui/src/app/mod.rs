//! Application state and the main loop.
//!
//! ## Module Structure
//! - `mod.rs`: App struct, wiring of the tab components, rendering
//! - `input_handler.rs`: keyboard routing between global keys and tabs

mod input_handler;

use std::sync::Arc;

use futures::FutureExt;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use pitwall_core::api::client::{
    DEFAULT_LEADERBOARD_LIMIT, DashboardClient, MAX_LEADERBOARD_LIMIT, MIN_SEASON_YEAR,
    current_season,
};
use pitwall_core::api::models::{ConstructorStanding, DriverStats, LeaderboardEntry};
use pitwall_core::core::browser::TableBrowser;
use pitwall_core::core::viewer::{Fetcher, RecordViewer};
use pitwall_core::storage::config::Config;
use pitwall_core::utils::validation::validate_url;

use crate::components::{
    ActiveTab, Component, DriverView, RankingView, StatusBar, TablesView,
};
use crate::error::{TuiError, TuiResult};
use crate::event::{Event, EventHandler};
use crate::layout::main::{HEADER_HEIGHT, STATUS_BAR_HEIGHT, TICK_RATE_MS};

const LEADERBOARD_STEP: i32 = 5;

/// The main application state.
pub struct App {
    pub should_quit: bool,
    pub(crate) active_tab: ActiveTab,
    pub(crate) tables: TablesView,
    pub(crate) leaderboard: RankingView<u32, LeaderboardEntry>,
    pub(crate) constructors: RankingView<i32, ConstructorStanding>,
    pub(crate) driver: DriverView,
    pub(crate) status_bar: StatusBar,
    base_url: String,
}

fn step_limit(limit: &u32, delta: i32) -> u32 {
    let next = i64::from(*limit) + i64::from(delta * LEADERBOARD_STEP);
    next.clamp(1, i64::from(MAX_LEADERBOARD_LIMIT)) as u32
}

fn step_year(year: &i32, delta: i32) -> i32 {
    (year + delta).clamp(MIN_SEASON_YEAR, current_season())
}

impl App {
    /// Build the client and every tab from `config`. Nothing is fetched yet.
    pub fn new(config: &Config, cli_url: Option<&str>) -> TuiResult<Self> {
        let base_url = config.resolve_url(cli_url);
        validate_url(&base_url)?;

        let client = DashboardClient::with_timeout(base_url.clone(), config.timeout_secs())
            .map_err(|e| TuiError::Config(e.to_string()))?;
        let client = Arc::new(client);
        log::info!("Dashboard backend: {}", base_url);

        let browser = TableBrowser::new(client.clone(), config.browser_config());

        let leaderboard_client = Arc::clone(&client);
        let leaderboard: Fetcher<u32, Vec<LeaderboardEntry>> = Arc::new(move |limit| {
            let client = Arc::clone(&leaderboard_client);
            async move { client.leaderboard(limit).await }.boxed()
        });

        let constructors_client = Arc::clone(&client);
        let constructors: Fetcher<i32, Vec<ConstructorStanding>> = Arc::new(move |year| {
            let client = Arc::clone(&constructors_client);
            async move { client.constructors(year).await }.boxed()
        });

        let driver_client = Arc::clone(&client);
        let driver: Fetcher<i64, DriverStats> = Arc::new(move |id| {
            let client = Arc::clone(&driver_client);
            async move { client.driver_stats(id).await }.boxed()
        });

        let mut app = Self {
            should_quit: false,
            active_tab: ActiveTab::Tables,
            tables: TablesView::new(browser),
            leaderboard: RankingView::new(
                "Driver Leaderboard",
                RecordViewer::new(DEFAULT_LEADERBOARD_LIMIT, leaderboard),
                step_limit,
                |limit| format!("Top {} drivers", limit),
            ),
            constructors: RankingView::new(
                "Constructor Points",
                RecordViewer::new(current_season(), constructors),
                step_year,
                |year| format!("Season {}", year),
            ),
            driver: DriverView::new(RecordViewer::new(
                crate::components::INITIAL_DRIVER_ID,
                driver,
            )),
            status_bar: StatusBar::new(),
            base_url,
        };
        app.refresh_bindings();
        Ok(app)
    }

    /// Run the main application loop.
    pub async fn run_async(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> std::io::Result<()> {
        let event_handler = EventHandler::new(TICK_RATE_MS);

        self.switch_to_tab(self.active_tab);

        while !self.should_quit {
            self.tick();

            terminal.draw(|frame| self.draw(frame))?;

            // Polling blocks this thread; give spawned fetches a turn first.
            tokio::task::yield_now().await;
            match event_handler.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(_, _) | Event::Tick => {}
            }
        }

        Ok(())
    }

    /// Apply finished requests and due searches on every tab.
    pub(crate) fn tick(&mut self) {
        self.tables.tick();
        self.leaderboard.tick();
        self.constructors.tick();
        self.driver.tick();
    }

    pub(crate) fn active_component(&mut self) -> &mut dyn Component {
        match self.active_tab {
            ActiveTab::Tables => &mut self.tables,
            ActiveTab::Leaderboard => &mut self.leaderboard,
            ActiveTab::Constructors => &mut self.constructors,
            ActiveTab::Drivers => &mut self.driver,
        }
    }

    pub(crate) fn refresh_bindings(&mut self) {
        let bindings = self.active_component().key_bindings();
        self.status_bar.set_bindings(bindings);
    }

    /// Switch tabs. Each tab loads on first view.
    pub(crate) fn switch_to_tab(&mut self, tab: ActiveTab) {
        log::debug!("Switching to tab {:?}", tab);
        self.active_tab = tab;
        self.active_component().activate();
        self.refresh_bindings();
        self.status_bar
            .set_message(format!("Viewing: {}", tab.label()));
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(STATUS_BAR_HEIGHT),
            ])
            .split(frame.area());

        self.draw_header_with_tabs(frame, chunks[0]);
        self.active_component().draw(frame, chunks[1], true);
        self.status_bar.draw(frame, chunks[2], false);
    }

    fn connection_indicator(&self) -> Span<'static> {
        let browser = self.tables.browser();
        if browser.error().is_some() {
            Span::styled(" ✗ ", Style::default().fg(Color::Red))
        } else if browser.is_tables_loading() {
            Span::styled(" ◐ ", Style::default().fg(Color::Yellow))
        } else if browser.tables().is_empty() {
            Span::styled(" ○ ", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(" ● ", Style::default().fg(Color::Green))
        }
    }

    fn draw_header_with_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = vec![Span::raw(" ")];

        for (i, tab) in ActiveTab::ALL.iter().enumerate() {
            let style = if *tab == self.active_tab {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} {} ", i + 1, tab.label()), style));
            spans.push(Span::raw(" "));
        }

        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        spans.push(self.connection_indicator());
        spans.push(Span::styled(
            self.base_url.clone(),
            Style::default().fg(Color::DarkGray),
        ));

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(" pitwall ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(header, area);
    }
}
