use std::collections::HashSet;
use std::rc::Rc;
use std::time::Instant;

use crate::config::Config;
use crate::content::banks::EmbeddedBanks;
use crate::content::category::{self, Category, HomeTab};
use crate::content::loader::{PendingLoad, QuestionLoader};
use crate::content::question::QuizQuestion;
use crate::session::game::{Advance, MAX_NAME_LEN, Phase, QuizSession, SessionSource};
use crate::session::timer::Ticker;
use crate::store::history::ErrorEntry;
use crate::store::json_store::JsonStore;
use crate::store::memory::MemoryStore;
use crate::store::ranking::RankingEntry;
use crate::store::{KeyValueStore, Stores};
use crate::ui::name_input::NameInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Loading,
    Game,
    Result,
    History,
    Leaderboard,
    About,
}

pub struct App {
    pub screen: AppScreen,
    pub tab: HomeTab,
    pub home_selected: usize,
    pub favorites: Vec<String>,
    pub session: Option<QuizSession>,
    pub highlighted_option: usize,
    pub history: Vec<ErrorEntry>,
    pub history_selected: usize,
    pub history_marked: HashSet<String>,
    pub history_confirm_clear: bool,
    pub ranking: Vec<RankingEntry>,
    pub ranking_confirm_clear: bool,
    pub name_input: Option<NameInput>,
    pub name_error: Option<String>,
    pub last_position: Option<usize>,
    pub theme: &'static Theme,
    pub config: Config,
    pub stores: Stores,
    pub should_quit: bool,
    pending: Option<PendingLoad>,
    ticker: Ticker,
    revision_set: Vec<QuizQuestion>,
    persist_config: bool,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme) -> Self {
        let backend: Rc<dyn KeyValueStore> = match JsonStore::new() {
            Ok(store) => Rc::new(store),
            Err(e) => {
                log::warn!("No data directory ({e}); progress will not be saved");
                Rc::new(MemoryStore::new())
            }
        };
        let mut app = Self::with_stores(config, theme, Stores::new(backend));
        app.persist_config = true;
        app
    }

    /// An app over the given stores that never writes the config file.
    pub fn with_stores(config: Config, theme: &'static Theme, stores: Stores) -> Self {
        let favorites = stores.favorites.load();
        Self {
            screen: AppScreen::Home,
            tab: HomeTab::General,
            home_selected: 0,
            favorites,
            session: None,
            highlighted_option: 0,
            history: Vec::new(),
            history_selected: 0,
            history_marked: HashSet::new(),
            history_confirm_clear: false,
            ranking: Vec::new(),
            ranking_confirm_clear: false,
            name_input: None,
            name_error: None,
            last_position: None,
            theme,
            config,
            stores,
            should_quit: false,
            pending: None,
            ticker: Ticker::default(),
            revision_set: Vec::new(),
            persist_config: false,
        }
    }

    // --- Home ---

    pub fn home_categories(&self) -> Vec<&'static Category> {
        category::by_tab(self.tab, &self.favorites)
    }

    pub fn selected_category(&self) -> Option<&'static Category> {
        self.home_categories().get(self.home_selected).copied()
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.home_selected = 0;
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
        self.home_selected = 0;
    }

    pub fn home_next(&mut self) {
        let len = self.home_categories().len();
        if len > 0 {
            self.home_selected = (self.home_selected + 1) % len;
        }
    }

    pub fn home_prev(&mut self) {
        let len = self.home_categories().len();
        if len > 0 {
            self.home_selected = (self.home_selected + len - 1) % len;
        }
    }

    pub fn toggle_favorite(&mut self) {
        let Some(category) = self.selected_category() else {
            return;
        };
        self.favorites = self.stores.favorites.toggle(category.id);
        let len = self.home_categories().len();
        self.home_selected = self.home_selected.min(len.saturating_sub(1));
    }

    pub fn start_selected(&mut self) {
        if let Some(category) = self.selected_category() {
            self.start_category(category);
        }
    }

    pub fn go_home(&mut self) {
        if let Some(session) = self.session.take() {
            session.confirm_exit();
        }
        self.pending = None;
        self.name_input = None;
        self.name_error = None;
        self.favorites = self.stores.favorites.load();
        self.screen = AppScreen::Home;
    }

    pub fn go_to_about(&mut self) {
        self.screen = AppScreen::About;
    }

    // --- Sessions ---

    pub fn start_category(&mut self, category: &'static Category) {
        let loader = QuestionLoader::new(EmbeddedBanks, self.config.load_delay());
        self.pending = Some(PendingLoad::spawn(
            loader,
            category.id,
            self.config.question_count,
        ));
        self.session = Some(QuizSession::for_category(
            category,
            self.stores.clone(),
            self.config.seconds_per_question,
        ));
        self.reset_round_state();
        self.screen = AppScreen::Loading;
    }

    /// Replay the marked error entries, or all of them when none are marked.
    pub fn start_revision(&mut self) {
        let questions: Vec<QuizQuestion> = self
            .history
            .iter()
            .filter(|e| self.history_marked.is_empty() || self.history_marked.contains(&e.id))
            .map(|e| e.question.clone())
            .collect();
        if questions.is_empty() {
            return;
        }
        self.revision_set = questions;
        self.begin_revision();
    }

    fn begin_revision(&mut self) {
        self.pending = None;
        self.session = Some(QuizSession::revision(
            self.revision_set.clone(),
            self.stores.clone(),
            self.config.seconds_per_question,
        ));
        self.reset_round_state();
        self.screen = AppScreen::Game;
    }

    fn reset_round_state(&mut self) {
        self.highlighted_option = 0;
        self.last_position = None;
        self.name_input = None;
        self.name_error = None;
    }

    pub fn retry(&mut self) {
        let Some(source) = self.session.as_ref().map(|s| s.source()) else {
            return;
        };
        match source {
            SessionSource::Category(category) => self.start_category(category),
            SessionSource::Revision => self.begin_revision(),
        }
    }

    /// Deliver finished loads and due countdown ticks. Called on every event.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(questions) = self.pending.as_ref().and_then(|p| p.try_take()) {
            self.pending = None;
            if let Some(session) = self.session.as_mut() {
                session.begin(questions);
            }
            if self.screen == AppScreen::Loading {
                self.screen = AppScreen::Game;
            }
        }

        let Some(session) = self.session.as_mut() else {
            self.ticker.poll(None, now);
            return;
        };
        let handle = session.timer_handle();
        let due = self.ticker.poll(handle, now);
        if let Some(handle) = handle {
            for _ in 0..due {
                session.on_tick(handle);
            }
        }
    }

    pub fn highlight_next(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.highlighted_option = (self.highlighted_option + 1) % count;
        }
    }

    pub fn highlight_prev(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.highlighted_option = (self.highlighted_option + count - 1) % count;
        }
    }

    fn option_count(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| s.current_question())
            .map_or(0, |q| q.options.len())
    }

    pub fn select_option(&mut self, index: usize) {
        if let Some(session) = self.session.as_mut()
            && session.select_option(index).is_some()
        {
            self.highlighted_option = index;
        }
    }

    /// Enter: answer with the highlighted option, or move on once checked.
    pub fn confirm(&mut self) {
        let checked = self
            .session
            .as_ref()
            .is_some_and(|s| s.state().answer_checked);
        if checked {
            self.next_question();
        } else {
            self.select_option(self.highlighted_option);
        }
    }

    pub fn next_question(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.advance() {
            Some(Advance::Next) => self.highlighted_option = 0,
            Some(Advance::Finished { name_prompt }) => {
                if name_prompt {
                    self.name_input = Some(NameInput::new(&self.config.player_name, MAX_NAME_LEN));
                }
                self.screen = AppScreen::Result;
            }
            None => {}
        }
    }

    pub fn request_exit(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.request_exit();
        }
    }

    pub fn cancel_exit(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel_exit();
        }
    }

    pub fn exit_pending(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.exit_pending())
    }

    pub fn session_phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|s| s.phase())
    }

    // --- Result / name capture ---

    pub fn submit_name(&mut self) {
        let (Some(session), Some(input)) = (self.session.as_mut(), self.name_input.as_ref()) else {
            return;
        };
        let raw = input.value().to_string();
        match session.submit_name(&raw) {
            Ok(position) => {
                self.last_position = position;
                self.name_input = None;
                self.name_error = None;
                self.remember_player_name(raw.trim());
            }
            Err(e) => self.name_error = Some(e.to_string()),
        }
    }

    pub fn skip_name(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.skip_name();
        }
        self.name_input = None;
        self.name_error = None;
    }

    fn remember_player_name(&mut self, name: &str) {
        if self.config.player_name == name {
            return;
        }
        self.config.player_name = name.to_string();
        if self.persist_config
            && let Err(e) = self.config.save()
        {
            log::error!("Failed to save config: {e}");
        }
    }

    // --- Error history ---

    pub fn go_to_history(&mut self) {
        self.history = self.stores.history.load();
        self.history_selected = 0;
        self.history_marked.clear();
        self.history_confirm_clear = false;
        self.screen = AppScreen::History;
    }

    pub fn history_next(&mut self) {
        if !self.history.is_empty() {
            self.history_selected = (self.history_selected + 1).min(self.history.len() - 1);
        }
    }

    pub fn history_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn toggle_history_mark(&mut self) {
        let Some(entry) = self.history.get(self.history_selected) else {
            return;
        };
        if !self.history_marked.remove(&entry.id) {
            self.history_marked.insert(entry.id.clone());
        }
    }

    pub fn delete_selected_history(&mut self) {
        let Some(entry) = self.history.get(self.history_selected) else {
            return;
        };
        let id = entry.id.clone();
        self.stores.history.remove(&id);
        self.history_marked.remove(&id);
        self.history = self.stores.history.load();
        self.history_selected = self
            .history_selected
            .min(self.history.len().saturating_sub(1));
    }

    pub fn request_clear_history(&mut self) {
        if !self.history.is_empty() {
            self.history_confirm_clear = true;
        }
    }

    pub fn confirm_clear_history(&mut self) {
        self.stores.history.clear();
        self.history.clear();
        self.history_marked.clear();
        self.history_selected = 0;
        self.history_confirm_clear = false;
    }

    // --- Leaderboard ---

    pub fn go_to_leaderboard(&mut self) {
        self.ranking = self.stores.ranking.load();
        self.ranking_confirm_clear = false;
        self.screen = AppScreen::Leaderboard;
    }

    pub fn request_clear_ranking(&mut self) {
        if !self.ranking.is_empty() {
            self.ranking_confirm_clear = true;
        }
    }

    pub fn confirm_clear_ranking(&mut self) {
        self.stores.ranking.clear();
        self.ranking.clear();
        self.ranking_confirm_clear = false;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::session::game::Selection;

    fn test_app() -> App {
        let config = Config {
            load_delay_ms: 0,
            question_count: 3,
            ..Config::default()
        };
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        App::with_stores(config, theme, Stores::in_memory())
    }

    fn wait_for_game(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.screen == AppScreen::Loading && Instant::now() < deadline {
            app.on_tick(Instant::now());
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(app.screen, AppScreen::Game);
    }

    fn answer_current(app: &mut App, correct: bool) {
        let q = app.session.as_ref().unwrap().current_question().unwrap();
        let idx = if correct {
            q.correct_answer_index
        } else {
            (q.correct_answer_index + 1) % q.options.len()
        };
        app.select_option(idx);
    }

    #[test]
    fn category_run_reaches_result_and_records_misses() {
        let mut app = test_app();
        app.start_category(category::find("general").unwrap());
        assert_eq!(app.screen, AppScreen::Loading);
        wait_for_game(&mut app);

        answer_current(&mut app, true);
        app.next_question();
        answer_current(&mut app, false);
        app.next_question();
        answer_current(&mut app, false);
        app.next_question();

        assert_eq!(app.screen, AppScreen::Result);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.state().score, 1);
        assert_eq!(app.stores.history.load().len(), 2);
        assert!(app.name_input.is_some());
    }

    #[test]
    fn wall_clock_ticks_time_out_question() {
        let mut app = test_app();
        app.start_category(category::find("math").unwrap());
        wait_for_game(&mut app);

        let t0 = Instant::now();
        app.on_tick(t0);
        app.on_tick(t0 + Duration::from_secs(30));
        let state = app.session.as_ref().unwrap().state();
        assert_eq!(state.selection, Selection::TimedOut);
        assert_eq!(app.stores.history.load()[0].user_answer_index, None);
    }

    #[test]
    fn exit_dialog_freezes_countdown() {
        let mut app = test_app();
        app.start_category(category::find("math").unwrap());
        wait_for_game(&mut app);

        let t0 = Instant::now();
        app.on_tick(t0);
        app.request_exit();
        app.on_tick(t0 + Duration::from_secs(60));
        app.cancel_exit();
        app.on_tick(t0 + Duration::from_secs(61));
        let state = app.session.as_ref().unwrap().state();
        assert_eq!(state.selection, Selection::Unanswered);
        assert_eq!(state.time_remaining, app.config.seconds_per_question);
    }

    #[test]
    fn submitted_name_is_ranked_and_remembered() {
        let mut app = test_app();
        app.start_category(category::find("history").unwrap());
        wait_for_game(&mut app);
        for _ in 0..3 {
            answer_current(&mut app, true);
            app.next_question();
        }
        app.name_input = Some(NameInput::new("  Bia ", MAX_NAME_LEN));
        app.submit_name();
        assert_eq!(app.last_position, Some(1));
        assert_eq!(app.config.player_name, "Bia");
        assert!(app.name_input.is_none());

        app.go_to_leaderboard();
        assert_eq!(app.ranking.len(), 1);
        assert_eq!(app.ranking[0].player_name, "Bia");
    }

    #[test]
    fn short_name_keeps_prompt_open() {
        let mut app = test_app();
        app.start_category(category::find("history").unwrap());
        wait_for_game(&mut app);
        for _ in 0..3 {
            answer_current(&mut app, true);
            app.next_question();
        }
        app.name_input = Some(NameInput::new("B", MAX_NAME_LEN));
        app.submit_name();
        assert!(app.name_input.is_some());
        assert!(app.name_error.is_some());
        assert!(app.stores.ranking.load().is_empty());
    }

    #[test]
    fn revision_uses_marked_entries_only() {
        let mut app = test_app();
        let q = |text: &str| QuizQuestion {
            question: text.to_string(),
            options: vec!["a".into(), "b".into()],
            correct_answer_index: 0,
            explanation: None,
        };
        app.stores.history.add(&q("one"), "General Knowledge", Some(1));
        app.stores.history.add(&q("two"), "General Knowledge", None);

        app.go_to_history();
        app.toggle_history_mark();
        app.start_revision();

        assert_eq!(app.screen, AppScreen::Game);
        let session = app.session.as_ref().unwrap();
        assert!(session.is_revision());
        assert_eq!(session.state().questions.len(), 1);
        assert_eq!(session.state().questions[0].question, "two");
    }

    #[test]
    fn history_delete_and_clear() {
        let mut app = test_app();
        let q = |text: &str| QuizQuestion {
            question: text.to_string(),
            options: vec!["a".into(), "b".into()],
            correct_answer_index: 0,
            explanation: None,
        };
        app.stores.history.add(&q("one"), "Mathematics", Some(1));
        app.stores.history.add(&q("two"), "Mathematics", Some(1));
        app.go_to_history();
        app.history_next();
        app.delete_selected_history();
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history_selected, 0);

        app.request_clear_history();
        assert!(app.history_confirm_clear);
        app.confirm_clear_history();
        assert!(app.stores.history.load().is_empty());
    }

    #[test]
    fn favorites_tab_follows_toggles() {
        let mut app = test_app();
        app.toggle_favorite();
        app.tab = HomeTab::Favorites;
        assert_eq!(app.home_categories().len(), 1);
        app.toggle_favorite();
        assert!(app.home_categories().is_empty());
        assert_eq!(app.home_selected, 0);
    }
}
