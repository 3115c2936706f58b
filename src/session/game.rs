use thiserror::Error;

use crate::content::category::Category;
use crate::content::question::QuizQuestion;
use crate::session::result::QuizResult;
use crate::session::timer::{QuestionTimer, TimerHandle, TimerTick};
use crate::store::Stores;
use crate::store::ranking::NewRankingEntry;

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 20;

/// Where the session's questions come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionSource {
    Category(&'static Category),
    /// Previously missed questions. Misses are not recorded again.
    Revision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    /// Loading produced no questions. Terminal.
    Empty,
    Playing,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Unanswered,
    TimedOut,
    Chosen(usize),
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub questions: Vec<QuizQuestion>,
    pub current_index: usize,
    pub score: u32,
    pub selection: Selection,
    pub answer_checked: bool,
    pub finished: bool,
    pub time_remaining: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Counted(u32),
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next,
    Finished { name_prompt: bool },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name must have at least {} characters", MIN_NAME_LEN)]
    TooShort,
    #[error("name must have at most {} characters", MAX_NAME_LEN)]
    TooLong,
    #[error("no ranking entry is waiting for a name")]
    NotPending,
}

pub fn validate_player_name(raw: &str) -> Result<String, NameError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err(NameError::TooShort);
    }
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    Ok(name.to_string())
}

/// One playthrough: loading, per-question countdown, scoring and the
/// hand-off of misses and final scores to the stores.
pub struct QuizSession {
    source: SessionSource,
    phase: Phase,
    state: GameState,
    timer: QuestionTimer,
    exit_pending: bool,
    name_prompt: bool,
    errors_recorded: usize,
    stores: Stores,
}

impl QuizSession {
    /// A category session waiting for its questions; see [`QuizSession::begin`].
    pub fn for_category(category: &'static Category, stores: Stores, seconds: u32) -> Self {
        Self::new(SessionSource::Category(category), stores, seconds)
    }

    /// A revision session over `questions`, started immediately.
    pub fn revision(questions: Vec<QuizQuestion>, stores: Stores, seconds: u32) -> Self {
        let mut session = Self::new(SessionSource::Revision, stores, seconds);
        session.begin(questions);
        session
    }

    fn new(source: SessionSource, stores: Stores, seconds: u32) -> Self {
        Self {
            source,
            phase: Phase::Loading,
            state: GameState {
                questions: Vec::new(),
                current_index: 0,
                score: 0,
                selection: Selection::Unanswered,
                answer_checked: false,
                finished: false,
                time_remaining: seconds,
            },
            timer: QuestionTimer::new(seconds),
            exit_pending: false,
            name_prompt: false,
            errors_recorded: 0,
            stores,
        }
    }

    /// Hand over the loaded questions. Only meaningful while loading.
    pub fn begin(&mut self, questions: Vec<QuizQuestion>) {
        if self.phase != Phase::Loading {
            return;
        }
        if questions.is_empty() {
            self.phase = Phase::Empty;
            return;
        }
        self.state.questions = questions;
        self.phase = Phase::Playing;
        self.start_question_timer();
    }

    fn start_question_timer(&mut self) {
        self.timer.start();
        self.state.time_remaining = self.timer.remaining();
        // The player may be looking at the exit dialog while questions arrive.
        if self.exit_pending {
            self.timer.pause();
        }
    }

    pub fn source(&self) -> SessionSource {
        self.source
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_revision(&self) -> bool {
        self.source == SessionSource::Revision
    }

    pub fn title(&self) -> &'static str {
        match self.source {
            SessionSource::Category(c) => c.title,
            SessionSource::Revision => "Revision",
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.state.questions.get(self.state.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.state.current_index + 1 >= self.state.questions.len()
    }

    pub fn exit_pending(&self) -> bool {
        self.exit_pending
    }

    pub fn name_prompt_pending(&self) -> bool {
        self.name_prompt
    }

    pub fn errors_recorded(&self) -> usize {
        self.errors_recorded
    }

    pub fn seconds_per_question(&self) -> u32 {
        self.timer.duration()
    }

    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer.running_handle()
    }

    fn accepts_input(&self) -> bool {
        self.phase == Phase::Playing && !self.exit_pending
    }

    pub fn select_option(&mut self, index: usize) -> Option<AnswerOutcome> {
        if !self.accepts_input() || self.state.answer_checked {
            return None;
        }
        let question = self.current_question()?;
        if index >= question.options.len() {
            return None;
        }
        let correct = question.is_correct(index);

        self.timer.cancel();
        self.state.selection = Selection::Chosen(index);
        self.state.answer_checked = true;

        if correct {
            self.state.score += 1;
            debug_assert!(self.state.score as usize <= self.state.current_index + 1);
            Some(AnswerOutcome::Correct)
        } else {
            self.record_miss(Some(index));
            Some(AnswerOutcome::Incorrect)
        }
    }

    /// One second of countdown for the timer identified by `handle`.
    pub fn on_tick(&mut self, handle: TimerHandle) -> TickOutcome {
        if self.phase != Phase::Playing || self.state.finished || self.state.answer_checked {
            return TickOutcome::Ignored;
        }
        match self.timer.tick(handle) {
            TimerTick::Counting(remaining) => {
                self.state.time_remaining = remaining;
                TickOutcome::Counted(remaining)
            }
            TimerTick::Expired => {
                self.time_out();
                TickOutcome::TimedOut
            }
            TimerTick::Stale | TimerTick::Paused => TickOutcome::Ignored,
        }
    }

    fn time_out(&mut self) {
        self.state.time_remaining = 0;
        self.state.selection = Selection::TimedOut;
        self.state.answer_checked = true;
        self.record_miss(None);
    }

    fn record_miss(&mut self, user_answer: Option<usize>) {
        let SessionSource::Category(category) = self.source else {
            return;
        };
        let Some(question) = self.state.questions.get(self.state.current_index) else {
            return;
        };
        if self.stores.history.add(question, category.title, user_answer) {
            self.errors_recorded += 1;
        }
    }

    pub fn advance(&mut self) -> Option<Advance> {
        if !self.accepts_input() || !self.state.answer_checked {
            return None;
        }

        if self.is_last_question() {
            return Some(self.finish());
        }

        self.state.current_index += 1;
        self.state.selection = Selection::Unanswered;
        self.state.answer_checked = false;
        self.start_question_timer();
        Some(Advance::Next)
    }

    fn finish(&mut self) -> Advance {
        self.timer.cancel();
        self.state.finished = true;
        self.phase = Phase::Finished;

        if let SessionSource::Category(category) = self.source {
            self.name_prompt = self.stores.ranking.is_top_score(self.state.score);
            log::info!(
                "Finished '{}' with {}/{}",
                category.id,
                self.state.score,
                self.state.questions.len()
            );
        }
        Advance::Finished {
            name_prompt: self.name_prompt,
        }
    }

    pub fn request_exit(&mut self) {
        self.exit_pending = true;
        self.timer.pause();
    }

    pub fn cancel_exit(&mut self) {
        self.exit_pending = false;
        if !self.state.finished && !self.state.answer_checked {
            self.timer.resume();
        }
    }

    /// Discard the session. Any running countdown dies with it.
    pub fn confirm_exit(mut self) {
        self.timer.cancel();
    }

    /// Place the finished run on the leaderboard under `raw_name`.
    /// Returns the 1-indexed position, or `None` if it did not make the table.
    pub fn submit_name(&mut self, raw_name: &str) -> Result<Option<usize>, NameError> {
        if !self.name_prompt {
            return Err(NameError::NotPending);
        }
        let player_name = validate_player_name(raw_name)?;
        self.name_prompt = false;

        let position = self.stores.ranking.add(NewRankingEntry {
            player_name,
            score: self.state.score,
            category: self.title().to_string(),
            questions_answered: self.state.questions.len(),
            correct_answers: self.state.score,
        });
        Ok(position)
    }

    pub fn skip_name(&mut self) {
        self.name_prompt = false;
    }

    pub fn result(&self) -> QuizResult {
        QuizResult::new(self.state.score, self.state.questions.len())
    }
}
