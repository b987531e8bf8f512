//! Per-user conversation state: IDLE -> AWAITING_QUERY -> IDLE.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Search,
    Cancel,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Text(String),
}

/// What the handler should do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Greet,
    AskQuery,
    Cancelled,
    RunSearch(String),
    Hint,
    Ignore,
}

/// `/buscar@precio_bot tarja` is the `/buscar` command; the rest is ignored.
pub fn parse_input(text: &str) -> Input {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Input::Text(trimmed.to_string());
    };

    let word = rest.split_whitespace().next().unwrap_or("");
    let name = word.split('@').next().unwrap_or("").to_lowercase();

    let command = match name.as_str() {
        "start" => Command::Start,
        "search" | "buscar" => Command::Search,
        "cancel" | "cancelar" => Command::Cancel,
        _ => Command::Unknown(name),
    };
    Input::Command(command)
}

pub fn transition(state: ConversationState, input: Input) -> (ConversationState, Action) {
    use ConversationState::*;

    match (state, input) {
        (state, Input::Command(Command::Start)) => (state, Action::Greet),
        (_, Input::Command(Command::Search)) => (AwaitingQuery, Action::AskQuery),
        (AwaitingQuery, Input::Command(Command::Cancel)) => (Idle, Action::Cancelled),
        (Idle, Input::Command(Command::Cancel)) => (Idle, Action::Ignore),
        (state, Input::Command(Command::Unknown(_))) => (state, Action::Ignore),
        (AwaitingQuery, Input::Text(text)) if text.is_empty() => (AwaitingQuery, Action::AskQuery),
        (AwaitingQuery, Input::Text(text)) => (Idle, Action::RunSearch(text)),
        (Idle, Input::Text(_)) => (Idle, Action::Hint),
    }
}

/// Identifies one user inside one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: i64,
    pub user_id: i64,
}

/// Only non-idle users are stored.
#[derive(Default)]
pub struct Conversations {
    states: Mutex<HashMap<ConversationKey, ConversationState>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self, key: ConversationKey) -> ConversationState {
        let states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        states.get(&key).copied().unwrap_or_default()
    }

    pub fn apply(&self, key: ConversationKey, input: Input) -> Action {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        let current = states.get(&key).copied().unwrap_or_default();

        let (next, action) = transition(current, input);
        match next {
            ConversationState::Idle => {
                states.remove(&key);
            }
            other => {
                states.insert(key, other);
            }
        }
        action
    }
}
