//! Action logging with pattern-based filtering and in-memory storage
//!
//! [`LoggingMiddleware`] writes every dispatched action to `tracing` and can
//! keep the most recent ones in a shared [`ActionLog`] ring buffer.
//!
//! # Example
//!
//! ```ignore
//! use reducer_actions_core::logging::{ActionLogConfig, ActionLoggerConfig, LoggingMiddleware};
//!
//! // Log everything except `tick` (tracing only)
//! let middleware = LoggingMiddleware::new(ActionLoggerConfig::new(None, Some("tick")));
//!
//! // Also record into a ring buffer
//! let middleware = LoggingMiddleware::with_log(ActionLogConfig::default());
//! let log = middleware.log().unwrap();
//! store.add_middleware(middleware);
//!
//! for entry in log.borrow().recent(10) {
//!     println!("#{} {}", entry.sequence, entry.name);
//! }
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::store::Middleware;
use crate::Action;

/// Configuration for action logging with glob pattern filtering.
///
/// Patterns support:
/// - `*` matches any sequence of characters
/// - `?` matches any single character
/// - Literal text matches exactly
///
/// # Examples
///
/// - `append*` matches append, append_all, etc.
/// - `*reset*` matches any action containing "reset"
/// - `pop` matches only pop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionLoggerConfig {
    /// If non-empty, only log actions matching these patterns
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include)
    pub exclude_patterns: Vec<String>,
}

fn split_patterns(patterns: Option<&str>) -> Vec<String> {
    patterns
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl ActionLoggerConfig {
    /// Create a new config from comma-separated pattern strings
    ///
    /// # Example
    /// ```
    /// use reducer_actions_core::logging::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("append*,pop"), Some("append_quiet"));
    /// assert!(config.should_log("append"));
    /// assert!(config.should_log("pop"));
    /// assert!(!config.should_log("append_quiet"));
    /// assert!(!config.should_log("reset"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: split_patterns(include),
            exclude_patterns: split_patterns(exclude),
        }
    }

    /// Create a config with specific pattern vectors
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check if an action name should be logged based on include/exclude patterns
    pub fn should_log(&self, action_name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_name))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, action_name))
    }
}

/// An entry in the action log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogEntry {
    /// Action name (from Action::name())
    pub name: String,
    /// Debug representation of the action
    pub summary: String,
    /// Sequence number for ordering
    pub sequence: u64,
    /// Whether the action caused a state change (set after reducer runs)
    pub state_changed: Option<bool>,
}

/// Configuration for the action log ring buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionLogConfig {
    /// Maximum number of entries to keep
    pub capacity: usize,
    pub filter: ActionLoggerConfig,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            filter: ActionLoggerConfig::default(),
        }
    }
}

impl ActionLogConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }
}

/// In-memory ring buffer of recent actions
///
/// Older entries are discarded when capacity is reached.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    config: ActionLogConfig,
    next_sequence: u64,
}

impl ActionLog {
    pub fn new(config: ActionLogConfig) -> Self {
        Self {
            // Capacity may come from a config file; grow on demand past this
            entries: VecDeque::with_capacity(config.capacity.min(64)),
            config,
            next_sequence: 0,
        }
    }

    /// Log an action (if it passes the filter)
    ///
    /// Returns the entry if it was logged, None if filtered out.
    pub fn log<A: Action>(&mut self, action: &A) -> Option<&ActionLogEntry> {
        let name = action.name();
        if self.config.capacity == 0 || !self.config.filter.should_log(name) {
            return None;
        }

        let entry = ActionLogEntry {
            name: name.to_string(),
            summary: format!("{:?}", action),
            sequence: self.next_sequence,
            state_changed: None,
        };
        self.next_sequence += 1;

        if self.entries.len() >= self.config.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.entries.back()
    }

    /// Update the last entry with state_changed info (called after reducer)
    pub fn update_last_state_changed(&mut self, changed: bool) {
        if let Some(entry) = self.entries.back_mut() {
            entry.state_changed = Some(changed);
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    /// The most recent N entries, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(count)
    }

    /// Logged action names, oldest first
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn config(&self) -> &ActionLogConfig {
        &self.config
    }
}

/// Middleware that logs actions with configurable pattern filtering.
///
/// Supports two modes:
/// - **Tracing only** (default): logs via `tracing::debug!()`
/// - **With storage**: also records into a shared [`ActionLog`]
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    config: ActionLoggerConfig,
    log: Option<Rc<RefCell<ActionLog>>>,
    /// Tracks whether the last action was recorded (for state_changed updates)
    last_action_logged: bool,
    active: bool,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(ActionLoggerConfig::default())
    }
}

impl LoggingMiddleware {
    /// Tracing only, no in-memory storage
    pub fn new(config: ActionLoggerConfig) -> Self {
        Self {
            config,
            log: None,
            last_action_logged: false,
            active: true,
        }
    }

    /// Tracing plus an in-memory log filtered by `config.filter`
    pub fn with_log(config: ActionLogConfig) -> Self {
        Self {
            config: config.filter.clone(),
            log: Some(Rc::new(RefCell::new(ActionLog::new(config)))),
            last_action_logged: false,
            active: true,
        }
    }

    /// Tracing plus recording into an existing shared log
    pub fn with_shared_log(log: Rc<RefCell<ActionLog>>) -> Self {
        let config = log.borrow().config().filter.clone();
        Self {
            config,
            log: Some(log),
            last_action_logged: false,
            active: true,
        }
    }

    /// Set whether the middleware is active.
    ///
    /// When inactive all methods are no-ops.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Shared handle to the action log (if storage is enabled)
    pub fn log(&self) -> Option<Rc<RefCell<ActionLog>>> {
        self.log.clone()
    }

    pub fn config(&self) -> &ActionLoggerConfig {
        &self.config
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if !self.active {
            return;
        }

        let name = action.name();
        if self.config.should_log(name) {
            tracing::debug!(action = %name, "dispatching action");
        }

        self.last_action_logged = false;
        if let Some(log) = &self.log {
            if log.borrow_mut().log(action).is_some() {
                self.last_action_logged = true;
            }
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if !self.active {
            return;
        }

        if self.config.should_log(action.name()) {
            tracing::debug!(action = %action.name(), state_changed, "action processed");
        }

        // Only update state_changed if this action was actually recorded
        if self.last_action_logged {
            if let Some(log) = &self.log {
                log.borrow_mut().update_last_state_changed(state_changed);
            }
        }
    }
}

/// Simple glob pattern matching supporting `*` and `?`.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut pi = 0;
    let mut ti = 0;
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(&c) if c == '?' || c == text[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                // Backtrack: let the last `*` swallow one more character
                Some((star_pi, star_ti)) => {
                    pi = star_pi + 1;
                    ti = star_ti + 1;
                    star = Some((star_pi, star_ti + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::NamedAction;

    #[test]
    fn test_glob_match_exact() {
        assert!(glob_match("pop", "pop"));
        assert!(!glob_match("pop", "push"));
        assert!(!glob_match("pop", "pop_all"));
    }

    #[test]
    fn test_glob_match_star() {
        assert!(glob_match("append*", "append_all"));
        assert!(glob_match("append*", "append"));
        assert!(!glob_match("append*", "re_append"));
        assert!(glob_match("*append", "re_append"));
        assert!(glob_match("*set*", "reset_all"));
        assert!(glob_match("*", ""));
    }

    #[test]
    fn test_glob_match_question() {
        assert!(glob_match("pop?", "pops"));
        assert!(!glob_match("pop?", "pop"));
        assert!(!glob_match("pop?", "popss"));
    }

    #[test]
    fn test_glob_match_backtracking() {
        assert!(glob_match("a*b*c", "a_b_x_b_c"));
        assert!(!glob_match("a*b*c", "a_b_x_b_d"));
    }

    #[test]
    fn test_config_include_and_exclude() {
        let config = ActionLoggerConfig::new(Some("set_*"), Some("set_quiet*"));
        assert!(config.should_log("set_name"));
        assert!(!config.should_log("set_quiet_flag"));
        assert!(!config.should_log("reset"));
    }

    #[test]
    fn test_config_default_logs_everything() {
        let config = ActionLoggerConfig::default();
        assert!(config.should_log("append"));
        assert!(config.should_log("tick"));
    }

    #[test]
    fn test_config_ignores_blank_patterns() {
        let config = ActionLoggerConfig::new(Some(" , append ,"), None);
        assert_eq!(config.include_patterns, vec!["append".to_string()]);
    }

    #[test]
    fn test_config_deserialize() {
        let config: ActionLogConfig = serde_json::from_str(
            r#"{ "capacity": 2, "filter": { "exclude_patterns": ["tick"] } }"#,
        )
        .unwrap();
        assert_eq!(config.capacity, 2);
        assert!(config.filter.include_patterns.is_empty());
        assert!(!config.filter.should_log("tick"));

        let defaults: ActionLogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, ActionLogConfig::default());
    }

    #[test]
    fn test_action_log_capacity() {
        let mut log = ActionLog::new(ActionLogConfig::with_capacity(3));
        for _ in 0..4 {
            log.log(&NamedAction::payloadless("pop"));
        }
        assert_eq!(log.len(), 3);
        // Sequence 0 was evicted
        assert_eq!(log.entries().next().unwrap().sequence, 1);

        let recent: Vec<_> = log.recent(2).map(|e| e.sequence).collect();
        assert_eq!(recent, vec![3, 2]);
    }

    #[test]
    fn test_action_log_zero_capacity_records_nothing() {
        let mut log = ActionLog::new(ActionLogConfig::with_capacity(0));
        assert!(log.log(&NamedAction::payloadless("pop")).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_action_log_huge_capacity_from_config() {
        let config: ActionLogConfig =
            serde_json::from_str(r#"{ "capacity": 18446744073709551615 }"#).unwrap();
        assert_eq!(config.capacity, usize::MAX);

        let mut log = ActionLog::new(config);
        assert!(log.log(&NamedAction::payloadless("pop")).is_some());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_shared_log_uses_log_filter() {
        let log = Rc::new(RefCell::new(ActionLog::new(ActionLogConfig {
            capacity: 4,
            filter: ActionLoggerConfig::new(None, Some("tick")),
        })));
        let mut middleware = LoggingMiddleware::with_shared_log(Rc::clone(&log));
        assert!(!middleware.config().should_log("tick"));

        let tick = NamedAction::payloadless("tick");
        let pop = NamedAction::payloadless("pop");
        for action in [&tick, &pop] {
            middleware.before(action);
            middleware.after(action, true);
        }
        assert_eq!(log.borrow().names(), vec!["pop".to_string()]);
    }

    #[test]
    fn test_middleware_records_state_changed() {
        let mut middleware = LoggingMiddleware::with_log(ActionLogConfig {
            capacity: 10,
            filter: ActionLoggerConfig::new(None, Some("tick")),
        });
        let log = middleware.log().unwrap();

        let append = NamedAction::with_payload("append", "value".to_string());
        middleware.before(&append);
        middleware.after(&append, true);

        // Filtered action must not overwrite the previous entry
        let tick = NamedAction::payloadless("tick");
        middleware.before(&tick);
        middleware.after(&tick, false);

        let log = log.borrow();
        assert_eq!(log.names(), vec!["append".to_string()]);
        assert_eq!(log.entries().next().unwrap().state_changed, Some(true));
    }

    #[test]
    fn test_inactive_middleware_records_nothing() {
        let mut middleware = LoggingMiddleware::with_log(ActionLogConfig::default()).active(false);
        let action = NamedAction::payloadless("pop");
        middleware.before(&action);
        middleware.after(&action, true);
        assert!(middleware.log().unwrap().borrow().is_empty());
    }
}
