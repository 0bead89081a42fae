//! UI state management for the terminal front end

use std::collections::VecDeque;

use crate::core::types::Millis;
use crate::input::Gesture;
use crate::simulation::engine::PollReport;
use crate::simulation::tick::PenEvent;

/// Maximum log entries to keep
const MAX_LOG_ENTRIES: usize = 50;

/// Front-end state that is not part of the simulation
#[derive(Debug, Default)]
pub struct GameUI {
    /// Recent gestures and pen events, oldest first
    pub action_log: VecDeque<LogEntry>,
    /// Whether to show the key legend
    pub show_help: bool,
    /// Whether wander steps are logged (they are frequent)
    pub log_moves: bool,
}

/// An entry in the action log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: Millis,
    pub message: String,
    pub category: LogCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Input,
    Pen,
    System,
}

impl GameUI {
    pub fn new() -> Self {
        Self {
            action_log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            show_help: true,
            log_moves: false,
        }
    }

    /// Add an entry to the action log
    pub fn log(&mut self, at: Millis, message: String, category: LogCategory) {
        if self.action_log.len() >= MAX_LOG_ENTRIES {
            self.action_log.pop_front();
        }
        self.action_log.push_back(LogEntry {
            at,
            message,
            category,
        });
    }

    /// Log everything notable from one poll
    pub fn record(&mut self, report: &PollReport) {
        if let Some(gesture) = report.gesture {
            self.log(report.now, describe_gesture(gesture), LogCategory::Input);
        }
        for event in &report.events {
            if matches!(event, PenEvent::Moved { .. } | PenEvent::Hungered { .. })
                && !self.log_moves
            {
                continue;
            }
            self.log(report.now, describe_event(event), LogCategory::Pen);
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Newest `n` entries, newest last
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.action_log.iter().skip(self.action_log.len().saturating_sub(n))
    }
}

pub fn describe_gesture(gesture: Gesture) -> String {
    match gesture {
        Gesture::CursorMoved { to } => format!("cursor -> {}", to),
        Gesture::TreatPlaced { position, balance } => {
            format!("treat placed at {} (bank {})", position, balance)
        }
        Gesture::TreatRemoved { position, balance } => {
            format!("treat removed at {} (bank {})", position, balance)
        }
        Gesture::TreatRefused { position } => format!("no money for a treat at {}", position),
        Gesture::ModeChanged { mode } => format!("showing {:?}", mode),
    }
}

pub fn describe_event(event: &PenEvent) -> String {
    match event {
        PenEvent::Hungered { id, hunger, .. } => format!("{} hunger {}", id, hunger),
        PenEvent::Died { id, .. } => format!("{} starved", id),
        PenEvent::Ate {
            id,
            position,
            hunger,
            ..
        } => format!("{} ate at {} (hunger {})", id, position, hunger),
        PenEvent::Moved { id, from, to, .. } => format!("{} {} -> {}", id, from, to),
        PenEvent::Removed { id, .. } => format!("{} is gone", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MonsterId;

    #[test]
    fn test_log_is_bounded() {
        let mut ui = GameUI::new();
        for i in 0..(MAX_LOG_ENTRIES as u64 + 10) {
            ui.log(i, format!("entry {}", i), LogCategory::System);
        }
        assert_eq!(ui.action_log.len(), MAX_LOG_ENTRIES);
        assert_eq!(ui.action_log.front().unwrap().at, 10);
    }

    #[test]
    fn test_record_skips_moves_by_default() {
        let mut ui = GameUI::new();
        let report = PollReport {
            now: 5,
            gesture: Some(Gesture::CursorMoved { to: 3 }),
            events: vec![
                PenEvent::Moved {
                    id: MonsterId(0),
                    from: 1,
                    to: 2,
                    at: 5,
                },
                PenEvent::Died {
                    id: MonsterId(1),
                    at: 5,
                },
            ],
        };

        ui.record(&report);

        let messages: Vec<_> = ui.recent(10).map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["cursor -> 3", "#1 starved"]);
    }
}
