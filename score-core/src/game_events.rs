use score_types::{GameAction, GameView};

#[derive(Debug, Clone)]
pub enum ScoreEvent {
    ActionApplied { action: GameAction, view: GameView },
    Undone { view: GameView },
    Redone { view: GameView },
}

impl ScoreEvent {
    pub fn view(&self) -> &GameView {
        match self {
            ScoreEvent::ActionApplied { view, .. } => view,
            ScoreEvent::Undone { view } => view,
            ScoreEvent::Redone { view } => view,
        }
    }
}

/// Event handler trait for observing scoreboard changes
pub trait ScoreEventHandler: Send + Sync {
    fn handle_event(&mut self, event: &ScoreEvent);
}

/// Simple event bus for distributing scoreboard events
pub struct ScoreEventBus {
    handlers: Vec<Box<dyn ScoreEventHandler>>,
}

impl ScoreEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn ScoreEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: ScoreEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(&event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for ScoreEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScoreEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
