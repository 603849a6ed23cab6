use parse_display::Display;

use crate::models::Point;

/// Kind of listener a session registers on its input surface
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display(style = "lowercase")]
pub enum ListenerKind {
    Click,
    Key,
}

/// Input delivered by the host to an armed session
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent<T> {
    Click(ClickEvent<T>),
    Key(KeyEvent),
}

impl<T> InputEvent<T> {
    pub fn click(target: T, x: i32, y: i32) -> Self {
        Self::Click(ClickEvent {
            target,
            offset: Point::new(x, y),
        })
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(KeyEvent { key: key.into() })
    }

    pub fn kind(&self) -> ListenerKind {
        match self {
            Self::Click(_) => ListenerKind::Click,
            Self::Key(_) => ListenerKind::Key,
        }
    }
}

/// Click on a target, `offset` being relative to the target's top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent<T> {
    pub target: T,
    pub offset: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
}
