use serde::Serialize;

use crate::month::MonthKey;

/// Inclusive range of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: MonthKey,
    pub end: MonthKey,
}

impl Window {
    /// Every month from `start` to `end`, oldest first.
    pub fn months(&self) -> Vec<MonthKey> {
        let span = self.start.months_until(self.end).max(0);
        (0..=span)
            .map(|offset| self.start.add_months(offset))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.start.months_until(self.end).max(0) as usize + 1
    }
}

/// Longest window a controller will hold, ten years of months.
pub const MAX_SPAN: u32 = 120;

/// Owns the displayed window and keeps its end at or before the current month.
#[derive(Debug, Clone)]
pub struct WindowController {
    span: u32,
    current: MonthKey,
    window: Window,
}

impl WindowController {
    /// Window of `months_back` months ending at `current`, with the span
    /// kept within `1..=MAX_SPAN`.
    pub fn initialize(months_back: u32, current: MonthKey) -> Self {
        let span = months_back.clamp(1, MAX_SPAN);
        Self {
            span,
            current,
            window: ending_at(current, span),
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn span(&self) -> u32 {
        self.span
    }

    pub fn current(&self) -> MonthKey {
        self.current
    }

    pub fn is_at_latest(&self) -> bool {
        self.window.end >= self.current
    }

    pub fn retreat(&mut self) -> Window {
        let shift = -i64::from(self.span);
        self.window = Window {
            start: self.window.start.add_months(shift),
            end: self.window.end.add_months(shift),
        };
        self.window
    }

    pub fn advance(&mut self) -> Window {
        let end = self.window.end.add_months(i64::from(self.span));
        self.window = if end > self.current {
            ending_at(self.current, self.span)
        } else {
            Window {
                start: self.window.start.add_months(i64::from(self.span)),
                end,
            }
        };
        self.window
    }
}

fn ending_at(end: MonthKey, span: u32) -> Window {
    Window {
        start: end.add_months(1 - i64::from(span)),
        end,
    }
}
