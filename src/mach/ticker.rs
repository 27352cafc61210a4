use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

pub const TICKER_COUNT: usize = 16;

/// ## Software timer
///
/// Counts down once per tick quantum and hands back its payload on
/// expiry. A negative `count` repeats forever.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ticker {
    pub active: bool,
    pub initial_delay: u32,
    pub period: u32,
    pub count: i32,
    pub current_delay: u32,
    pub payload: String,
}

impl Ticker {
    fn tick(&mut self) -> Option<String> {
        if !self.active {
            return None;
        }
        self.current_delay = self.current_delay.saturating_sub(1);
        if self.current_delay > 0 {
            return None;
        }
        if self.count == 0 {
            self.active = false;
            return None;
        }
        if self.count > 0 {
            self.count -= 1;
        }
        if self.count == 0 {
            self.active = false;
        } else {
            self.current_delay = self.period.max(1);
        }
        Some(self.payload.clone())
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}, delay {}, period {}, count {}, next {}, payload: {}",
            if self.active { "active" } else { "inactive" },
            self.initial_delay,
            self.period,
            self.count,
            self.current_delay,
            self.payload
        )
    }
}

#[derive(Debug, Default)]
pub struct TickerTable {
    tickers: [Ticker; TICKER_COUNT],
}

impl TickerTable {
    pub fn new() -> TickerTable {
        TickerTable::default()
    }

    /// A count of zero stores the ticker without activating it.
    pub fn configure(
        &mut self,
        index: usize,
        initial_delay: u32,
        period: u32,
        count: i32,
        payload: &str,
    ) -> Result<()> {
        let ticker = match self.tickers.get_mut(index) {
            Some(ticker) => ticker,
            None => return Err(error!(InvalidTickerIndex)),
        };
        *ticker = Ticker {
            active: count != 0,
            initial_delay,
            period,
            count,
            current_delay: initial_delay.max(1),
            payload: payload.to_string(),
        };
        Ok(())
    }

    /// Advances every active ticker one quantum. Returns the payloads
    /// that fired, lowest index first.
    pub fn tick(&mut self) -> Vec<(usize, String)> {
        self.tickers
            .iter_mut()
            .enumerate()
            .filter_map(|(index, ticker)| ticker.tick().map(|payload| (index, payload)))
            .collect()
    }

    pub fn clear_all(&mut self) {
        for ticker in self.tickers.iter_mut() {
            *ticker = Ticker::default();
        }
    }

    pub fn pause_all(&mut self) {
        for ticker in self.tickers.iter_mut() {
            ticker.active = false;
        }
    }

    /// Reactivates tickers that have a period and firings left.
    pub fn resume_all(&mut self) {
        for ticker in self.tickers.iter_mut() {
            if ticker.period != 0 && ticker.count != 0 {
                ticker.active = true;
                if ticker.current_delay == 0 {
                    ticker.current_delay = ticker.period;
                }
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Ticker> {
        self.tickers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticker> {
        self.tickers.iter()
    }

    pub fn active_count(&self) -> usize {
        self.tickers.iter().filter(|t| t.active).count()
    }
}
