use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

pub const CALLBACK_COUNT: usize = 3;

/// The fixed event sources, one per callback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Timer,
    SwitchA,
    SwitchB,
}

impl EventSource {
    pub fn index(self) -> usize {
        match self {
            EventSource::Timer => 0,
            EventSource::SwitchA => 1,
            EventSource::SwitchB => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<EventSource> {
        match index {
            0 => Some(EventSource::Timer),
            1 => Some(EventSource::SwitchA),
            2 => Some(EventSource::SwitchB),
            _ => None,
        }
    }
}

/// A zero count is a disabled slot. A negative count never runs out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Callback {
    pub count: i32,
    pub payload: String,
}

#[derive(Debug, Default)]
pub struct CallbackTable {
    slots: [Callback; CALLBACK_COUNT],
}

impl CallbackTable {
    pub fn new() -> CallbackTable {
        CallbackTable::default()
    }

    pub fn configure(&mut self, index: usize, count: i32, payload: &str) -> Result<()> {
        let slot = self.slot(index)?;
        slot.count = count;
        slot.payload = payload.to_string();
        Ok(())
    }

    pub fn clear(&mut self, index: usize) -> Result<()> {
        *self.slot(index)? = Callback::default();
        Ok(())
    }

    pub fn clear_all(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Callback::default();
        }
    }

    /// Consumes one firing and returns the payload to enqueue.
    pub fn fire(&mut self, index: usize) -> Option<String> {
        let slot = self.slots.get_mut(index)?;
        if slot.count == 0 {
            return None;
        }
        let payload = slot.payload.clone();
        if slot.count > 0 {
            slot.count -= 1;
            if slot.count == 0 {
                slot.payload.clear();
            }
        }
        Some(payload)
    }

    pub fn get(&self, index: usize) -> Option<&Callback> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Callback> {
        self.slots.iter()
    }

    fn slot(&mut self, index: usize) -> Result<&mut Callback> {
        match self.slots.get_mut(index) {
            Some(slot) => Ok(slot),
            None => Err(error!(InvalidCallbackIndex)),
        }
    }
}
