use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error { code, message: "" }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn detail(&self) -> &'static str {
        self.message
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownCommand,
    BufferOverflow,
    PayloadQueueOverflow,
    OutputQueueOverflow,
    EventQueueOverflow,
    InvalidOperand,
    InvalidRegisterIndex,
    DivisionByZero,
    InvalidMemoryAddress,
    GpioOutOfRange,
    InvalidTimerPeriod,
    InvalidCallbackIndex,
    InvalidTickerIndex,
    MissingDelay,
    MissingPeriod,
    MissingCount,
    MissingPayload,
    MissingOperand,
    InvalidParameter,
    UnknownOperation,
    InvalidScriptLine,
    EmptyScriptLine,
    MissingScriptCommand,
    UnknownScriptOperation,
    InvalidConditionSyntax,
    InvalidConditionOperator,
    MissingConditionDestination,
    Unavailable,
}

impl ErrorCode {
    pub const COUNT: usize = ErrorCode::Unavailable as usize + 1;

    pub const ALL: [ErrorCode; ErrorCode::COUNT] = [
        ErrorCode::UnknownCommand,
        ErrorCode::BufferOverflow,
        ErrorCode::PayloadQueueOverflow,
        ErrorCode::OutputQueueOverflow,
        ErrorCode::EventQueueOverflow,
        ErrorCode::InvalidOperand,
        ErrorCode::InvalidRegisterIndex,
        ErrorCode::DivisionByZero,
        ErrorCode::InvalidMemoryAddress,
        ErrorCode::GpioOutOfRange,
        ErrorCode::InvalidTimerPeriod,
        ErrorCode::InvalidCallbackIndex,
        ErrorCode::InvalidTickerIndex,
        ErrorCode::MissingDelay,
        ErrorCode::MissingPeriod,
        ErrorCode::MissingCount,
        ErrorCode::MissingPayload,
        ErrorCode::MissingOperand,
        ErrorCode::InvalidParameter,
        ErrorCode::UnknownOperation,
        ErrorCode::InvalidScriptLine,
        ErrorCode::EmptyScriptLine,
        ErrorCode::MissingScriptCommand,
        ErrorCode::UnknownScriptOperation,
        ErrorCode::InvalidConditionSyntax,
        ErrorCode::InvalidConditionOperator,
        ErrorCode::MissingConditionDestination,
        ErrorCode::Unavailable,
    ];

    /// Stable identifier shown by `-error`.
    pub fn name(self) -> &'static str {
        use ErrorCode::*;
        match self {
            UnknownCommand => "ERR_UNKNOWN_COMMAND",
            BufferOverflow => "ERR_BUFFER_OF",
            PayloadQueueOverflow => "ERR_PAYLOAD_QUEUE_OF",
            OutputQueueOverflow => "ERR_OUTMSG_QUEUE_OF",
            EventQueueOverflow => "ERR_EVENT_QUEUE_OF",
            InvalidOperand => "ERR_INVALID_OPERAND",
            InvalidRegisterIndex => "ERR_INVALID_REGISTER",
            DivisionByZero => "ERR_DIVISION_BY_ZERO",
            InvalidMemoryAddress => "ERR_ADDR_OUT_OF_RANGE",
            GpioOutOfRange => "ERR_GPIO_OUT_OF_RANGE",
            InvalidTimerPeriod => "ERR_INVALID_TIMER_PERIOD",
            InvalidCallbackIndex => "ERR_INVALID_CALLBACK_INDEX",
            InvalidTickerIndex => "ERR_INVALID_TICKER_INDEX",
            MissingDelay => "ERR_MISSING_DELAY_PARAMETER",
            MissingPeriod => "ERR_MISSING_PERIOD_PARAMETER",
            MissingCount => "ERR_MISSING_COUNT_PARAMETER",
            MissingPayload => "ERR_MISSING_PAYLOAD",
            MissingOperand => "ERR_MISSING_OPERAND",
            InvalidParameter => "ERR_INVALID_PARAMETER",
            UnknownOperation => "ERR_UNKNOWN_OPERATION",
            InvalidScriptLine => "ERR_INVALID_SCRIPT_LINE",
            EmptyScriptLine => "ERR_EMPTY_SCRIPT_LINE",
            MissingScriptCommand => "ERR_MISSING_SCRIPT_COMMAND",
            UnknownScriptOperation => "ERR_UNKNOWN_SCRIPT_OP",
            InvalidConditionSyntax => "ERR_INVALID_CONDITION_SYNTAX",
            InvalidConditionOperator => "ERR_INVALID_CONDITION_OPERATOR",
            MissingConditionDestination => "ERR_MISSING_CONDITION_DEST",
            Unavailable => "ERR_UNAVAILABLE",
        }
    }

    fn text(self) -> &'static str {
        use ErrorCode::*;
        match self {
            UnknownCommand => "Unknown command. Try -help for list of commands.",
            BufferOverflow => "Buffer Overflow.",
            PayloadQueueOverflow => "Payload Queue Overflow.",
            OutputQueueOverflow => "Out Message Queue Overflow.",
            EventQueueOverflow => "Event Queue Overflow.",
            InvalidOperand => "Invalid operand.",
            InvalidRegisterIndex => "Invalid register.",
            DivisionByZero => "Division by zero.",
            InvalidMemoryAddress => "Invalid memory address.",
            GpioOutOfRange => "GPIO out of range.",
            InvalidTimerPeriod => "Timer period out of range.",
            InvalidCallbackIndex => "Invalid callback index.",
            InvalidTickerIndex => "Invalid ticker index.",
            MissingDelay => "Missing initial delay parameter.",
            MissingPeriod => "Missing period parameter.",
            MissingCount => "Missing count parameter.",
            MissingPayload => "Missing payload.",
            MissingOperand => "Missing operand.",
            InvalidParameter => "Invalid numeric parameter.",
            UnknownOperation => "Unknown operation.",
            InvalidScriptLine => "Invalid script line number.",
            EmptyScriptLine => "Script line is empty.",
            MissingScriptCommand => "Missing command to write to script line.",
            UnknownScriptOperation => "Unknown operation for script command.",
            InvalidConditionSyntax => "Invalid syntax for -if command.",
            InvalidConditionOperator => "Invalid condition operator.",
            MissingConditionDestination => "Missing destinations in -if command.",
            Unavailable => "Collaborator unavailable.",
        }
    }
}

/// ## Per-kind error counters
///
/// Every error reported by a dispatch bumps exactly one slot.

#[derive(Debug)]
pub struct ErrorCounters {
    slots: [AtomicU32; ErrorCode::COUNT],
}

impl Default for ErrorCounters {
    fn default() -> Self {
        ErrorCounters {
            slots: std::array::from_fn(|_| AtomicU32::new(0)),
        }
    }
}

impl ErrorCounters {
    pub fn count(&self, code: ErrorCode) {
        self.slots[code as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, code: ErrorCode) -> u32 {
        self.slots[code as usize].load(Ordering::Relaxed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorCode, u32)> + '_ {
        ErrorCode::ALL.iter().map(move |&code| (code, self.get(code)))
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "Error: {}", self.code.text())
        } else {
            write!(f, "Error: {} ({})", self.code.text(), self.message)
        }
    }
}
