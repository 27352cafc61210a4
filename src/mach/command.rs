use super::board::Memory;
use super::callback::CALLBACK_COUNT;
use super::operation::Operation;
use super::script::Script;
use super::ticker::TICKER_COUNT;
use super::Runtime;
use crate::error;
use crate::lang::{is_valid_address, Args, Condition, Error, ErrorCode, Line, Operand};
use std::collections::HashMap;
use std::str::FromStr;

type Result<T> = std::result::Result<T, Error>;

pub type Handler = Box<dyn Fn(&Runtime, &mut Args<'_>) -> Result<()> + Send + Sync>;

struct Entry {
    usage: &'static str,
    handler: Handler,
}

/// ## Keyword to handler mapping
///
/// Keywords are stored lowercase with their leading dash. Replacing an
/// entry is how external collaborators such as the audio pipeline plug in.

pub struct CommandTable {
    entries: HashMap<String, Entry>,
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keywords()).finish()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        let mut table = CommandTable::empty();
        table.register("-about", "-about", about);
        table.register("-callback", "-callback [idx [count payload]]", callback);
        table.register("-error", "-error", error_counts);
        table.register("-gpio", "-gpio [pin [r|w state|t]]", gpio);
        table.register("-help", "-help [command]", help);
        table.register("-if", "-if (A OP B) ? DESTT : DESTF", condition);
        table.register("-memr", "-memr [hexaddr]", memr);
        table.register("-print", "-print text", print);
        table.register("-reg", "-reg [op dest [src]]", reg);
        table.register("-rem", "-rem comment", |_, _| Ok(()));
        table.register("-script", "-script [n|r] [w cmd|x|c]", script);
        table.register("-ticker", "-ticker [idx|c|p|r] [delay period count payload]", ticker);
        table.register("-timer", "-timer [us]", timer);
        table.register("-uart", "-uart text", uart);
        table.register("-audio", "-audio", |_, _| Err(error!(Unavailable; "audio")));
        table.register("-sine", "-sine [freq]", |_, _| Err(error!(Unavailable; "sine")));
        table.register("-stream", "-stream", |_, _| Err(error!(Unavailable; "stream")));
        table
    }
}

impl CommandTable {
    pub fn empty() -> CommandTable {
        CommandTable {
            entries: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, keyword: &str, usage: &'static str, handler: F)
    where
        F: Fn(&Runtime, &mut Args<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.entries.insert(
            keyword.to_ascii_lowercase(),
            Entry {
                usage,
                handler: Box::new(handler),
            },
        );
    }

    pub fn dispatch(&self, runtime: &Runtime, line: Line<'_>) -> Result<()> {
        match self.entries.get(line.keyword()) {
            Some(entry) => (entry.handler)(runtime, &mut line.into_args()),
            None => Err(error!(UnknownCommand)),
        }
    }

    /// Accepts the keyword with or without its dash.
    pub fn usage(&self, keyword: &str) -> Option<&'static str> {
        let keyword = keyword.to_ascii_lowercase();
        self.entries
            .get(&keyword)
            .or_else(|| self.entries.get(&format!("-{}", keyword)))
            .map(|entry| entry.usage)
    }

    pub fn keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keywords.sort_unstable();
        keywords
    }
}

fn number<T: FromStr>(token: &str) -> Result<T> {
    token.parse::<T>().map_err(|_| error!(InvalidParameter))
}

fn index(token: &str, count: usize, code: ErrorCode) -> Result<usize> {
    match token.parse::<usize>() {
        Ok(index) if index < count => Ok(index),
        _ => Err(Error::new(code)),
    }
}

fn about(runtime: &Runtime, _args: &mut Args) -> Result<()> {
    let uptime = chrono::Local::now() - runtime.started();
    runtime.print(format!(
        "{} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    runtime.print(format!(
        "Started: {}",
        runtime.started().format("%Y-%m-%d %H:%M:%S")
    ));
    runtime.print(format!("Uptime: {} s", uptime.num_seconds()));
    Ok(())
}

fn callback(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let index = match args.next() {
        Some(token) => index(token, CALLBACK_COUNT, ErrorCode::InvalidCallbackIndex)?,
        None => {
            let lines: Vec<String> = runtime
                .callbacks()
                .iter()
                .enumerate()
                .map(|(i, cb)| format!("Callback {}: count {}, payload: {}", i, cb.count, cb.payload))
                .collect();
            runtime.print("Callback Configurations:");
            lines.into_iter().for_each(|line| runtime.print(line));
            return Ok(());
        }
    };
    let count = match args.next() {
        Some(token) => number::<i32>(token)?,
        None => {
            runtime.callbacks().clear(index)?;
            runtime.print("Clearing callback.");
            return Ok(());
        }
    };
    let payload = args.rest().ok_or_else(|| error!(MissingPayload))?;
    runtime.callbacks().configure(index, count, payload)?;
    runtime.print(format!(
        "Callback {} set with count {} and payload: {}",
        index, count, payload
    ));
    Ok(())
}

fn condition(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let text = args.rest().ok_or_else(|| error!(InvalidConditionSyntax))?;
    let condition = Condition::parse(text)?;
    let outcome = {
        let regs = runtime.registers();
        let a = regs.read(condition.left, runtime.board())?;
        let b = regs.read(condition.right, runtime.board())?;
        condition.comparison.holds(a, b)
    };
    match condition.branch(outcome) {
        Some(branch) => runtime.dispatch(branch),
        None => Ok(()),
    }
}

fn error_counts(runtime: &Runtime, _args: &mut Args) -> Result<()> {
    runtime.print("Error Count:");
    for (code, count) in runtime.errors().iter() {
        runtime.print(format!("|  {}: {}", code.name(), count));
    }
    Ok(())
}

fn gpio(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let board = runtime.board();
    let pin = match args.next() {
        Some(token) => index(token, board.pin_count(), ErrorCode::GpioOutOfRange)?,
        None => {
            for pin in 0..board.pin_count() {
                let state = board.read_pin(pin) as u8;
                runtime.print(format!("Read => Pin: {}  State: {}", pin, state));
            }
            return Ok(());
        }
    };
    let action = args.next().map(str::to_ascii_lowercase);
    match action.as_deref() {
        None | Some("r") => {
            let state = board.read_pin(pin) as u8;
            runtime.print(format!("Read => Pin: {}  State: {}", pin, state));
        }
        Some("w") => {
            let state = match args.next() {
                Some("0") => false,
                Some("1") => true,
                _ => return Err(error!(InvalidParameter; "state must be 0 or 1")),
            };
            board.write_pin(pin, state);
            runtime.print(format!("Wrote => Pin: {}  State: {}", pin, state as u8));
        }
        Some("t") => {
            let state = board.toggle_pin(pin) as u8;
            runtime.print(format!("Toggled => Pin: {} State: {}", pin, state));
        }
        Some(_) => return Err(error!(InvalidParameter; "expected r, w or t")),
    }
    Ok(())
}

fn help(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let commands = runtime.commands();
    match args.next() {
        Some(keyword) => match commands.usage(keyword) {
            Some(usage) => runtime.print(usage),
            None => return Err(error!(UnknownCommand)),
        },
        None => {
            for keyword in commands.keywords() {
                if let Some(usage) = commands.usage(keyword) {
                    runtime.print(usage);
                }
            }
        }
    }
    Ok(())
}

fn memr(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let address = match args.next() {
        Some(token) => {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u32::from_str_radix(digits, 16).map_err(|_| error!(InvalidParameter))?
        }
        None => 0,
    };
    let row = address & !0xF;
    if !is_valid_address(row) || !is_valid_address(address) {
        return Err(error!(InvalidMemoryAddress));
    }
    let board = runtime.board();
    runtime.print("MEMR");
    runtime.print(format!(
        "{:#010x} {:#010x} {:#010x} {:#010x}",
        row + 0xC,
        row + 0x8,
        row + 0x4,
        row
    ));
    runtime.print(format!(
        "{:#010x} {:#010x} {:#010x} {:#010x}",
        board.read_word(row + 0xC),
        board.read_word(row + 0x8),
        board.read_word(row + 0x4),
        board.read_word(row)
    ));
    runtime.print(format!("{:#04x}", board.read_byte(address)));
    Ok(())
}

fn print(runtime: &Runtime, args: &mut Args) -> Result<()> {
    if let Some(text) = args.rest() {
        runtime.print(text);
    }
    Ok(())
}

fn reg(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let operation = match args.next() {
        Some(token) => token.parse::<Operation>()?,
        None => {
            let lines: Vec<String> = {
                let regs = runtime.registers();
                let cells: Vec<String> = regs
                    .iter()
                    .map(|(r, value)| format!("R{:<2} = {:<11}", r, value))
                    .collect();
                cells.chunks(4).map(|row| row.join(" ").trim_end().to_string()).collect()
            };
            lines.into_iter().for_each(|line| runtime.print(line));
            return Ok(());
        }
    };
    let dest = Operand::parse(args.next().ok_or_else(|| error!(MissingOperand))?)?;
    let src = if operation.is_unary() {
        None
    } else {
        let token = args.next().ok_or_else(|| error!(MissingOperand))?;
        Some(Operand::parse(token)?)
    };
    let text = {
        let mut regs = runtime.registers();
        operation.execute(&mut regs, runtime.board(), dest, src)?
    };
    runtime.print(text);
    Ok(())
}

fn script(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let first = match args.next() {
        Some(token) => token,
        None => {
            let lines: Vec<String> = runtime
                .script()
                .lines()
                .map(|(n, text)| format!("| {:<4} | {}", n, text))
                .collect();
            runtime.print("Script Lines:");
            lines.into_iter().for_each(|line| runtime.print(line));
            return Ok(());
        }
    };
    if first.eq_ignore_ascii_case("r") {
        runtime.script().reset();
        runtime.print("Script reset.");
        return Ok(());
    }
    let n = Script::line_number(first)?;
    let operation = match args.next() {
        Some(token) => token.to_ascii_lowercase(),
        None => {
            let text = runtime.script().read_line(n)?.to_string();
            let text = if text.is_empty() { "Empty" } else { text.as_str() };
            runtime.print(format!("| {:<4} | {}", n, text));
            return Ok(());
        }
    };
    match operation.as_str() {
        "w" => {
            let command = args.rest().ok_or_else(|| error!(MissingScriptCommand))?;
            let text = runtime.script().write_line(n, command)?.to_string();
            runtime.print(format!("Script line {} set to: {}", n, text));
        }
        "x" => runtime.start_script(n)?,
        "c" => {
            runtime.script().clear_line(n)?;
            runtime.print(format!("Script line {} cleared.", n));
        }
        _ => return Err(error!(UnknownScriptOperation)),
    }
    Ok(())
}

fn ticker(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let token = match args.next() {
        Some(token) => token,
        None => {
            let lines: Vec<String> = runtime
                .tickers()
                .iter()
                .enumerate()
                .map(|(i, ticker)| format!("Ticker {}: {}", i, ticker))
                .collect();
            lines.into_iter().for_each(|line| runtime.print(line));
            return Ok(());
        }
    };
    match token.to_ascii_lowercase().as_str() {
        "c" => {
            runtime.tickers().clear_all();
            runtime.print("All tickers cleared.");
            return Ok(());
        }
        "p" => {
            runtime.tickers().pause_all();
            runtime.print("All tickers paused.");
            return Ok(());
        }
        "r" => {
            runtime.tickers().resume_all();
            runtime.print("All tickers resumed.");
            return Ok(());
        }
        _ => {}
    }
    let index = index(token, TICKER_COUNT, ErrorCode::InvalidTickerIndex)?;
    let delay = number::<u32>(args.next().ok_or_else(|| error!(MissingDelay))?)?;
    let period = number::<u32>(args.next().ok_or_else(|| error!(MissingPeriod))?)?;
    let count = number::<i32>(args.next().ok_or_else(|| error!(MissingCount))?)?;
    let payload = args.rest().ok_or_else(|| error!(MissingPayload))?;
    runtime
        .tickers()
        .configure(index, delay, period, count, payload)?;
    runtime.print(format!(
        "Ticker {} set with delay {}, period {}, count {}, payload: {}",
        index, delay, period, count, payload
    ));
    Ok(())
}

fn timer(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let period = match args.next() {
        Some(token) => number::<u32>(token)?,
        None => {
            let period = runtime.timer().period();
            runtime.print(format!("Current Timer0 period is {} us", period));
            return Ok(());
        }
    };
    runtime.timer().set_period(period)?;
    if period == 0 {
        runtime.print("Timer0 stopped");
    } else {
        runtime.print(format!("Set Timer0 period to {} us", period));
    }
    Ok(())
}

fn uart(runtime: &Runtime, args: &mut Args) -> Result<()> {
    let text = args.rest().ok_or_else(|| error!(MissingPayload))?;
    runtime.board().uart_write(text);
    runtime.print("Payload sent over UART 1.");
    Ok(())
}
