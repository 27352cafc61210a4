/// Characters that separate fields of a command line.
const SEPARATORS: &[char] = &[' ', '\t', '\r', '\n'];

/// ## One command line split into a keyword and its arguments
///
/// Fields are pulled lazily so handlers can take either the next
/// whitespace-delimited token or everything that remains.

#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    keyword: String,
    args: Args<'a>,
}

impl<'a> Line<'a> {
    /// Returns `None` for a blank line.
    pub fn new(s: &'a str) -> Option<Line<'a>> {
        let mut args = Args::new(s);
        let keyword = args.next()?.to_ascii_lowercase();
        Some(Line { keyword, args })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn args(&mut self) -> &mut Args<'a> {
        &mut self.args
    }

    pub fn into_args(self) -> Args<'a> {
        self.args
    }
}

impl std::fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.args.peek_rest() {
            Some(rest) => write!(f, "{} {}", self.keyword, rest),
            None => write!(f, "{}", self.keyword),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args<'a> {
    rest: &'a str,
}

impl<'a> Args<'a> {
    pub fn new(s: &'a str) -> Args<'a> {
        Args { rest: s }
    }

    /// Next whitespace-delimited field.
    pub fn next(&mut self) -> Option<&'a str> {
        let s = self.rest.trim_start_matches(SEPARATORS);
        if s.is_empty() {
            self.rest = s;
            return None;
        }
        let end = s.find(SEPARATORS).unwrap_or(s.len());
        let (token, rest) = s.split_at(end);
        self.rest = rest;
        Some(token)
    }

    /// Everything left on the line, trimmed. Consumes the arguments.
    pub fn rest(&mut self) -> Option<&'a str> {
        let rest = self.peek_rest();
        self.rest = "";
        rest
    }

    pub fn peek_rest(&self) -> Option<&'a str> {
        let s = self.rest.trim_matches(SEPARATORS);
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }
}

/// Clip to at most `max` characters without splitting one.
pub fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
