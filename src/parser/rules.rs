use crate::helpers::split_port_suffix;
use crate::types::Component;

/// Which side of a delimiter a rule keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The field is everything before the delimiter, which is dropped;
    /// parsing continues after it
    Front,
    /// The field is the delimiter and everything after it;
    /// parsing continues with what came before
    Back,
}

/// How a rule finds its field in the remaining address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Split at the first occurrence of the byte
    Delimiter(u8, Side),
    /// Trailing `:digits`, stored without the colon
    PortSuffix,
    /// Everything that is left, which stays available to later rules
    Remainder,
    /// Everything that is left, consumed
    CatchAll,
}

/// One step of address extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub matcher: Matcher,
    pub field: Component,
    /// A relative address that doesn't provide this field takes it from its base
    pub inheritable: bool,
    pub lowercase: bool,
}

impl Rule {
    const fn new(matcher: Matcher, field: Component) -> Self {
        Self {
            matcher,
            field,
            inheritable: false,
            lowercase: false,
        }
    }

    const fn inheritable(mut self) -> Self {
        self.inheritable = true;
        self
    }

    const fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Run the rule against `rest`, shrinking it by whatever was taken
    pub fn extract<'a>(&self, rest: &mut &'a str) -> Option<&'a str> {
        let current: &'a str = *rest;
        match self.matcher {
            Matcher::Delimiter(byte, side) => {
                let index = memchr::memchr(byte, current.as_bytes())?;
                let (before, after) = current.split_at(index);
                match side {
                    Side::Front => {
                        *rest = &after[1..];
                        Some(before)
                    }
                    Side::Back => {
                        *rest = before;
                        Some(after)
                    }
                }
            }
            Matcher::PortSuffix => {
                let (hostname, port) = split_port_suffix(current)?;
                *rest = hostname;
                Some(port)
            }
            Matcher::Remainder => Some(current),
            Matcher::CatchAll => {
                *rest = "";
                Some(current)
            }
        }
    }
}

/// Extraction order. Hash, search and pathname are cut off the back before
/// auth is looked for, so an `@` in a path is never read as credentials.
const RULES: [Rule; 7] = [
    Rule::new(Matcher::Delimiter(b'#', Side::Back), Component::Hash),
    Rule::new(Matcher::Delimiter(b'?', Side::Back), Component::Search),
    Rule::new(Matcher::Delimiter(b'/', Side::Back), Component::Pathname),
    Rule::new(Matcher::Delimiter(b'@', Side::Front), Component::Auth),
    Rule::new(Matcher::Remainder, Component::Host)
        .inheritable()
        .lowercase(),
    Rule::new(Matcher::PortSuffix, Component::Port).inheritable(),
    Rule::new(Matcher::Remainder, Component::Hostname)
        .inheritable()
        .lowercase(),
];

const PATHNAME_RULE: usize = 2;

/// The rule table for an address with or without `//` after the scheme.
/// Without slashes there is no authority, so the pathname takes everything.
pub fn rules(slashes: bool) -> [Rule; 7] {
    let mut rules = RULES;
    if !slashes {
        rules[PATHNAME_RULE] = Rule::new(Matcher::CatchAll, Component::Pathname);
    }
    rules
}
