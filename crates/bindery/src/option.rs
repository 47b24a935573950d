//! Declared options and the live option set.
//!
//! An [`OptionSpec`] declares a named flag with a [`Kind`]. A list of them
//! ([`Options`]) is turned into clap arguments for the command, and after
//! parsing the [`OptionSet`] trait answers the only questions the binder
//! asks: which options exist, which were set, and what they hold.

use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::value::{extract, Value};

/// Integer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

/// Float width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

/// The declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    TextList,
    /// Slice of `i64`.
    IntList,
    /// Slice of `u64`.
    UintList,
    BoolList,
    Ip,
    IpMask,
    IpNet,
}

impl Kind {
    /// Short name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Bool => "bool",
            Kind::Int(IntWidth::W8) => "i8",
            Kind::Int(IntWidth::W16) => "i16",
            Kind::Int(IntWidth::W32) => "i32",
            Kind::Int(IntWidth::W64) => "i64",
            Kind::Uint(IntWidth::W8) => "u8",
            Kind::Uint(IntWidth::W16) => "u16",
            Kind::Uint(IntWidth::W32) => "u32",
            Kind::Uint(IntWidth::W64) => "u64",
            Kind::Float(FloatWidth::W32) => "f32",
            Kind::Float(FloatWidth::W64) => "f64",
            Kind::TextList => "text list",
            Kind::IntList => "int list",
            Kind::UintList => "uint list",
            Kind::BoolList => "bool list",
            Kind::Ip => "ip",
            Kind::IpMask => "ip mask",
            Kind::IpNet => "ip net",
        }
    }

    /// Returns true for the slice kinds.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Kind::TextList | Kind::IntList | Kind::UintList | Kind::BoolList
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An IPv4 network mask such as `255.255.255.0` (or `ffffff00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpMask(pub Ipv4Addr);

impl IpMask {
    /// Number of leading one bits, if the mask is contiguous.
    pub fn prefix_len(&self) -> Option<u8> {
        let bits = u32::from(self.0);
        let ones = bits.leading_ones();
        if bits.checked_shl(ones).unwrap_or(0) == 0 {
            Some(ones as u8)
        } else {
            None
        }
    }
}

impl FromStr for IpMask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(addr) = s.parse::<Ipv4Addr>() {
            return Ok(IpMask(addr));
        }
        if s.len() == 8 {
            if let Ok(bits) = u32::from_str_radix(s, 16) {
                return Ok(IpMask(Ipv4Addr::from(bits)));
            }
        }
        Err(format!("invalid IP mask: {}", s))
    }
}

impl fmt::Display for IpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An IP network in CIDR form. The address is masked to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    addr: IpAddr,
    prefix: u8,
}

impl IpNet {
    /// Builds a network, masking host bits off `addr`.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, String> {
        let addr = match addr {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return Err(format!("invalid prefix length {} for {}", prefix, v4));
                }
                let mask = u32::MAX.checked_shl(32 - prefix as u32).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return Err(format!("invalid prefix length {} for {}", prefix, v6));
                }
                let mask = u128::MAX.checked_shl(128 - prefix as u32).unwrap_or(0);
                IpAddr::V6((u128::from(v6) & mask).into())
            }
        };
        Ok(Self { addr, prefix })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Returns true if `ip` lies inside this network.
    pub fn contains(&self, ip: IpAddr) -> bool {
        IpNet::new(ip, self.prefix)
            .map(|net| net.addr == self.addr)
            .unwrap_or(false)
    }
}

impl FromStr for IpNet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| format!("invalid CIDR address: {}", s))?;
        let addr = addr
            .parse::<IpAddr>()
            .map_err(|_| format!("invalid CIDR address: {}", s))?;
        let prefix = prefix
            .parse::<u8>()
            .map_err(|_| format!("invalid CIDR address: {}", s))?;
        IpNet::new(addr, prefix)
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

/// A declared option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    name: String,
    kind: Kind,
    help: Option<String>,
    short: Option<char>,
    default: Option<String>,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            help: None,
            short: None,
            default: None,
        }
    }

    /// Declares an option whose kind is taken from a Rust type.
    ///
    /// ```rust
    /// use bindery::{Kind, IntWidth, OptionSpec};
    ///
    /// let limit = OptionSpec::of::<u32>("limit");
    /// assert_eq!(limit.kind(), Kind::Uint(IntWidth::W32));
    /// ```
    pub fn of<T: OptionType>(name: impl Into<String>) -> Self {
        Self::new(name, T::KIND)
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Default value. A defaulted option that the user did not pass is
    /// still "unset" for binding purposes.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Builds the clap argument, with a value parser matching the kind.
    pub fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name.clone()).long(self.name.clone());
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }

        arg = match self.kind {
            Kind::Text => arg.value_parser(value_parser!(String)),
            Kind::Bool => arg
                .value_parser(value_parser!(bool))
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true"),
            Kind::Int(IntWidth::W8) => arg.value_parser(value_parser!(i8)),
            Kind::Int(IntWidth::W16) => arg.value_parser(value_parser!(i16)),
            Kind::Int(IntWidth::W32) => arg.value_parser(value_parser!(i32)),
            Kind::Int(IntWidth::W64) => arg.value_parser(value_parser!(i64)),
            Kind::Uint(IntWidth::W8) => arg.value_parser(value_parser!(u8)),
            Kind::Uint(IntWidth::W16) => arg.value_parser(value_parser!(u16)),
            Kind::Uint(IntWidth::W32) => arg.value_parser(value_parser!(u32)),
            Kind::Uint(IntWidth::W64) => arg.value_parser(value_parser!(u64)),
            Kind::Float(FloatWidth::W32) => arg.value_parser(value_parser!(f32)),
            Kind::Float(FloatWidth::W64) => arg.value_parser(value_parser!(f64)),
            Kind::TextList => arg.value_parser(value_parser!(String)),
            Kind::IntList => arg.value_parser(value_parser!(i64)),
            Kind::UintList => arg.value_parser(value_parser!(u64)),
            Kind::BoolList => arg.value_parser(value_parser!(bool)),
            Kind::Ip => arg.value_parser(value_parser!(IpAddr)),
            Kind::IpMask => arg.value_parser(value_parser!(IpMask)),
            Kind::IpNet => arg.value_parser(value_parser!(IpNet)),
        };

        if matches!(self.kind, Kind::Int(_) | Kind::Float(_) | Kind::IntList) {
            arg = arg.allow_negative_numbers(true);
        }

        arg = if self.kind.is_list() {
            arg.action(ArgAction::Append).value_delimiter(',')
        } else {
            arg.action(ArgAction::Set)
        };

        if let Some(default) = &self.default {
            arg = arg.default_value(default.clone());
        }
        arg
    }
}

/// Rust types that map to an option [`Kind`].
pub trait OptionType {
    const KIND: Kind;
}

/// Declared options of one command, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    specs: Vec<OptionSpec>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option. A later option with an existing name replaces the
    /// earlier one in place, keeping names unique.
    pub fn push(&mut self, spec: OptionSpec) {
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
    }

    pub fn with(mut self, spec: OptionSpec) -> Self {
        self.push(spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.specs.iter()
    }

    pub fn as_slice(&self) -> &[OptionSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Adds every option as an argument of `cmd`.
    pub fn augment(&self, cmd: clap::Command) -> clap::Command {
        self.specs
            .iter()
            .fold(cmd, |cmd, spec| cmd.arg(spec.to_arg()))
    }
}

impl FromIterator<OptionSpec> for Options {
    fn from_iter<I: IntoIterator<Item = OptionSpec>>(iter: I) -> Self {
        let mut options = Options::new();
        for spec in iter {
            options.push(spec);
        }
        options
    }
}

impl<'a> IntoIterator for &'a Options {
    type Item = &'a OptionSpec;
    type IntoIter = std::slice::Iter<'a, OptionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

/// Read access to a command's options after parsing.
pub trait OptionSet {
    /// Declared options in declaration order.
    fn declared(&self) -> &[OptionSpec];

    /// Whether the user supplied the option.
    fn is_set(&self, name: &str) -> bool;

    /// Current value; [`Value::Invalid`] when it cannot be read.
    fn value(&self, name: &str) -> Value;

    fn kind(&self, name: &str) -> Option<Kind> {
        self.declared()
            .iter()
            .find(|spec| spec.name() == name)
            .map(OptionSpec::kind)
    }

    /// Number of declared options that are set.
    fn set_count(&self) -> usize {
        self.declared()
            .iter()
            .filter(|spec| self.is_set(spec.name()))
            .count()
    }
}

/// [`OptionSet`] over clap matches.
///
/// An option counts as set when its value came from the command line or
/// the environment, not from a default.
#[derive(Debug, Clone, Copy)]
pub struct LiveOptions<'a> {
    options: &'a Options,
    matches: &'a ArgMatches,
}

impl<'a> LiveOptions<'a> {
    /// `matches` must come from a command augmented with `options`.
    pub fn new(options: &'a Options, matches: &'a ArgMatches) -> Self {
        Self { options, matches }
    }

    pub fn matches(&self) -> &'a ArgMatches {
        self.matches
    }
}

impl OptionSet for LiveOptions<'_> {
    fn declared(&self) -> &[OptionSpec] {
        self.options.as_slice()
    }

    fn is_set(&self, name: &str) -> bool {
        if self.options.get(name).is_none() {
            return false;
        }
        matches!(
            self.matches.value_source(name),
            Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
        )
    }

    fn value(&self, name: &str) -> Value {
        match self.options.get(name) {
            Some(spec) => extract(spec.kind(), self.matches, name),
            None => Value::Invalid,
        }
    }
}
