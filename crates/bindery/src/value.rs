//! Typed option values.

use clap::ArgMatches;
use std::net::IpAddr;

use crate::option::{FloatWidth, IntWidth, IpMask, IpNet, Kind};

/// The live value of an option, typed exactly as declared.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    TextList(Vec<String>),
    IntList(Vec<i64>),
    UintList(Vec<u64>),
    BoolList(Vec<bool>),
    Ip(IpAddr),
    IpMask(IpMask),
    IpNet(IpNet),
    /// The parser holds nothing readable as the declared kind.
    Invalid,
}

impl Value {
    /// The kind this value belongs to, `None` for [`Value::Invalid`].
    pub fn kind(&self) -> Option<Kind> {
        let kind = match self {
            Value::Text(_) => Kind::Text,
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::Int(IntWidth::W8),
            Value::I16(_) => Kind::Int(IntWidth::W16),
            Value::I32(_) => Kind::Int(IntWidth::W32),
            Value::I64(_) => Kind::Int(IntWidth::W64),
            Value::U8(_) => Kind::Uint(IntWidth::W8),
            Value::U16(_) => Kind::Uint(IntWidth::W16),
            Value::U32(_) => Kind::Uint(IntWidth::W32),
            Value::U64(_) => Kind::Uint(IntWidth::W64),
            Value::F32(_) => Kind::Float(FloatWidth::W32),
            Value::F64(_) => Kind::Float(FloatWidth::W64),
            Value::TextList(_) => Kind::TextList,
            Value::IntList(_) => Kind::IntList,
            Value::UintList(_) => Kind::UintList,
            Value::BoolList(_) => Kind::BoolList,
            Value::Ip(_) => Kind::Ip,
            Value::IpMask(_) => Kind::IpMask,
            Value::IpNet(_) => Kind::IpNet,
            Value::Invalid => return None,
        };
        Some(kind)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid)
    }
}

fn one<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> Option<T> {
    matches.try_get_one::<T>(name).ok().flatten().cloned()
}

fn many<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> Option<Vec<T>> {
    matches
        .try_get_many::<T>(name)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
}

/// Reads option `name` from `matches` as `kind`.
///
/// Returns [`Value::Invalid`] when the argument is unknown, absent, or was
/// stored with a different type than `kind` implies.
pub fn extract(kind: Kind, matches: &ArgMatches, name: &str) -> Value {
    let value = match kind {
        Kind::Text => one::<String>(matches, name).map(Value::Text),
        Kind::Bool => one::<bool>(matches, name).map(Value::Bool),
        Kind::Int(IntWidth::W8) => one::<i8>(matches, name).map(Value::I8),
        Kind::Int(IntWidth::W16) => one::<i16>(matches, name).map(Value::I16),
        Kind::Int(IntWidth::W32) => one::<i32>(matches, name).map(Value::I32),
        Kind::Int(IntWidth::W64) => one::<i64>(matches, name).map(Value::I64),
        Kind::Uint(IntWidth::W8) => one::<u8>(matches, name).map(Value::U8),
        Kind::Uint(IntWidth::W16) => one::<u16>(matches, name).map(Value::U16),
        Kind::Uint(IntWidth::W32) => one::<u32>(matches, name).map(Value::U32),
        Kind::Uint(IntWidth::W64) => one::<u64>(matches, name).map(Value::U64),
        Kind::Float(FloatWidth::W32) => one::<f32>(matches, name).map(Value::F32),
        Kind::Float(FloatWidth::W64) => one::<f64>(matches, name).map(Value::F64),
        Kind::TextList => many::<String>(matches, name).map(Value::TextList),
        Kind::IntList => many::<i64>(matches, name).map(Value::IntList),
        Kind::UintList => many::<u64>(matches, name).map(Value::UintList),
        Kind::BoolList => many::<bool>(matches, name).map(Value::BoolList),
        Kind::Ip => one::<IpAddr>(matches, name).map(Value::Ip),
        Kind::IpMask => one::<IpMask>(matches, name).map(Value::IpMask),
        Kind::IpNet => one::<IpNet>(matches, name).map(Value::IpNet),
    };
    value.unwrap_or(Value::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{OptionSpec, Options};

    fn matches(options: &Options, argv: &[&str]) -> ArgMatches {
        options
            .augment(clap::Command::new("test"))
            .try_get_matches_from(argv)
            .unwrap()
    }

    #[test]
    fn extract_matches_declared_width() {
        let opts = Options::new()
            .with(OptionSpec::new("small", Kind::Uint(IntWidth::W8)))
            .with(OptionSpec::new("big", Kind::Int(IntWidth::W64)))
            .with(OptionSpec::new("ratio", Kind::Float(FloatWidth::W32)));
        let m = matches(&opts, &["test", "--small", "7", "--big", "-9", "--ratio", "0.5"]);

        assert_eq!(extract(Kind::Uint(IntWidth::W8), &m, "small"), Value::U8(7));
        assert_eq!(extract(Kind::Int(IntWidth::W64), &m, "big"), Value::I64(-9));
        assert_eq!(extract(Kind::Float(FloatWidth::W32), &m, "ratio"), Value::F32(0.5));
    }

    #[test]
    fn extract_with_wrong_kind_is_invalid() {
        let opts = Options::new().with(OptionSpec::new("count", Kind::Uint(IntWidth::W32)));
        let m = matches(&opts, &["test", "--count", "3"]);

        assert_eq!(extract(Kind::Int(IntWidth::W32), &m, "count"), Value::Invalid);
        assert_eq!(extract(Kind::Text, &m, "count"), Value::Invalid);
        assert_eq!(extract(Kind::Text, &m, "unknown"), Value::Invalid);
    }

    #[test]
    fn extract_network_kinds() {
        let opts = Options::new()
            .with(OptionSpec::new("ip", Kind::Ip))
            .with(OptionSpec::new("mask", Kind::IpMask))
            .with(OptionSpec::new("net", Kind::IpNet));
        let m = matches(
            &opts,
            &["test", "--ip", "::1", "--mask", "255.255.0.0", "--net", "192.168.1.0/24"],
        );

        assert_eq!(
            extract(Kind::Ip, &m, "ip"),
            Value::Ip("::1".parse().unwrap())
        );
        assert_eq!(
            extract(Kind::IpMask, &m, "mask").kind(),
            Some(Kind::IpMask)
        );
        assert_eq!(
            extract(Kind::IpNet, &m, "net"),
            Value::IpNet("192.168.1.0/24".parse().unwrap())
        );
    }

    #[test]
    fn value_kind_round_trips_declared_kind() {
        assert_eq!(Value::U32(1).kind(), Some(Kind::Uint(IntWidth::W32)));
        assert_eq!(Value::BoolList(vec![]).kind(), Some(Kind::BoolList));
        assert_eq!(Value::Invalid.kind(), None);
    }
}
