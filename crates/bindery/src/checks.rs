//! Pre-run usage checks.

use crate::error::UsageError;
use crate::option::OptionSet;
use crate::value::Value;

/// Checks the positional argument count against `min..=max`.
///
/// A `max` of zero means no upper bound; `min == max` asks for an exact
/// count.
pub fn check_args_range(command: &str, got: usize, min: usize, max: usize) -> Result<(), UsageError> {
    let got_str = if got == 0 {
        "nothing".to_string()
    } else {
        got.to_string()
    };
    let fail = |message: String| Err(UsageError(format!("{} command {}", command, message)));

    if min + max > 0 && min == max && got != min {
        if min == 1 {
            return fail(format!("expected only one argument but got {}", got_str));
        }
        return fail(format!("expected exactly {} arguments but got {}", min, got_str));
    }

    if min > 0 && got < min {
        if max == 0 {
            if min == 1 {
                return fail(format!("expected a single argument but got {}", got_str));
            }
            return fail(format!("expected {} arguments but got {}", min, got_str));
        }
        if min == 1 {
            return fail("expected at least one argument".to_string());
        }
        return fail(format!("expected at least {} arguments but got {}", min, got_str));
    }

    if max > 0 && got > max {
        return fail(format!("can not accept more than {} arguments", max));
    }

    Ok(())
}

/// True when `value` holds nothing a required flag would accept.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Invalid => true,
        Value::Text(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::I8(n) => *n == 0,
        Value::I16(n) => *n == 0,
        Value::I32(n) => *n == 0,
        Value::I64(n) => *n == 0,
        Value::U8(n) => *n == 0,
        Value::U16(n) => *n == 0,
        Value::U32(n) => *n == 0,
        Value::U64(n) => *n == 0,
        Value::F32(n) => *n == 0.0,
        Value::F64(n) => *n == 0.0,
        Value::TextList(v) => v.is_empty(),
        Value::IntList(v) => v.is_empty(),
        Value::UintList(v) => v.is_empty(),
        Value::BoolList(v) => v.is_empty(),
        Value::Ip(_) | Value::IpMask(_) | Value::IpNet(_) => false,
    }
}

/// Checks that every flag in `required` holds a non-empty value.
///
/// Flags are reported in the order given. When all of them are missing
/// and the command has an example, the example is appended.
pub fn check_required_flags(
    options: &dyn OptionSet,
    required: &[String],
    example: Option<&str>,
) -> Result<(), UsageError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| is_blank(&options.value(name)))
        .map(|name| format!("{:?}", name))
        .collect();

    let mut message = match missing.as_slice() {
        [] => return Ok(()),
        [one] => format!("required flag {} not set", one),
        [init @ .., last] => format!("required flags {} and {} not set", init.join(", "), last),
    };

    if missing.len() == required.len() {
        if let Some(example) = example.filter(|e| !e.is_empty()) {
            message.push_str(&format!("\nexample:\n\t{}", example));
        }
    }
    Err(UsageError(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{IntWidth, Kind, LiveOptions, OptionSpec, Options};

    fn err(result: Result<(), UsageError>) -> String {
        result.unwrap_err().0
    }

    #[test]
    fn exact_counts() {
        assert_eq!(
            err(check_args_range("get", 0, 1, 1)),
            "get command expected only one argument but got nothing"
        );
        assert_eq!(
            err(check_args_range("get", 3, 2, 2)),
            "get command expected exactly 2 arguments but got 3"
        );
        assert!(check_args_range("get", 2, 2, 2).is_ok());
    }

    #[test]
    fn minimum_without_maximum() {
        assert_eq!(
            err(check_args_range("add", 0, 1, 0)),
            "add command expected a single argument but got nothing"
        );
        assert_eq!(
            err(check_args_range("add", 1, 3, 0)),
            "add command expected 3 arguments but got 1"
        );
        assert!(check_args_range("add", 9, 1, 0).is_ok());
    }

    #[test]
    fn minimum_with_maximum() {
        assert_eq!(
            err(check_args_range("mv", 0, 1, 3)),
            "mv command expected at least one argument"
        );
        assert_eq!(
            err(check_args_range("mv", 1, 2, 3)),
            "mv command expected at least 2 arguments but got 1"
        );
        assert_eq!(
            err(check_args_range("mv", 4, 2, 3)),
            "mv command can not accept more than 3 arguments"
        );
        assert!(check_args_range("mv", 0, 0, 0).is_ok());
    }

    fn options() -> Options {
        Options::new()
            .with(OptionSpec::new("a", Kind::Text))
            .with(OptionSpec::new("b", Kind::Int(IntWidth::W32)))
            .with(OptionSpec::new("c", Kind::TextList))
    }

    fn check(argv: &[&str], example: Option<&str>) -> Result<(), UsageError> {
        let opts = options();
        let matches = opts
            .augment(clap::Command::new("test"))
            .try_get_matches_from(argv)
            .unwrap();
        let required = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        check_required_flags(&LiveOptions::new(&opts, &matches), &required, example)
    }

    #[test]
    fn required_flags_messages() {
        assert!(check(&["test", "--a", "x", "--b", "1", "--c", "y"], None).is_ok());
        assert_eq!(
            err(check(&["test", "--a", "x", "--b", "1"], Some("test --c y"))),
            "required flag \"c\" not set"
        );
        assert_eq!(
            err(check(&["test", "--b", "1"], None)),
            "required flags \"a\" and \"c\" not set"
        );
    }

    #[test]
    fn all_missing_appends_example() {
        assert_eq!(
            err(check(&["test"], Some("test --a x --b 1 --c y"))),
            "required flags \"a\", \"b\" and \"c\" not set\nexample:\n\ttest --a x --b 1 --c y"
        );
        assert_eq!(
            err(check(&["test"], None)),
            "required flags \"a\", \"b\" and \"c\" not set"
        );
    }
}
