//! Cell formatting.

use std::net::IpAddr;

use crate::option::IpNet;

/// Per-field formatting modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directive {
    /// Render as a grouped number (also parses text fields).
    pub number: bool,
    /// Render a collection as its length.
    pub len: bool,
    /// Shown instead of an empty cell.
    pub alternative: Option<&'static str>,
}

impl Directive {
    pub const PLAIN: Directive = Directive {
        number: false,
        len: false,
        alternative: None,
    };

    /// Formats `value`, falling back to the alternative when the cell is empty.
    pub fn render<F: TableCell + ?Sized>(&self, value: &F) -> String {
        let cell = value.cell(self);
        match self.alternative {
            Some(alt) if cell.is_empty() => alt.to_string(),
            _ => cell,
        }
    }

    fn zero(&self) -> String {
        self.alternative.unwrap_or("0").to_string()
    }
}

/// A field type that can appear in a table cell.
pub trait TableCell {
    /// Numeric columns are right aligned.
    const NUMERIC: bool = false;

    fn cell(&self, directive: &Directive) -> String;
}

/// Formats an integer with `,` thousand separators.
///
/// ```rust
/// use bindery::table::group_thousands;
///
/// assert_eq!(group_thousands(1234567), "1,234,567");
/// assert_eq!(group_thousands(-1000), "-1,000");
/// assert_eq!(group_thousands(999), "999");
/// ```
pub fn group_thousands(n: i128) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

macro_rules! integer_cells {
    ($($ty:ty),*) => {
        $(
            impl TableCell for $ty {
                const NUMERIC: bool = true;

                fn cell(&self, directive: &Directive) -> String {
                    if *self == 0 {
                        directive.zero()
                    } else {
                        group_thousands(*self as i128)
                    }
                }
            }
        )*
    };
}

integer_cells!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_cells {
    ($($ty:ty),*) => {
        $(
            impl TableCell for $ty {
                const NUMERIC: bool = true;

                fn cell(&self, _directive: &Directive) -> String {
                    format!("{:.2}", self)
                }
            }
        )*
    };
}

float_cells!(f32, f64);

impl TableCell for bool {
    fn cell(&self, _directive: &Directive) -> String {
        let text = if *self { "Yes" } else { "No" };
        text.to_string()
    }
}

impl TableCell for str {
    fn cell(&self, directive: &Directive) -> String {
        if directive.number {
            if let Ok(n) = self.trim().parse::<i64>() {
                return n.cell(directive);
            }
        }
        self.to_string()
    }
}

impl TableCell for String {
    fn cell(&self, directive: &Directive) -> String {
        self.as_str().cell(directive)
    }
}

impl<T: TableCell> TableCell for Option<T> {
    const NUMERIC: bool = T::NUMERIC;

    fn cell(&self, directive: &Directive) -> String {
        match self {
            Some(value) => value.cell(directive),
            None => String::new(),
        }
    }
}

impl<T: TableCell> TableCell for Vec<T> {
    fn cell(&self, directive: &Directive) -> String {
        if directive.len {
            return self.len().cell(directive);
        }
        self.iter()
            .map(|item| item.cell(&Directive::PLAIN))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TableCell for IpAddr {
    fn cell(&self, _directive: &Directive) -> String {
        self.to_string()
    }
}

impl TableCell for IpNet {
    fn cell(&self, _directive: &Directive) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALT: Directive = Directive {
        number: false,
        len: false,
        alternative: Some("none"),
    };

    #[test]
    fn booleans_render_yes_no() {
        assert_eq!(Directive::PLAIN.render(&true), "Yes");
        assert_eq!(Directive::PLAIN.render(&false), "No");
    }

    #[test]
    fn integers_group_and_zero_falls_back() {
        assert_eq!(Directive::PLAIN.render(&1_234_567u64), "1,234,567");
        assert_eq!(Directive::PLAIN.render(&0i32), "0");
        assert_eq!(ALT.render(&0i32), "none");
        assert_eq!(Directive::PLAIN.render(&-45_000i64), "-45,000");
    }

    #[test]
    fn floats_use_two_decimals() {
        assert_eq!(Directive::PLAIN.render(&3.14159f64), "3.14");
        assert_eq!(Directive::PLAIN.render(&2f32), "2.00");
    }

    #[test]
    fn text_with_number_directive() {
        let number = Directive {
            number: true,
            ..Directive::PLAIN
        };
        assert_eq!(number.render("12000"), "12,000");
        assert_eq!(number.render("n/a"), "n/a");
        assert_eq!(Directive::PLAIN.render("12000"), "12000");
    }

    #[test]
    fn collections() {
        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(Directive::PLAIN.render(&tags), "a, b");

        let len = Directive {
            len: true,
            ..Directive::PLAIN
        };
        assert_eq!(len.render(&tags), "2");

        let empty: Vec<String> = Vec::new();
        assert_eq!(ALT.render(&empty), "none");
        assert_eq!(Directive::PLAIN.render(&empty), "");
    }

    #[test]
    fn empty_collection_length_is_zero() {
        let empty: Vec<u32> = Vec::new();
        let len = Directive {
            len: true,
            ..Directive::PLAIN
        };
        assert_eq!(len.render(&empty), "0");

        let len_alt = Directive {
            len: true,
            ..ALT
        };
        assert_eq!(len_alt.render(&empty), "none");
    }

    #[test]
    fn empty_cells_use_alternative() {
        assert_eq!(ALT.render(""), "none");
        assert_eq!(ALT.render(&None::<String>), "none");
        assert_eq!(ALT.render(&Some("x".to_string())), "x");
    }

    proptest! {
        #[test]
        fn grouping_round_trips(n in any::<i64>()) {
            let grouped = group_thousands(n as i128);
            prop_assert_eq!(grouped.replace(',', "").parse::<i64>().unwrap(), n);
            for part in grouped.trim_start_matches('-').split(',').skip(1) {
                prop_assert_eq!(part.len(), 3);
            }
        }
    }
}
