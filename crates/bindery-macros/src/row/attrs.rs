//! Parsing of `#[header(...)]` field attributes.

use syn::{
    parse::{Parse, ParseStream},
    Attribute, Error, Ident, LitStr, Result, Token,
};

/// What a field contributes to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAttr {
    /// A single column.
    Column(ColumnAttr),
    /// The columns of a nested row.
    Flatten,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAttr {
    pub title: String,
    pub number: bool,
    pub len: bool,
    pub alternative: Option<String>,
}

impl Parse for HeaderAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Ident) {
            let ident: Ident = input.parse()?;
            if ident == "flatten" && input.is_empty() {
                return Ok(HeaderAttr::Flatten);
            }
            return Err(Error::new(
                ident.span(),
                "expected a column title: #[header(\"Title\", ...)] or #[header(flatten)]",
            ));
        }

        let title: LitStr = input.parse()?;
        let mut column = ColumnAttr {
            title: title.value(),
            number: false,
            len: false,
            alternative: None,
        };

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let option: Ident = input.parse()?;
            match option.to_string().as_str() {
                "number" => column.number = true,
                "len" => column.len = true,
                "alt" => {
                    input.parse::<Token![=]>()?;
                    let alt: LitStr = input.parse()?;
                    column.alternative = Some(alt.value());
                }
                other => {
                    return Err(Error::new(
                        option.span(),
                        format!(
                            "unknown header option: '{}'. Expected one of: number, len, alt = \"...\"",
                            other
                        ),
                    ))
                }
            }
        }

        Ok(HeaderAttr::Column(column))
    }
}

/// The field's `#[header(...)]`, if it has one.
pub fn parse_header_attr(attrs: &[Attribute]) -> Result<Option<HeaderAttr>> {
    let mut found = None;
    for attr in attrs {
        if !attr.path().is_ident("header") {
            continue;
        }
        if found.is_some() {
            return Err(Error::new_spanned(attr, "duplicate #[header] attribute"));
        }
        found = Some(attr.parse_args::<HeaderAttr>()?);
    }
    Ok(found)
}
