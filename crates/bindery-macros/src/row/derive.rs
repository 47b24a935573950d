//! Implementation of `#[derive(TableRow)]`.
//!
//! The schema is built once per type behind a lazy static. Cells are read
//! straight from the fields, so printing a table never goes through JSON.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_header_attr, ColumnAttr, HeaderAttr};

pub fn table_row_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "TableRow can not be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "TableRow can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "TableRow can only be derived for structs",
            ))
        }
    };

    let mut columns = Vec::new();
    let mut cells = Vec::new();

    for field in fields {
        let Some(attr) = parse_header_attr(&field.attrs)? else {
            continue;
        };
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let ty = &field.ty;

        match attr {
            HeaderAttr::Column(column) => {
                let title = &column.title;
                let directive = directive_tokens(&column);
                columns.push(quote! {
                    columns.push(::bindery::table::Column::new::<#ty>(#title, #directive));
                });
                cells.push(quote! {
                    cells.push(#directive.render(&self.#ident));
                });
            }
            HeaderAttr::Flatten => {
                columns.push(quote! {
                    columns.extend(
                        <#ty as ::bindery::TableRow>::schema().columns().iter().cloned()
                    );
                });
                cells.push(quote! {
                    cells.extend(::bindery::TableRow::cells(&self.#ident));
                });
            }
        }
    }

    Ok(quote! {
        impl ::bindery::TableRow for #name {
            fn schema() -> &'static ::bindery::table::RowSchema {
                static SCHEMA: ::bindery::__private::Lazy<::bindery::table::RowSchema> =
                    ::bindery::__private::Lazy::new(|| {
                        #[allow(unused_mut)]
                        let mut columns = ::std::vec::Vec::new();
                        #(#columns)*
                        ::bindery::table::RowSchema::new(columns)
                    });
                &SCHEMA
            }

            fn cells(&self) -> ::std::vec::Vec<::std::string::String> {
                #[allow(unused_mut)]
                let mut cells = ::std::vec::Vec::new();
                #(#cells)*
                cells
            }
        }

        impl ::bindery::ReturnValue for #name {
            const KIND: ::std::option::Option<::bindery::ReturnKind> =
                ::std::option::Option::Some(::bindery::ReturnKind::Object);

            fn into_returned(self) -> ::std::option::Option<::bindery::Returned> {
                ::std::option::Option::Some(::bindery::Returned::object(self))
            }
        }

        impl ::bindery::IntoReturns for #name {
            fn return_kinds() -> ::std::vec::Vec<::bindery::ReturnKind> {
                ::bindery::__private::value_kinds::<Self>()
            }

            fn into_returns(self) -> ::std::vec::Vec<::bindery::Returned> {
                ::bindery::__private::value_returns(self)
            }
        }
    })
}

fn directive_tokens(column: &ColumnAttr) -> TokenStream {
    let number = column.number;
    let len = column.len;
    let alternative = match &column.alternative {
        Some(alt) => quote! { ::std::option::Option::Some(#alt) },
        None => quote! { ::std::option::Option::None },
    };
    quote! {
        ::bindery::table::Directive {
            number: #number,
            len: #len,
            alternative: #alternative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> Result<String> {
        let input: DeriveInput = syn::parse2(input)?;
        table_row_derive_impl(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn only_tagged_fields_become_columns() {
        let out = expand(quote! {
            struct Topic {
                #[header("Name")]
                name: String,
                internal: bool,
                #[header("Partitions", number)]
                partitions: u32,
            }
        })
        .unwrap();
        assert!(out.contains("\"Name\""));
        assert!(out.contains("\"Partitions\""));
        assert!(out.contains("self . name"));
        assert!(!out.contains("self . internal"));
        assert!(out.contains("impl :: bindery :: IntoReturns for Topic"));
    }

    #[test]
    fn flatten_splices_nested_schema() {
        let out = expand(quote! {
            struct Row {
                #[header(flatten)]
                meta: Meta,
            }
        })
        .unwrap();
        assert!(out.contains("< Meta as :: bindery :: TableRow > :: schema ()"));
    }

    #[test]
    fn rejects_unsupported_inputs() {
        let err = expand(quote! { struct Pair(u32, u32); }).unwrap_err();
        assert!(err.to_string().contains("named fields"));

        let err = expand(quote! { enum State { On, Off } }).unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));

        let err = expand(quote! {
            struct Wrapper<T> {
                #[header("Inner")]
                inner: T,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("generic"));
    }
}
