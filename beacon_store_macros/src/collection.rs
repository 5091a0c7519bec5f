use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr};

pub fn derive_collection(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Extract #[collection(key = "...", state_field = "...")] from struct-level attributes
    let attrs = match extract_attrs(&input) {
        Ok(attrs) => attrs,
        Err(err) => return err.to_compile_error().into(),
    };
    let key = attrs.key;

    let state_field = attrs.state_field.map(|field| {
        quote! {
            const STATE_FIELD: ::core::option::Option<&'static str> =
                ::core::option::Option::Some(#field);
        }
    });

    let expanded = quote! {
        impl #impl_generics beacon_store::Collection for #name #ty_generics #where_clause {
            const STORAGE_KEY: &'static str = #key;
            #state_field
        }
    };

    TokenStream::from(expanded)
}

struct CollectionAttrs {
    key: String,
    state_field: Option<String>,
}

fn extract_attrs(input: &DeriveInput) -> syn::Result<CollectionAttrs> {
    let mut key = None;
    let mut state_field = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("collection") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(meta.error("collection key must not be empty"));
                }
                key = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("state_field") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(meta.error("state_field must not be empty"));
                }
                state_field = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported collection attribute, expected `key` or `state_field`"))
            }
        })?;
    }

    // Default: snake_case struct name + "s"
    let key = key.unwrap_or_else(|| format!("{}s", to_snake_case(&input.ident.to_string())));
    Ok(CollectionAttrs { key, state_field })
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
