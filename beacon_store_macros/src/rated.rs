use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, GenericArgument, PathArguments, Type};

pub fn derive_rated(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field = match find_ratings_field(&input) {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let score = match score_type(&field.ty) {
        Some(ty) => ty,
        None => {
            return syn::Error::new_spanned(
                &field.ty,
                "Rated derive: the rated field must have type `Ratings<S>`",
            )
            .to_compile_error()
            .into();
        }
    };

    let field_ident = field.ident.clone();

    let expanded = quote! {
        impl #impl_generics beacon_store::Rated for #name #ty_generics #where_clause {
            type Score = #score;

            fn ratings(&self) -> &beacon_store::Ratings<Self::Score> {
                &self.#field_ident
            }

            fn ratings_mut(&mut self) -> &mut beacon_store::Ratings<Self::Score> {
                &mut self.#field_ident
            }
        }
    };

    TokenStream::from(expanded)
}

fn find_ratings_field(input: &DeriveInput) -> syn::Result<&Field> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Rated derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Rated derive only supports structs",
            ))
        }
    };

    if let Some(field) = fields
        .iter()
        .find(|field| field.attrs.iter().any(|attr| attr.path().is_ident("rated")))
    {
        return Ok(field);
    }

    // Default: look for a field named "ratings"
    fields
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "ratings"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Rated derive: no field marked with #[rated] and no field named `ratings`",
            )
        })
}

/// Pulls `S` out of a `Ratings<S>` (or `path::Ratings<S>`) field type.
fn score_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Ratings" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
