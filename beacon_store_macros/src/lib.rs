mod collection;
mod rated;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Collection)] derive macro
// ============================================================================

/// Derive macro for the `Collection` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Collection)]
/// #[collection(key = "consejos-storage")]
/// struct SafetyTip {
///     pub category: String,
///     pub title: String,
/// }
/// ```
///
/// - `#[collection(key = "...")]` sets the blob key the store persists under.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[collection(state_field = "...")]` stores the records inside a
///   `{"state": {"<field>": [...]}, "version": 0}` envelope.
#[proc_macro_derive(Collection, attributes(collection))]
pub fn derive_collection(input: TokenStream) -> TokenStream {
    collection::derive_collection(input)
}

// ============================================================================
// #[derive(Rated)] derive macro
// ============================================================================

/// Derive macro for the `Rated` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Rated)]
/// struct SafetyTip {
///     pub title: String,
///     #[rated]
///     pub calificaciones: Ratings<u8>,
/// }
/// ```
///
/// - `#[rated]` marks the `Ratings<S>` field. If omitted, defaults to a field
///   named `ratings`.
/// - The score type `S` is read from the field's generic argument.
#[proc_macro_derive(Rated, attributes(rated))]
pub fn derive_rated(input: TokenStream) -> TokenStream {
    rated::derive_rated(input)
}
