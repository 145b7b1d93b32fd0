//! Derive macros for scopedoc
//!
//! ## Reflection
//!
//! - `#[derive(Reflect)]` - runtime field listing for document building
//!
//! The generated code refers to `::scopedoc_document`. Crates that reach it
//! through another path (for instance the `scopedoc` facade) can point the
//! derive there with `#[document(crate = "scopedoc::document")]`.

use proc_macro::TokenStream;

mod reflect;

/// Derive `Reflect` and `ToValue` for a struct with named fields
///
/// Public fields are reflected in declaration order; non-public fields are
/// left out. A field tag follows the `name[,omitempty]` syntax, `-` drops
/// the field.
///
/// # Examples
///
/// ```ignore
/// #[derive(Reflect)]
/// pub struct DeviceFilter {
///     #[document("device_id")]
///     pub id: String,
///     #[document(",omitempty")]
///     pub status: Option<String>,
///     pub attributes: HashMap<String, String>,
///     cursor: usize,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(document))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    reflect::derive_reflect_impl(input)
}
