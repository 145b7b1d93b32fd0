use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, LitStr, Path, Visibility, parse_macro_input, parse_quote};

pub fn derive_reflect_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Path of the runtime crate, overridable with `#[document(crate = "...")]`.
fn crate_path(input: &DeriveInput) -> syn::Result<Path> {
    let mut path: Path = parse_quote!(::scopedoc_document);

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                path = lit.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported document attribute, expected `crate`"))
            }
        })?;
    }

    Ok(path)
}

/// The `#[document("name,omitempty")]` tag of a field, if any.
fn field_tag(field: &syn::Field) -> syn::Result<Option<LitStr>> {
    let mut tag = None;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("document")) {
        if tag.is_some() {
            return Err(syn::Error::new(attr.span(), "duplicate document tag"));
        }
        tag = Some(attr.parse_args::<LitStr>()?);
    }

    Ok(tag)
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let krate = crate_path(&input)?;
    let name = &input.ident;
    let type_name = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    name.span(),
                    "Reflect can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "Reflect can only be derived for structs",
            ));
        }
    };

    let mut field_calls = Vec::new();
    for field in fields {
        let tag = field_tag(field)?;
        if !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };

        let ident_str = ident.unraw().to_string();
        let tagged = tag.map(|t| quote!(.tagged(#t)));
        field_calls.push(quote! {
            .with_field(
                #krate::Field::new(#ident_str, #krate::ToValue::to_value(&self.#ident)) #tagged
            )
        });
    }

    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in type_params {
        where_clause
            .predicates
            .push(parse_quote!(#param: #krate::ToValue));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Reflect for #name #ty_generics #where_clause {
            fn reflect(&self) -> #krate::Record {
                #krate::Record::new(#type_name) #(#field_calls)*
            }
        }

        impl #impl_generics #krate::ToValue for #name #ty_generics #where_clause {
            fn to_value(&self) -> #krate::Value {
                #krate::Value::Record(#krate::Reflect::reflect(self))
            }
        }
    })
}
