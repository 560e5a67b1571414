//! `#[derive(Component)]`

use darling::ast::{Data, Fields, Style};
use darling::util::{Flag, Ignored};
use darling::{FromDeriveInput, FromField, FromMeta};
use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;

#[derive(FromDeriveInput)]
#[darling(attributes(component), supports(struct_any))]
struct ComponentArgs {
    ident: syn::Ident,
    generics: syn::Generics,
    data: Data<Ignored, FieldArgs>,
    #[darling(default)]
    dispose: Flag,
    #[darling(default)]
    no_constructor: Flag,
    #[darling(multiple)]
    implements: Vec<syn::LitStr>,
    register: Option<RegisterArgs>,
}

#[derive(FromField)]
struct FieldArgs {
    ident: Option<syn::Ident>,
}

#[derive(FromMeta)]
struct RegisterArgs {
    lifetime: Option<syn::LitStr>,
    contract: Option<syn::LitStr>,
}

pub(super) fn expand_component(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let args = match ComponentArgs::from_derive_input(input) {
        Ok(args) => args,
        Err(err) => return Ok(err.write_errors()),
    };
    let name = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let fields = match &args.data {
        Data::Struct(fields) => fields,
        Data::Enum(_) => {
            return Err(syn::Error::new(name.span(), "Component can only be derived for structs"));
        }
    };

    let constructors = if args.no_constructor.is_present() {
        quote! { ::std::vec::Vec::new() }
    } else {
        let body = construct(fields);
        let ctx = if fields.iter().next().is_none() {
            quote! { _ }
        } else {
            quote! { ctx }
        };
        quote! {
            ::std::vec![::sandiq::Constructor::new(
                ::std::stringify!(#name),
                |#ctx: &::sandiq::ResolveContext<'_>| ::std::result::Result::Ok(#body),
            )]
        }
    };

    let disposable = args.dispose.is_present();
    let into_dispose = disposable.then(|| {
        quote! {
            fn into_dispose(
                this: ::std::sync::Arc<Self>,
            ) -> ::std::option::Option<::std::sync::Arc<dyn ::sandiq::Dispose>> {
                ::std::option::Option::Some(this)
            }
        }
    });

    let register_contract = match &args.register {
        Some(RegisterArgs { contract: Some(contract), .. }) => Some(contract.parse::<syn::Type>()?),
        _ => None,
    };

    let mut contracts: Vec<syn::Type> = Vec::new();
    for literal in &args.implements {
        push_unique(&mut contracts, literal.parse::<syn::Type>()?);
    }
    if let Some(contract) = &register_contract {
        push_unique(&mut contracts, contract.clone());
    }
    let implements = contracts.iter().map(|contract| {
        quote! {
            impl #impl_generics ::sandiq::Implements<#contract> for #name #ty_generics #where_clause {
                #[inline]
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#contract> {
                    self
                }
            }
        }
    });

    let scan_entry = match &args.register {
        Some(register) => Some(scan_entry(&args, register, register_contract.as_ref())?),
        None => None,
    };

    Ok(quote! {
        impl #impl_generics ::sandiq::Component for #name #ty_generics #where_clause {
            const DISPOSABLE: bool = #disposable;

            fn constructors() -> ::std::vec::Vec<::sandiq::Constructor<Self>> {
                #constructors
            }

            #into_dispose
        }

        #(#implements)*

        #scan_entry
    })
}

/// `Self { a: ctx.get()?, .. }`, `Self(ctx.get()?, ..)` or `Self`.
fn construct(fields: &Fields<FieldArgs>) -> TokenStream {
    match fields.style {
        Style::Unit => quote! { Self },
        Style::Tuple => {
            let values = fields.iter().map(|_| quote! { ctx.get()? });
            quote! { Self(#(#values),*) }
        }
        Style::Struct => {
            let values = fields.iter().map(|field| {
                let ident = &field.ident;
                quote! { #ident: ctx.get()? }
            });
            quote! { Self { #(#values),* } }
        }
    }
}

fn scan_entry(
    args: &ComponentArgs,
    register: &RegisterArgs,
    contract: Option<&syn::Type>,
) -> syn::Result<TokenStream> {
    let name = &args.ident;
    if !args.generics.params.is_empty() {
        return Err(syn::Error::new(
            args.generics.span(),
            "generic components cannot be registered by scanning",
        ));
    }

    let lifetime = match &register.lifetime {
        None => quote! { ::sandiq::Lifetime::Singleton },
        Some(literal) => match literal.value().as_str() {
            "singleton" => quote! { ::sandiq::Lifetime::Singleton },
            "transient" => quote! { ::sandiq::Lifetime::Transient },
            other => {
                return Err(syn::Error::new(
                    literal.span(),
                    format!("unknown lifetime `{other}`, expected \"singleton\" or \"transient\""),
                ));
            }
        },
    };

    let (contract_type, contract_name) = match contract {
        Some(contract) => (
            quote! { #contract },
            quote! { ::std::option::Option::Some(::std::stringify!(#contract)) },
        ),
        None => (quote! { #name }, quote! { ::std::option::Option::None }),
    };

    Ok(quote! {
        const _: () = {
            fn register(
                builder: &mut ::sandiq::ContainerBuilder,
                lifetime: ::sandiq::Lifetime,
            ) -> ::sandiq::Result<()> {
                builder.register::<#contract_type, #name>(lifetime).map(|_| ())
            }

            ::sandiq::__private::inventory::submit! {
                ::sandiq::ScanEntry::new(
                    ::std::module_path!(),
                    ::std::concat!(::std::module_path!(), "::", ::std::stringify!(#name)),
                    #contract_name,
                    #lifetime,
                    register,
                )
            }
        };
    })
}

fn push_unique(contracts: &mut Vec<syn::Type>, contract: syn::Type) {
    if !contracts.contains(&contract) {
        contracts.push(contract);
    }
}
