use heck::SnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
    Ident, Token, Type,
};

/// Parses the following syntax:
/// ```text
/// generate_ast!(
///     $TREE_NAME,
///     [$($NODE_NAME => { $($FIELD_NAME: $FIELD_TYPE),+ });+]
/// )
/// ```
///
/// For example:
/// ```text
/// generate_ast!(
///     Expr,
///     [
///         Grouping => { expression: Box<Expr> };
///         Unary    => { op: Token, right: Box<Expr> };
///     ]
/// )
/// ```
struct Tree {
    name: Ident,
    nodes: Punctuated<Node, Token![;]>,
}

impl Parse for Tree {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![,]>()?;
        let nodes_input;
        syn::bracketed!(nodes_input in input);
        let nodes = nodes_input.parse_terminated(Node::parse)?;
        Ok(Tree { name, nodes })
    }
}

struct Node {
    name: Ident,
    fields: Punctuated<Field, Token![,]>,
}

impl Node {
    fn snake_name(&self) -> String {
        self.name.to_string().to_snake_case()
    }

    fn visit_fn(&self, tree: &Ident) -> Ident {
        let tree = tree.to_string().to_lowercase();
        format_ident!("visit_{}_{}", self.snake_name(), tree)
    }

    fn new_fn(&self) -> Ident {
        format_ident!("new_{}", self.snake_name())
    }
}

impl Parse for Node {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![=>]>()?;
        let fields_input;
        syn::braced!(fields_input in input);
        let fields = fields_input.parse_terminated(Field::parse)?;
        Ok(Node { name, fields })
    }
}

struct Field {
    name: Ident,
    ty: Type,
}

impl Parse for Field {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty: Type = input.parse()?;
        Ok(Field { name, ty })
    }
}

/// Generates a tree type, one struct per node, a `new_*` constructor per
/// node and a `Visitor<T>` trait that `accept` dispatches to.
#[proc_macro]
pub fn generate_ast(input: TokenStream) -> TokenStream {
    let Tree { name, nodes } = syn::parse_macro_input!(input as Tree);

    let node_names: Vec<_> = nodes.iter().map(|n| &n.name).collect();
    let visit_fns: Vec<_> = nodes.iter().map(|n| n.visit_fn(&name)).collect();

    let tree_enum = quote! {
        #[derive(Clone, Debug, PartialEq)]
        pub enum #name {
            #(#node_names(#node_names)),*
        }
    };

    let node_structs = nodes.iter().map(|n| {
        let node_name = &n.name;
        let field_names = n.fields.iter().map(|f| &f.name);
        let field_types = n.fields.iter().map(|f| &f.ty);
        quote! {
            #[derive(Clone, Debug, PartialEq)]
            pub struct #node_name {
                #(pub #field_names: #field_types),*
            }
        }
    });

    let constructors = nodes.iter().map(|n| {
        let node_name = &n.name;
        let new_fn = n.new_fn();
        let params = n.fields.iter().map(|f| {
            let (field, ty) = (&f.name, &f.ty);
            quote! { #field: #ty }
        });
        let field_names = n.fields.iter().map(|f| &f.name);
        quote! {
            pub fn #new_fn(#(#params),*) -> Self {
                #name::#node_name(#node_name { #(#field_names),* })
            }
        }
    });

    let visitor = quote! {
        pub trait Visitor<T> {
            #(fn #visit_fns(&mut self, e: &#node_names) -> T;)*
        }

        impl #name {
            #(#constructors)*

            pub fn accept<T, V: Visitor<T>>(&self, v: &mut V) -> T {
                match self {
                    #(#name::#node_names(n) => v.#visit_fns(n),)*
                }
            }
        }
    };

    (quote! {
        #tree_enum
        #(#node_structs)*
        #visitor
    }).into()
}
