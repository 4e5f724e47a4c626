use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Type};

fn formatted_arg_error_msg(arg_name: &str, arg_pos: usize, fn_name: &str) -> String {
    format!(
        "Argument {} ('{}') of {} must be f64 or a trailing Vec<f64>",
        arg_pos, arg_name, fn_name
    )
}

/// Turns `fn name(a: f64, b: f64) -> Result<f64, String>` into a registry entry
/// with the signature `fn name(args: &[f64]) -> Result<f64, String>`.
///
/// A trailing `Vec<f64>` parameter collects every remaining argument, which is
/// how variadic functions such as `min` and `max` are written.
#[proc_macro_attribute]
pub fn math_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let fn_attrs = &input.attrs;
    let fn_name = &input.sig.ident;
    let fn_args = &input.sig.inputs;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;

    let mut arg_extractions = Vec::new();
    let mut fixed_args = 0usize;
    let mut variadic = false;

    for (i, arg) in fn_args.iter().enumerate() {
        if let FnArg::Typed(PatType { pat, ty, .. }) = arg {
            let arg_name = match **pat {
                syn::Pat::Ident(ref ident) => &ident.ident,
                _ => panic!("Unsupported pattern"),
            };

            let err_msg = formatted_arg_error_msg(&arg_name.to_string(), i, &fn_name.to_string());

            let extract_code = match **ty {
                Type::Path(ref type_path) => {
                    let type_ident = match type_path.path.segments.last() {
                        Some(segment) => &segment.ident,
                        None => panic!("{}", err_msg),
                    };
                    match type_ident.to_string().as_str() {
                        "f64" => {
                            fixed_args += 1;
                            quote! {
                                let #pat: f64 = args[#i];
                            }
                        }
                        "Vec" => {
                            if i + 1 != fn_args.len() {
                                panic!("{}", err_msg);
                            }
                            variadic = true;
                            quote! {
                                let #pat: Vec<f64> = args[#i..].to_vec();
                            }
                        }
                        _ => panic!("{}", err_msg),
                    }
                }
                _ => panic!("{}", err_msg),
            };

            arg_extractions.push(extract_code);
        }
    }

    let arity_check = if variadic && fixed_args == 0 {
        quote! {}
    } else if variadic {
        quote! {
            if args.len() < #fixed_args {
                return Err(format!("Expected at least {} arguments, but got {}", #fixed_args, args.len()));
            }
        }
    } else {
        quote! {
            if args.len() != #fixed_args {
                return Err(format!("Expected {} arguments, but got {}", #fixed_args, args.len()));
            }
        }
    };

    let expanded = quote! {
        #(#fn_attrs)*
        pub fn #fn_name(args: &[f64]) #fn_output {
            #arity_check

            #(#arg_extractions)*

            #fn_body
        }
    };

    TokenStream::from(expanded)
}
