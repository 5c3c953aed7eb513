//! # seqcheck-macros
//!
//! 提供 `seqcheck_tck` 属性宏，把 `seqcheck-core` 的自检主题注入为目标模块中的 `#[test]` 函数。
//! 主题表 [`TOPICS`] 是唯一事实来源：属性参数只从中挑选条目，生成的测试名与运行入口都取自表项。

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Ident, ItemMod, Token, parenthesized, parse_macro_input};

/// 一个自检主题：属性中使用的名称、生成的测试函数名、`seqcheck_core` 中的运行入口。
struct Topic {
    name: &'static str,
    test: &'static str,
    runner: &'static str,
}

/// 全部主题，顺序即默认展开顺序。
const TOPICS: &[Topic] = &[
    Topic {
        name: "beginning",
        test: "beginning_conformance",
        runner: "run_beginning_conformance",
    },
    Topic {
        name: "middle",
        test: "middle_conformance",
        runner: "run_middle_conformance",
    },
    Topic {
        name: "end",
        test: "end_conformance",
        runner: "run_end_conformance",
    },
    Topic {
        name: "multiple",
        test: "multiple_conformance",
        runner: "run_multiple_conformance",
    },
    Topic {
        name: "idempotence",
        test: "idempotence_conformance",
        runner: "run_idempotence_conformance",
    },
    Topic {
        name: "samples",
        test: "samples_conformance",
        runner: "run_samples_conformance",
    },
];

/// 属性参数：空、`suites` 或 `suites(a, b, ...)`。
struct TckArgs {
    selected: Vec<&'static Topic>,
}

impl Parse for TckArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(Self::all());
        }

        let keyword: Ident = input.parse()?;
        if keyword != "suites" {
            return Err(syn::Error::new(
                keyword.span(),
                "seqcheck_tck 属性仅支持 suites(...)",
            ));
        }
        if input.is_empty() {
            return Ok(Self::all());
        }

        let content;
        parenthesized!(content in input);
        let names: Punctuated<Ident, Token![,]> =
            content.parse_terminated(Ident::parse, Token![,])?;
        if !input.is_empty() {
            return Err(input.error("suites(...) 之后不应再有参数"));
        }

        let mut selected: Vec<&'static Topic> = Vec::new();
        for name in &names {
            let topic = lookup(name)?;
            if selected.iter().any(|seen| seen.name == topic.name) {
                return Err(syn::Error::new(name.span(), format!("主题 `{name}` 重复")));
            }
            selected.push(topic);
        }
        if selected.is_empty() {
            return Ok(Self::all());
        }
        Ok(Self { selected })
    }
}

impl TckArgs {
    fn all() -> Self {
        Self {
            selected: TOPICS.iter().collect(),
        }
    }
}

fn lookup(name: &Ident) -> syn::Result<&'static Topic> {
    TOPICS
        .iter()
        .find(|topic| name == topic.name)
        .ok_or_else(|| {
            let known: Vec<&str> = TOPICS.iter().map(|topic| topic.name).collect();
            syn::Error::new(
                name.span(),
                format!("未知的自检主题 `{name}`，可选值：{}", known.join(", ")),
            )
        })
}

#[proc_macro_attribute]
/// 教案级说明：
/// - **意图（Why）**：调用方只需在测试模块上声明 `#[seqcheck_tck]`，即可获得全部自检主题，
///   或用 `#[seqcheck_tck(suites(beginning, multiple))]` 只启用其中一部分。
/// - **逻辑（How）**：参数解析为 [`TckArgs`]，每个选中主题生成
///   `#[test] fn <主题>_conformance() { seqcheck_core::run_<主题>_conformance(); }`。
/// - **契约（What）**：未知或重复的主题名产生编译期诊断；`mod foo;` 形式的外部模块会被展开为内联模块。
pub fn seqcheck_tck(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as TckArgs);
    let module = parse_macro_input!(item as ItemMod);
    expand(&args, module).into()
}

fn conformance_test(topic: &Topic) -> syn::Item {
    let test = Ident::new(topic.test, Span::call_site());
    let runner = Ident::new(topic.runner, Span::call_site());
    syn::parse_quote! {
        #[test]
        fn #test() {
            ::seqcheck_core::#runner();
        }
    }
}

fn expand(args: &TckArgs, mut module: ItemMod) -> TokenStream2 {
    let tests: Vec<syn::Item> = args
        .selected
        .iter()
        .map(|topic| conformance_test(topic))
        .collect();

    if let Some((_, items)) = &mut module.content {
        items.extend(tests);
        return quote! { #module };
    }

    let ItemMod {
        attrs, vis, ident, ..
    } = &module;
    quote! {
        #(#attrs)*
        #vis mod #ident {
            #(#tests)*
        }
    }
}
