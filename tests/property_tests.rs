//! Property-based tests for the wrapper generator
//!
//! These tests use proptest to check the generator's structural guarantees across many
//! randomly generated schemas, templates and catalogues.

use diopi_autogen::backend::call::{CallArg, derive_call};
use diopi_autogen::catalogue::OpRecord;
use diopi_autogen::format::{FormatConfig, normalize};
use diopi_autogen::frontend::OpSignature;
use diopi_autogen::template::{Env, Template};
use diopi_autogen::Generator;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Parameter names that cannot collide with type spellings or synthesized names.
fn param_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_map(|s| format!("p{s}"))
}

/// Distinct parameter names.
fn distinct_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(param_name_strategy(), 1..=max).prop_map(|set| set.into_iter().collect())
}

/// Operator base names (no `_` so the in-place/overload rules do not apply).
fn op_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{2,10}"
}

/// Schemas from the catalogue subset, with random decorations.
fn schema_strategy() -> impl Strategy<Value = String> {
    let param = r"(Tensor|Scalar|int|float|bool|str)(\([a-c]!?\))?(\[[0-9]?\])?\?? [a-z]{1,5}(=[0-9]{1,2})?";
    let pattern = format!(
        r"[a-z][a-z_]{{0,7}}(\.[A-Za-z_]{{1,6}})?\(({param}(, (\* , )?{param}){{0,3}})?\) -> (Tensor|Tensor\([a-c]!\)|\(\)|\((Tensor, ){{1,3}}Tensor\))"
    );
    proptest::string::string_regex(&pattern).expect("valid schema regex")
}

/// One template line without `$` and without trailing whitespace.
fn block_line_strategy() -> impl Strategy<Value = String> {
    "[a-z;(){}=]([a-z;(){}= ]{0,18}[a-z;(){}=])?"
}

// =============================================================================
// Schema Properties
// =============================================================================

proptest! {
    /// Property: a functional op with a single `Tensor` return writes exactly `out`, passed right after `ctx`
    #[test]
    fn functional_op_outputs_single_out(op in op_name_strategy(), names in distinct_names(4)) {
        let params: Vec<String> = names.iter().map(|n| format!("Tensor {n}")).collect();
        let schema = format!("{}({}) -> Tensor", op, params.join(", "));
        let sig = OpSignature::parse(&schema).expect("generated schema parses");

        prop_assert_eq!(sig.outputs(), vec!["out".to_string()]);
        let call = derive_call(sig.schema());
        prop_assert_eq!(&call.args[0], &CallArg::Context);
        prop_assert_eq!(&call.args[1], &CallArg::Ident("out".to_string()));
        prop_assert_eq!(call.args.len(), names.len() + 2);
    }

    /// Property: `k` in-place tensors give `k` outputs, and a tuple of in-place returns resolves to their names
    #[test]
    fn inplace_tensors_resolve_to_parameter_names(names in distinct_names(5), extra in param_name_strategy()) {
        prop_assume!(!names.contains(&extra));
        let sets: Vec<char> = ('a'..='z').take(names.len()).collect();
        let mut params = vec![format!("Tensor {extra}")];
        params.extend(names.iter().zip(&sets).map(|(n, s)| format!("Tensor({s}!) {n}")));
        let returns: Vec<String> = sets.iter().map(|s| format!("Tensor({s}!)")).collect();
        let schema = format!("op.out({}) -> ({})", params.join(", "), returns.join(", "));
        let sig = OpSignature::parse(&schema).expect("generated schema parses");

        prop_assert_eq!(sig.outputs().len(), names.len());
        prop_assert_eq!(sig.outputs(), names.clone());
        prop_assert_eq!(sig.return_bindings(), names);
    }

    /// Property: repeated in-place markers resolve every return position to the first parameter bearing the marker
    #[test]
    fn repeated_markers_resolve_to_first_parameter(
        names in distinct_names(6),
        set_picks in prop::collection::vec(0usize..2, 6),
        return_picks in prop::collection::vec(0usize..6, 1..5),
    ) {
        let sets: Vec<char> = set_picks.iter().take(names.len()).map(|&i| ['a', 'b'][i]).collect();
        let params: Vec<String> = names.iter().zip(&sets).map(|(n, s)| format!("Tensor({s}!) {n}")).collect();
        let returned: Vec<char> = return_picks.iter().map(|&i| sets[i % sets.len()]).collect();
        let returns: Vec<String> = returned.iter().map(|s| format!("Tensor({s}!)")).collect();
        let schema = format!("op.out({}) -> ({})", params.join(", "), returns.join(", "));
        let sig = OpSignature::parse(&schema).expect("generated schema parses");

        let expected: Vec<String> = returned
            .iter()
            .map(|s| {
                let first = sets.iter().position(|x| x == s).expect("returned set is declared");
                names[first].clone()
            })
            .collect();
        prop_assert_eq!(sig.outputs(), names);
        prop_assert_eq!(sig.return_bindings(), expected);
    }

    /// Property: every derivation is total on parsed schemas
    #[test]
    fn derivations_never_panic(schema in schema_strategy()) {
        if let Ok(sig) = OpSignature::parse(&schema) {
            let _ = sig.cpp_signature();
            let _ = sig.inputs();
            let _ = sig.scalar_args();
            let _ = sig.return_bindings();
            let _ = derive_call(sig.schema()).to_string();
        }
    }
}

// =============================================================================
// Template Properties
// =============================================================================

proptest! {
    /// Property: substitution is idempotent on placeholder-free output
    #[test]
    fn substitution_is_idempotent(text in "[a-zA-Z0-9 ,;(){}\n]{0,80}") {
        let env = Env::new();
        let once = Template::new(text.clone()).substitute(&env).expect("no placeholders");
        prop_assert_eq!(&once, &text);
        let twice = Template::new(once.clone()).substitute(&env).expect("no placeholders");
        prop_assert_eq!(twice, once);
    }

    /// Property: list markers around an empty sequence render nothing
    #[test]
    fn empty_sequence_with_markers_is_empty(prefix in "[a-z(]{0,10}", suffix in "[a-z)]{0,10}") {
        let env = Env::new().with("x", Vec::<String>::new());
        for pattern in ["${,x,}", "${,x}", "${x,}"] {
            let template = Template::new(format!("{prefix}{pattern}{suffix}"));
            prop_assert_eq!(template.substitute(&env).expect("x is bound"), format!("{prefix}{suffix}"));
        }
    }

    /// Property: an indented block puts every line behind the captured indent, with no trailing blank line
    #[test]
    fn indented_block_preserves_indent(
        indent in " {0,8}",
        lines in prop::collection::vec(block_line_strategy(), 1..6),
    ) {
        let env = Env::new().with("body", lines.join("\n"));
        let rendered = Template::new(format!("{{\n{indent}$body\n}}"))
            .substitute(&env)
            .expect("body is bound");
        let expected: Vec<String> = lines.iter().map(|l| format!("{indent}{l}")).collect();
        prop_assert_eq!(rendered, format!("{{\n{}\n}}", expected.join("\n")));
    }

    /// Property: post-processing is idempotent
    #[test]
    fn normalize_is_idempotent(text in "[a-z ,\n]{0,60}") {
        let config = FormatConfig::default();
        let once = normalize(&text, &config);
        prop_assert_eq!(normalize(&once, &config), once);
    }
}

// =============================================================================
// Catalogue Properties
// =============================================================================

proptest! {
    /// Property: registration entries appear in catalogue order
    #[test]
    fn registrations_follow_catalogue_order(
        ops in prop::collection::hash_set(op_name_strategy(), 1..6)
    ) {
        let ops: Vec<String> = ops.into_iter().collect();
        let records: Vec<OpRecord> = ops
            .iter()
            .map(|op| OpRecord::new(format!("{op}(Tensor self) -> Tensor")))
            .collect();
        let text = Generator::default().generate(&records).expect("catalogue generates");

        let positions: Vec<usize> = ops
            .iter()
            .map(|op| text.find(&format!("DIOPI_ATEN_FUNC(\"{op}\"")).expect("registration present"))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
