#![no_main]

use diopi_autogen::backend::call::derive_call;
use diopi_autogen::frontend::OpSignature;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Every derivation must be total on schemas the parser accepts
        if let Ok(sig) = OpSignature::parse(s) {
            let _ = sig.cpp_signature();
            let _ = sig.inputs();
            let _ = sig.outputs();
            let _ = sig.scalar_args();
            let _ = derive_call(sig.schema()).to_string();

            // Bindings are never empty, and equal in-place markers resolve to the same
            // name unless both fall back to their positional output name
            let returns = &sig.schema().returns;
            let bindings = sig.return_bindings();
            assert!(bindings.iter().all(|b| !b.is_empty()));
            let tensors: Vec<(usize, Option<&str>)> = returns
                .elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.ty.base.starts_with("Tensor"))
                .map(|(i, e)| {
                    let marker = e.ty.alias.as_ref().filter(|a| a.mutable).map(|a| &s[a.span.start..a.span.end]);
                    (i, marker)
                })
                .collect();
            assert_eq!(tensors.len(), bindings.len());
            let fallback = |i: usize| {
                if returns.is_tuple() { format!("out{i}") } else { "out".to_string() }
            };
            for (x, (i, marker)) in tensors.iter().enumerate() {
                for (y, (j, other)) in tensors.iter().enumerate() {
                    if marker.is_some() && marker == other {
                        assert!(
                            bindings[x] == bindings[y]
                                || (bindings[x] == fallback(*i) && bindings[y] == fallback(*j))
                        );
                    }
                }
            }
        }
    }
});
