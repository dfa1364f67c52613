#![no_main]
// Signature codecs and verification of arbitrary input
use libfuzzer_sys::fuzz_target;
use secp256k1_engine::{Callbacks, Context, Flags};
use std::sync::OnceLock;

fn context() -> &'static Context {
    static CTX: OnceLock<Context> = OnceLock::new();
    CTX.get_or_init(|| {
        Context::with_callbacks(
            Flags::CONTEXT_SIGN | Flags::CONTEXT_VERIFY,
            Callbacks::silent(),
        )
        .unwrap()
    })
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 64 {
        return;
    }
    let ctx = context();
    let (head, tail) = data.split_at(64);

    // DER: whatever parses must serialize to something that parses the same
    if let Ok(sig) = ctx.parse_der_signature(data) {
        let der = ctx.serialize_der_signature(&sig);
        assert_eq!(ctx.parse_der_signature(der.as_ref()), Ok(sig));
    }

    // Compact: round trips exactly
    if let Ok(sig) = ctx.parse_compact_signature(head) {
        assert_eq!(&ctx.serialize_compact_signature(&sig)[..], head);

        let (normalized, changed) = ctx.normalize_signature(&sig);
        assert_eq!(changed, normalized != sig);
        assert!(!ctx.normalize_signature(&normalized).1);

        // A recovered key verifies the signature iff s is low
        if tail.len() >= 65 {
            let msg = &tail[..32];
            if let Ok(pk) = ctx.parse_public_key(&tail[32..65]) {
                let _ = ctx.verify(&normalized, msg, &pk);
            }
            let recid = tail[0] & 3;
            let rsig = ctx.parse_compact_recoverable_signature(head, recid).unwrap();
            if let Ok(pk) = ctx.recover(&rsig, msg) {
                assert_eq!(ctx.verify(&sig, msg, &pk), Ok(!changed));
            }
        }
    }
});
