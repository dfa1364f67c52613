#![no_main]
// Public key parsing, serialization and tweaking
use libfuzzer_sys::fuzz_target;
use secp256k1_engine::{Callbacks, Context, Error, Flags, PublicKey};
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

fn test_public_key(ctx: &Context, pk: &PublicKey, tweak: &[u8; 32]) {
    // Both encodings parse back to the same key
    for flags in [Flags::EC_COMPRESSED, Flags::EC_UNCOMPRESSED] {
        let ser = ctx.serialize_public_key(pk, flags).unwrap();
        assert_eq!(&ctx.parse_public_key(ser.as_ref()).unwrap(), pk);
    }

    // Negation is an involution
    let mut neg = *pk;
    ctx.negate_public_key(&mut neg).unwrap();
    assert_ne!(&neg, pk);
    ctx.negate_public_key(&mut neg).unwrap();
    assert_eq!(&neg, pk);

    // P + (-P) is the point at infinity
    let mut minus = *pk;
    ctx.negate_public_key(&mut minus).unwrap();
    assert_eq!(
        ctx.combine_public_keys(&[pk, &minus]),
        Err(Error::PointAtInfinity)
    );

    // Failed tweaks leave the key untouched
    let mut added = *pk;
    if ctx.public_key_tweak_add(&mut added, tweak).is_err() {
        assert_eq!(&added, pk);
    }
    let mut multiplied = *pk;
    if ctx.public_key_tweak_mul(&mut multiplied, tweak).is_err() {
        assert_eq!(&multiplied, pk);
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 98 {
        return;
    }
    let ctx = context();

    let mut tweak = [0u8; 32];
    tweak.copy_from_slice(&data[..32]);

    // Arbitrary encodings
    let len = usize::from(data[32] % 66);
    if let Ok(pk) = ctx.parse_public_key(&data[33..33 + len]) {
        test_public_key(ctx, &pk, &tweak);
    }

    // Keys derived from secret keys agree with the secret key tweaks
    let mut seckey = [0u8; 32];
    seckey.copy_from_slice(&data[66..98]);
    if let Ok(pk) = ctx.create_public_key(&seckey) {
        test_public_key(ctx, &pk, &tweak);

        let mut sk = seckey;
        let mut pk_tweaked = pk;
        match (
            ctx.secret_key_tweak_add(&mut sk, &tweak),
            ctx.public_key_tweak_add(&mut pk_tweaked, &tweak),
        ) {
            (Ok(()), Ok(())) => assert_eq!(ctx.create_public_key(&sk).unwrap(), pk_tweaked),
            (Err(_), Err(_)) => assert_eq!((sk, pk_tweaked), (seckey, pk)),
            (sk_res, pk_res) => panic!("tweak results differ: {sk_res:?} {pk_res:?}"),
        }
    }
});
