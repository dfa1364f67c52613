//! ECDSA/secp256k1 test vectors

use hex_literal::hex;

/// ECDSA test vector: a key pair, a nonce, a message digest and the
/// resulting low-S signature with its recovery id.
#[derive(Clone, Copy, Debug)]
pub struct TestVector {
    /// Secret key.
    pub d: [u8; 32],
    /// Public key x-coordinate.
    pub q_x: [u8; 32],
    /// Public key y-coordinate.
    pub q_y: [u8; 32],
    /// Nonce.
    pub k: [u8; 32],
    /// Message digest.
    pub m: [u8; 32],
    /// Signature `r`.
    pub r: [u8; 32],
    /// Signature `s`, normalized.
    pub s: [u8; 32],
    /// Recovery id.
    pub recid: u8,
}

/// Signatures over an externally chosen nonce `k`.
pub const ECDSA_TEST_VECTORS: &[TestVector] = &[
    TestVector {
        d: hex!("ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f"),
        q_x: hex!("779dd197a5df977ed2cf6cb31d82d43328b790dc6b3b7d4437a427bd5847dfcd"),
        q_y: hex!("e94b724a555b6d017bb7607c3e3281daf5b1699d6ef4124975c9237b917d426f"),
        k: hex!("49a0d7b786ec9cde0d0721d72804befd06571c974b191efb42ecf322ba9ddd9a"),
        m: hex!("4b688df40bcedbe641ddb16ff0a1842d9c67ea1c3bf63f3e0471baa664531d1a"),
        r: hex!("241097efbf8b63bf145c8961dbdf10c310efbb3b2676bbc0f8b08505c9e2f795"),
        s: hex!("021006b7838609339e8b415a7f9acb1b661828131aef1ecbc7955dfb01f3ca0e"),
        recid: 0,
    },
    TestVector {
        d: hex!("0000000000000000000000000000000000000000000000000000000000000003"),
        q_x: hex!("f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"),
        q_y: hex!("388f7b0f632de8140fe337e62a37f3566500a99934c2231b6cb9fd7584b8e672"),
        k: hex!("00000000000000000000000000000000000000000000000000000000deadbeef"),
        m: hex!("1cf52b1e1bed8a21dab464b91400c2bc0938a132170ec0bb5bde0ca395294bce"),
        r: hex!("76d2fdf1302d1fa9556f4df94ec84cefba6d482e54f47c6c2a238c1baa560f0e"),
        s: hex!("599b8372d6bcdf842cf8fea9d0735c6c4fb1eb8deb70a02fd232114027be144c"),
        recid: 1,
    },
    TestVector {
        d: hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"),
        q_x: hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        q_y: hex!("b7c52588d95c3b9aa25b0403f1eef75702e84bb7597aabe663b82f6f04ef2777"),
        k: hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd036413f"),
        m: hex!("ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
        r: hex!("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"),
        s: hex!("1cfdc035df09414967dd5fc8b51fc193d1c438da398861ac2a29fb2351c7b08d"),
        recid: 0,
    },
];

/// Deterministic signatures: `k` is the first RFC6979 HMAC-SHA256 nonce for
/// `(d, m)` without extra data.
///
/// Includes the widely published vectors for SHA-256("Satoshi Nakamoto")
/// under keys `1` and `n - 1`, and SHA-256("Alan Turing").
pub const RFC6979_TEST_VECTORS: &[TestVector] = &[
    TestVector {
        d: hex!("0000000000000000000000000000000000000000000000000000000000000001"),
        q_x: hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        q_y: hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
        k: hex!("8f8a276c19f4149656b280621e358cce24f5f52542772691ee69063b74f15d15"),
        m: hex!("a0dc65ffca799873cbea0ac274015b9526505daaaed385155425f7337704883e"),
        r: hex!("934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8"),
        s: hex!("2442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5"),
        recid: 1,
    },
    TestVector {
        d: hex!("ebb2c082fd7727890a28ac82f6bdf97bad8de9f5d7c9028692de1a255cad3e0f"),
        q_x: hex!("779dd197a5df977ed2cf6cb31d82d43328b790dc6b3b7d4437a427bd5847dfcd"),
        q_y: hex!("e94b724a555b6d017bb7607c3e3281daf5b1699d6ef4124975c9237b917d426f"),
        k: hex!("8aa5d4130d9c1bb8688ff29efbdeaa3b6f1f38d68c7f10576d9a684589453b1c"),
        m: hex!("4b688df40bcedbe641ddb16ff0a1842d9c67ea1c3bf63f3e0471baa664531d1a"),
        r: hex!("e3650c6a94419ce0db9d9e209ca5bac2f9a888f376bd7f05a142dd87f1fd90f6"),
        s: hex!("252e6c025089ed9b784daed95ce09b1dfdb46d454e6fc1e1bd7ea007513f5c9a"),
        recid: 0,
    },
    TestVector {
        d: hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"),
        q_x: hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
        q_y: hex!("b7c52588d95c3b9aa25b0403f1eef75702e84bb7597aabe663b82f6f04ef2777"),
        k: hex!("33a19b60e25fb6f4435af53a3d42d493644827367e6453928554f43e49aa6f90"),
        m: hex!("a0dc65ffca799873cbea0ac274015b9526505daaaed385155425f7337704883e"),
        r: hex!("fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d0"),
        s: hex!("6b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5"),
        recid: 0,
    },
    TestVector {
        d: hex!("f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181"),
        q_x: hex!("92df7b245b81aa637ab4e867c8d511008f79161a97d64f2ac709600352f7acbc"),
        q_y: hex!("e9bfdf1b13fa0cb1de4521e5386cde3a1cd26c5ab584989d07bbed58a5419f62"),
        k: hex!("525a82b70e67874398067543fd84c83d30c175fdc45fdeee082fe13b1d7cfdf1"),
        m: hex!("4ba38d48a60f1b29e9eb726eaff08b2e83d8d81e031666fee50e85900d7dc1ef"),
        r: hex!("7063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c"),
        s: hex!("58dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea"),
        recid: 0,
    },
];
