#![no_main]
use libfuzzer_sys::fuzz_target;
use secp256k1_engine::arithmetic::{FieldElement, Scalar};

fn test_scalar(s1: Scalar, s2: Scalar, s3: Scalar) {
    // Associativity
    assert_eq!(s1 + &(s2 + &s3), (s1 + &s2) + &s3);
    assert_eq!(s1 * &(s2 * &s3), (s1 * &s2) * &s3);

    // Commutativity
    assert_eq!(s1 + &s2, s2 + &s1);
    assert_eq!(s1 * &s2, s2 * &s1);

    // Identity
    assert_eq!(s1 + &Scalar::ZERO, s1);
    assert_eq!(s1 * &Scalar::ONE, s1);

    // Distributivity
    assert_eq!(s1 * &(s2 + &s3), (s1 * &s2) + &(s1 * &s3));

    // Negation, inversion
    assert_eq!(s1 + &(-s1), Scalar::ZERO);
    if !bool::from(s1.is_zero()) {
        assert_eq!(s1 * &s1.invert(), Scalar::ONE);
    }
    assert_eq!(s1.square(), s1 * &s1);

    // Exactly one of s and -s is high, unless s is zero
    if !bool::from(s1.is_zero()) {
        assert_ne!(bool::from(s1.is_high()), bool::from((-s1).is_high()));
    }

    // Canonical encoding
    assert_eq!(Scalar::from_bytes(&s1.to_bytes()).unwrap(), s1);
}

fn test_field(f1: FieldElement, f2: FieldElement, f3: FieldElement) {
    // Associativity
    assert_eq!((f1 * &(f2 * &f3)).normalize(), ((f1 * &f2) * &f3).normalize());

    // Commutativity
    assert_eq!((f1 + &f2).normalize(), (f2 + &f1).normalize());
    assert_eq!((f1 * &f2).normalize(), (f2 * &f1).normalize());

    // Distributivity
    assert_eq!(
        (f1 * &(f2 + &f3)).normalize(),
        ((f1 * &f2) + &(f1 * &f3)).normalize()
    );

    // Negation, doubling
    assert!(bool::from((f1 + &f1.negate(1)).normalizes_to_zero()));
    assert_eq!(f1.double().normalize(), (f1 + &f1).normalize());

    // Inversion, square roots
    if !bool::from(f1.normalizes_to_zero()) {
        assert_eq!((f1 * &f1.invert()).normalize(), FieldElement::ONE);
    }
    let sq = f1.square();
    let root = sq.sqrt().unwrap();
    assert_eq!(root.square().normalize(), sq.normalize());

    // Canonical encoding
    let n = f1.normalize();
    assert_eq!(FieldElement::from_bytes(&n.to_bytes()).unwrap(), n);
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 96 {
        return;
    }

    let chunk = |i: usize| -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&data[32 * i..32 * (i + 1)]);
        bytes
    };

    let scalars = [0, 1, 2].map(|i| Scalar::from_bytes_reduced(&chunk(i)).0);
    test_scalar(scalars[0], scalars[1], scalars[2]);

    let fields = [0, 1, 2].map(|i| FieldElement::from_bytes(&chunk(i)).unwrap_or(FieldElement::ONE));
    test_field(fields[0], fields[1], fields[2]);
});
