//! Published bcrypt test vectors (jBCrypt / OpenBSD set).

use bcrypt_core::{hashpw, verify, BcryptError, HashString, Variant};

const FAST_VECTORS: &[(&str, &str)] = &[
    (
        "",
        "$2a$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s.",
    ),
    (
        "",
        "$2a$08$HqWuK6/Ng6sg9gQzbLrgb.Tl.ZHfXLhvt/SgVyWhQqgqcZ7ZuUtye",
    ),
    (
        "a",
        "$2a$06$m0CrhHm10qJ3lXRY.5zDGO3rS2KdeeWLuGmsfGlMfOxih58VYVfxe",
    ),
    (
        "a",
        "$2a$08$cfcvVd2aQ8CMvoMpP2EBfeodLEkkFJ9umNEfPD18.hUF62qqlC/V.",
    ),
    (
        "abc",
        "$2a$06$If6bvum7DFjUnE9p2uDeDu0YHzrHM6tf.iqN8.yx.jNN1ILEf7h0i",
    ),
    (
        "abcdefghijklmnopqrstuvwxyz",
        "$2a$06$.rCVZVOThsIa97pEDOxvGuRRgzG64bvtJ0938xuqzv18d3ZpQhstC",
    ),
    (
        "abcdefghijklmnopqrstuvwxyz",
        "$2a$08$aTsUwsyowQuzRrDqFflhgekJ8d9/7Z3GV3UcgvzQW3J5zMyrTvlz.",
    ),
    (
        "~!@#$%^&*()      ~!@#$%^&*()PNBFRD",
        "$2a$06$fPIsBO8qRqkjj273rfaOI.HtSV9jLDpTbZn782DC6/t7qT67P6FfO",
    ),
    (
        "~!@#$%^&*()      ~!@#$%^&*()PNBFRD",
        "$2a$08$Eq2r4G/76Wv39MzSX262huzPz612MZiYHVUJe/OcOql2jo4.9UxTW",
    ),
];

const SLOW_VECTORS: &[(&str, &str)] = &[
    (
        "",
        "$2a$10$k1wbIrmNyFAPwPVPSVa/zecw2BCEnBwVS2GbrmgzxFUOqW9dk4TCW",
    ),
    (
        "abcdefghijklmnopqrstuvwxyz",
        "$2a$10$fVH8e28OQRj9tqiDXs1e1uxpsjN0c7II7YPKXua2NAKYvM6iQk7dq",
    ),
    (
        "abcdefghijklmnopqrstuvwxyz",
        "$2a$12$D4G5f18o7aMMfwasBL7GpuQWuP3pkrZrOAnqP.bmezbMng.QwJ/pG",
    ),
];

fn check(vectors: &[(&str, &str)]) {
    for &(password, expected) in vectors {
        let setting = &expected[..29];
        assert_eq!(
            hashpw(password.as_bytes(), setting).unwrap(),
            expected,
            "password {password:?}"
        );
        assert!(verify(password.as_bytes(), expected).unwrap());
    }
}

#[test]
fn fast_vectors() {
    check(FAST_VECTORS);
}

#[test]
#[ignore = "cost 10 and 12 take seconds in debug builds"]
fn slow_vectors() {
    check(SLOW_VECTORS);
}

#[test]
fn wrong_password_fails_known_hash() {
    for &(password, expected) in FAST_VECTORS {
        let wrong = format!("{password}x");
        assert!(!verify(wrong.as_bytes(), expected).unwrap());
    }
}

#[test]
fn unknown_variant_is_malformed() {
    let hash = "$2z$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s.";
    match verify(b"", hash) {
        Err(BcryptError::MalformedHash(reason)) => assert!(reason.contains("2z")),
        other => panic!("expected MalformedHash, got {other:?}"),
    }
}

#[test]
fn prefix_variants_share_digests() {
    let (password, hash) = FAST_VECTORS[0];
    for prefix in ["$2b$", "$2y$", "$2x$"] {
        let relabelled = hash.replacen("$2a$", prefix, 1);
        assert!(verify(password.as_bytes(), &relabelled).unwrap());
    }
}

#[test]
fn parsed_hash_exposes_parameters() {
    let hash: HashString = FAST_VECTORS[6].1.parse().unwrap();
    assert_eq!(hash.variant(), Variant::TwoA);
    assert_eq!(hash.cost().log_rounds(), 8);
    assert!(hash.verify(b"abcdefghijklmnopqrstuvwxyz"));
}

#[test]
fn altered_trailing_bits_are_malformed() {
    let (password, hash) = FAST_VECTORS[0];
    let digest_tail = format!("{}/", &hash[..59]);
    let salt_tail = hash.replacen("cll.", "cll/", 1);

    for altered in [digest_tail, salt_tail] {
        assert!(matches!(
            verify(password.as_bytes(), &altered),
            Err(BcryptError::MalformedHash(_))
        ));
        assert!(matches!(
            hashpw(password.as_bytes(), &altered),
            Err(BcryptError::MalformedHash(_))
        ));
    }
}
