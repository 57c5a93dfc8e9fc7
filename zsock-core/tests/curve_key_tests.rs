//! Integration tests for CURVE keys and Z85 text

use zsock_core::curve::{CurveKeyPair, CurvePublicKey, CurveSecretKey, KeyError};
use zsock_core::z85;

// Key pair from the CurveZMQ reference test vectors
const SERVER_PUBLIC_Z85: &str = "rq:rM>}U?@Lns47E1%kR.o@n%FcmmsL/@{H8]yf7";
const SERVER_SECRET_Z85: &str = "JTKVSB%%)wK0E.X)V>+}o?pNmC{O&4W4b!Ni{Lh6";

#[test]
fn test_z85_rfc_vector_from_hex() {
    let data = hex::decode("864FD26FB559F75B").unwrap();
    assert_eq!(z85::encode(&data).unwrap(), "HelloWorld");
    assert_eq!(z85::decode("HelloWorld").unwrap(), data);
}

#[test]
fn test_reference_keypair_derivation() {
    let secret: CurveSecretKey = SERVER_SECRET_Z85.parse().unwrap();
    let public: CurvePublicKey = SERVER_PUBLIC_Z85.parse().unwrap();

    assert_eq!(secret.public_key(), public);
    assert_eq!(public.to_z85(), SERVER_PUBLIC_Z85);
    assert_eq!(secret.to_z85(), SERVER_SECRET_Z85);
}

#[test]
fn test_reference_public_key_bytes() {
    let public: CurvePublicKey = SERVER_PUBLIC_Z85.parse().unwrap();
    assert_eq!(
        hex::encode(public.as_bytes()),
        "54fcba24e93249969316fb617c872bb0c1d1ff14800427c594cbfacf1bc2d652"
    );
}

#[test]
fn test_generated_keys_are_distinct() {
    let a = CurveKeyPair::generate();
    let b = CurveKeyPair::generate();
    assert_ne!(a.public, b.public);
    assert_ne!(a.secret, b.secret);
}

#[test]
fn test_bad_key_text() {
    assert_eq!(
        "short".parse::<CurvePublicKey>(),
        Err(KeyError::InvalidLength(5))
    );
    let bad = "~".repeat(40);
    assert!(matches!(
        bad.parse::<CurveSecretKey>(),
        Err(KeyError::Z85(_))
    ));
}
