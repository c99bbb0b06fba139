use proptest::prelude::*;
use tether_crypto::{KeyPair, SignatureService};

fn service() -> SignatureService {
    let kp = KeyPair::from_seed(&[7u8; 32]);
    SignatureService::new(kp.signing_key, kp.verifying_key)
}

proptest! {
    #[test]
    fn signed_fields_verify(fields in prop::collection::vec(".*", 0..6)) {
        let service = service();
        let sig = service.sign(&fields);
        prop_assert!(service.verify(&sig, &fields));
    }

    #[test]
    fn any_single_field_change_is_detected(
        fields in prop::collection::vec(".{0,16}", 1..6),
        index in any::<prop::sample::Index>(),
        suffix in ".{1,8}",
    ) {
        let service = service();
        let sig = service.sign(&fields);

        let mut tampered = fields.clone();
        let i = index.index(tampered.len());
        tampered[i].push_str(&suffix);
        prop_assert!(!service.verify(&sig, &tampered));
    }

    #[test]
    fn swapping_distinct_fields_breaks_signature(a in "[a-z]{1,12}", b in "[A-Z]{1,12}") {
        let service = service();
        let sig = service.sign(&[a.as_str(), b.as_str()]);
        prop_assert!(!service.verify(&sig, &[b.as_str(), a.as_str()]));
    }
}

#[test]
fn dropping_a_field_breaks_signature() {
    let service = service();
    let sig = service.sign(&["anonymous", "00000000-0000-0000-0000-000000000000"]);
    assert!(!service.verify(&sig, &["anonymous"]));
}

#[test]
fn mirror_services_interoperate() {
    // Client signs with its key and trusts the authority; the authority does the reverse.
    let client = KeyPair::from_seed(&[1u8; 32]);
    let authority = KeyPair::from_seed(&[2u8; 32]);
    let client_side = SignatureService::new(client.signing_key, authority.verifying_key);
    let authority_side = SignatureService::new(authority.signing_key, client.verifying_key);

    let request_sig = client_side.sign(&["me@example.com", "challenge"]);
    assert!(authority_side.verify(&request_sig, &["me@example.com", "challenge"]));

    let response_sig = authority_side.sign(&["instance"]);
    assert!(client_side.verify(&response_sig, &["instance"]));
    assert!(!client_side.verify(&request_sig, &["me@example.com", "challenge"]));
}
