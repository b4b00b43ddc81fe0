use forgeseal::{CryptoError, EncryptionConfig, EncryptionService};
use proptest::prelude::*;

fn service() -> EncryptionService {
    EncryptionService::new(&EncryptionConfig::new("proptest-secret")).unwrap()
}

proptest! {
    #[test]
    fn decrypt_inverts_encrypt(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let svc = service();
        let envelope = svc.encrypt(&data).unwrap();
        let plaintext = svc.decrypt(&envelope).unwrap();
        prop_assert_eq!(&*plaintext, &data);
    }

    #[test]
    fn string_api_inverts(text in ".{0,256}") {
        let svc = service();
        let encoded = svc.encrypt_string(&text).unwrap();
        let decoded = svc.decrypt_string(&encoded).unwrap();
        prop_assert_eq!(decoded.as_str(), text.as_str());
    }

    #[test]
    fn any_bit_flip_is_detected(
        data in proptest::collection::vec(any::<u8>(), 0..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let svc = service();
        let mut envelope = svc.encrypt(&data).unwrap();
        let i = position.index(envelope.len());
        envelope[i] ^= 1 << bit;

        prop_assert!(matches!(
            svc.decrypt(&envelope),
            Err(CryptoError::AuthenticationFailure)
        ));
    }

    #[test]
    fn truncated_envelopes_never_decrypt(
        data in proptest::collection::vec(any::<u8>(), 0..64),
        cut in any::<prop::sample::Index>(),
    ) {
        let svc = service();
        let envelope = svc.encrypt(&data).unwrap();
        let len = cut.index(envelope.len());

        prop_assert!(svc.decrypt(&envelope[..len]).is_err());
    }
}
