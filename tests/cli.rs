use assert_cmd::Command;
use base64::{Engine, engine::general_purpose::STANDARD};
use forgeseal::{PasswordCodec, ScryptParams};
use predicates::prelude::*;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("forgeseal"));
    cmd.env_remove("FORGESEAL_KEY")
        .env_remove("FORGESEAL_ALGORITHM")
        .env_remove("FORGESEAL_CONFIG")
        .env_remove("FORGESEAL_PASSWORD");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap().trim_end().to_string()
}

#[test]
fn encrypt_and_decrypt_roundtrip() {
    let ciphertext = stdout_of(
        bin()
            .env("FORGESEAL_KEY", "test-secret")
            .arg("encrypt")
            .arg("hello"),
    );

    bin()
        .env("FORGESEAL_KEY", "test-secret")
        .arg("decrypt")
        .arg(&ciphertext)
        .assert()
        .success()
        .stdout(predicate::str::diff("hello\n"));
}

#[test]
fn decrypt_with_different_key_fails() {
    let ciphertext = stdout_of(bin().arg("--key").arg("test-secret").arg("encrypt").arg("hello"));

    bin()
        .arg("--key")
        .arg("different-secret")
        .arg("decrypt")
        .arg(&ciphertext)
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong password or corrupted data"));
}

#[test]
fn encrypt_without_key_fails() {
    bin()
        .arg("encrypt")
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("encryption key is required"));
}

#[test]
fn decrypt_rejects_malformed_base64() {
    bin()
        .env("FORGESEAL_KEY", "k")
        .arg("decrypt")
        .arg("%%%")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed base64"));
}

#[test]
fn key_can_come_from_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("encryption.json");
    std::fs::write(&config, r#"{"key": "test-secret", "algorithm": "AES-256-GCM"}"#)
        .unwrap();

    let ciphertext = stdout_of(bin().arg("--config").arg(&config).arg("encrypt").arg("hello"));

    bin()
        .env("FORGESEAL_KEY", "test-secret")
        .arg("decrypt")
        .arg(&ciphertext)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn seal_and_unseal_roundtrip() {
    let sealed = stdout_of(
        bin()
            .env("FORGESEAL_PASSWORD", "pw")
            .arg("--scrypt-log-n")
            .arg("10")
            .arg("seal")
            .arg("backup"),
    );

    bin()
        .env("FORGESEAL_PASSWORD", "pw")
        .arg("--scrypt-log-n")
        .arg("10")
        .arg("unseal")
        .arg(&sealed)
        .assert()
        .success()
        .stdout(predicate::str::diff("backup\n"));
}

#[test]
fn seal_and_unseal_with_argon2id() {
    let sealed = stdout_of(
        bin()
            .env("FORGESEAL_PASSWORD", "pw")
            .arg("--password-kdf")
            .arg("argon2id")
            .arg("--argon-mem")
            .arg("1024")
            .arg("--argon-time")
            .arg("1")
            .arg("seal")
            .arg("backup"),
    );

    bin()
        .env("FORGESEAL_PASSWORD", "pw")
        .arg("--password-kdf")
        .arg("argon2id")
        .arg("--argon-mem")
        .arg("1024")
        .arg("--argon-time")
        .arg("1")
        .arg("unseal")
        .arg(&sealed)
        .assert()
        .success()
        .stdout(predicate::str::contains("backup"));

    // Same password, other KDF: the derived key differs.
    bin()
        .env("FORGESEAL_PASSWORD", "pw")
        .arg("--scrypt-log-n")
        .arg("10")
        .arg("unseal")
        .arg(&sealed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong password or corrupted data"));
}

#[test]
fn unseal_with_wrong_password_fails() {
    let sealed = stdout_of(
        bin()
            .env("FORGESEAL_PASSWORD", "pw")
            .arg("--scrypt-log-n")
            .arg("10")
            .arg("seal")
            .arg("backup"),
    );

    bin()
        .env("FORGESEAL_PASSWORD", "wrong_pw")
        .arg("--scrypt-log-n")
        .arg("10")
        .arg("unseal")
        .arg(&sealed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong password or corrupted data"));
}

#[test]
fn unseal_rejects_non_utf8_plaintext() {
    let codec = PasswordCodec::new(ScryptParams::new(10, 8, 1).unwrap());
    let envelope = codec.encrypt(&[b'o', b'k', 0xff, 0xfe], "pw").unwrap();

    bin()
        .env("FORGESEAL_PASSWORD", "pw")
        .arg("--scrypt-log-n")
        .arg("10")
        .arg("unseal")
        .arg(STANDARD.encode(envelope))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn unseal_short_input_fails() {
    bin()
        .env("FORGESEAL_PASSWORD", "pw")
        .arg("unseal")
        .arg("AAAA")
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));
}

#[test]
fn seal_with_invalid_argon2_parameters_fails() {
    bin()
        .env("FORGESEAL_PASSWORD", "pw")
        .arg("--password-kdf")
        .arg("argon2id")
        .arg("--argon-mem")
        .arg("16")
        .arg("--argon-parallelism")
        .arg("4")
        .arg("seal")
        .arg("backup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("argon2 memory cost"));
}

#[test]
fn hash_and_verify() {
    let record = stdout_of(bin().env("FORGESEAL_PASSWORD", "secret").arg("hash"));
    assert!(record.starts_with("$argon2id$"));

    bin()
        .env("FORGESEAL_PASSWORD", "secret")
        .arg("verify")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("password matches"));

    bin()
        .env("FORGESEAL_PASSWORD", "wrong")
        .arg("verify")
        .arg(&record)
        .assert()
        .failure()
        .stderr(predicate::str::contains("password does not match"));
}

#[test]
fn verify_malformed_record_fails() {
    bin()
        .env("FORGESEAL_PASSWORD", "secret")
        .arg("verify")
        .arg("not-a-valid-record")
        .assert()
        .failure()
        .stderr(predicate::str::contains("password does not match"));
}

#[test]
fn hash_from_piped_stdin_requires_confirmation() {
    bin()
        .arg("hash")
        .write_stdin("secret\nsecreT\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("passwords do not match"));

    bin()
        .arg("hash")
        .write_stdin("secret\nsecret\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$argon2id$"));
}

#[test]
fn token_has_requested_length() {
    let token = stdout_of(bin().arg("token").arg("--length").arg("32"));
    assert_eq!(token.len(), 43);
    assert!(
        token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );

    let other = stdout_of(bin().arg("token"));
    assert_ne!(token, other);
}

#[test]
fn oversized_token_fails() {
    bin()
        .arg("token")
        .arg("--length")
        .arg("1000000000000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 4096 bytes"));
}

#[test]
fn zero_length_token_fails() {
    bin()
        .arg("token")
        .arg("--length")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1 byte"));
}
