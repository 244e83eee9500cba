use ridegate::ridegate_core::{BcryptHasher, PasswordHasher};

fn hasher() -> BcryptHasher {
    BcryptHasher::new(4)
}

#[test]
fn test_hash_password_success() {
    let password = "testpassword123";
    let hash = hasher().hash(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
}

#[test]
fn test_verify_password_correct() {
    let hasher = hasher();
    let hash = hasher.hash("correctpassword").unwrap();

    assert!(hasher.verify("correctpassword", &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hasher = hasher();
    let hash = hasher.hash("correctpassword").unwrap();

    assert!(!hasher.verify("wrongpassword", &hash).unwrap());
}

#[test]
fn test_verify_password_invalid_hash() {
    assert!(hasher().verify("testpassword", "not_a_valid_bcrypt_hash").is_err());
}

#[test]
fn test_hash_generates_unique_hashes() {
    let hasher = hasher();
    let hash1 = hasher.hash("samepassword").unwrap();
    let hash2 = hasher.hash("samepassword").unwrap();

    assert_ne!(hash1, hash2);
    assert!(hasher.verify("samepassword", &hash1).unwrap());
    assert!(hasher.verify("samepassword", &hash2).unwrap());
}

#[test]
fn test_hash_unicode_characters() {
    let hasher = hasher();
    let password = "пароль密码🔒";
    let hash = hasher.hash(password).unwrap();

    assert!(hasher.verify(password, &hash).unwrap());
}

#[test]
fn test_cost_is_encoded_in_hash() {
    let hash = BcryptHasher::new(5).hash("password123").unwrap();
    assert!(hash.starts_with("$2b$05$"));
}

#[test]
fn test_hashes_verify_across_cost_factors() {
    let hash = BcryptHasher::new(6).hash("password123").unwrap();

    assert!(hasher().verify("password123", &hash).unwrap());
}
