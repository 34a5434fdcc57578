//! RSA key pair used to sign and verify test JWTs.

/// PKCS#8 PEM private key for the fake service account.
pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/service_account_key.pem");

/// SPKI PEM public key matching [`PRIVATE_KEY_PEM`].
pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/service_account_key.pub.pem");

/// Private key prefixed with the banner line the cloud console adds to downloaded keys.
#[must_use]
pub fn private_key_with_banner() -> String {
    format!("PLEASE DO NOT REMOVE THIS LINE! Yandex.Cloud SA Key ID <ajetestkey>\n{PRIVATE_KEY_PEM}")
}
