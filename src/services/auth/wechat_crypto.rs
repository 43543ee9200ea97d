//! 미니프로그램 사용자 데이터 서명 검증과 복호화
//!
//! # 서명
//!
//! `signature = sha1(html_entity_decode(rawData + session_key))` (소문자 hex)
//!
//! # 복호화
//!
//! AES-128-CBC / PKCS#7, 키는 base64 디코딩한 `session_key`, IV는 base64 디코딩한 `iv`.
//! 평문은 사용자 정보 JSON입니다.

use aes::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::domain::models::mini_program::DecryptedUserInfo;
use crate::errors::errors::AppError;

type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// `rawData`와 `session_key`로 기대 서명을 계산합니다.
pub fn sign_raw_data(raw_data: &str, session_key: &str) -> String {
    let joined = format!("{}{}", raw_data, session_key);
    let decoded = decode_html_special_chars(&joined);

    hex::encode(Sha1::digest(decoded.as_bytes()))
}

/// 클라이언트가 보낸 서명을 상수 시간으로 비교합니다.
pub fn verify_signature(raw_data: &str, session_key: &str, signature: &str) -> bool {
    let expected = sign_raw_data(raw_data, session_key);
    expected.as_bytes().ct_eq(signature.trim().as_bytes()).into()
}

/// `encryptedData`를 복호화하여 사용자 정보를 얻습니다.
///
/// # Errors
///
/// 다음 경우 모두 `DecryptionError`를 반환합니다.
///
/// * base64 형식 오류 또는 키/IV 길이 오류
/// * 패딩 오류 (키 불일치 포함)
/// * 평문이 사용자 정보 JSON이 아님
pub fn decrypt_user_info(
    session_key: &str,
    iv: &str,
    encrypted_data: &str,
) -> Result<DecryptedUserInfo, AppError> {
    let key = decode_base64(session_key, "session_key")?;
    let iv = decode_base64(iv, "iv")?;
    let mut buffer = decode_base64(encrypted_data, "encryptedData")?;

    let cipher = Aes128CbcDec::new_from_slices(&key, &iv)
        .map_err(|_| AppError::DecryptionError("session_key 또는 iv 길이가 올바르지 않습니다".to_string()))?;

    let plaintext = cipher
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|_| AppError::DecryptionError("암호화 데이터를 복호화할 수 없습니다".to_string()))?;

    serde_json::from_slice(plaintext)
        .map_err(|e| AppError::DecryptionError(format!("복호화된 사용자 정보 형식 오류: {}", e)))
}

fn decode_base64(value: &str, field: &str) -> Result<Vec<u8>, AppError> {
    STANDARD
        .decode(value.trim())
        .map_err(|_| AppError::DecryptionError(format!("{}가 올바른 base64가 아닙니다", field)))
}

/// `&amp;`, `&quot;`, `&#039;`, `&lt;`, `&gt;`를 원래 문자로 되돌립니다.
///
/// 한 번만 디코딩하므로 `&amp;lt;`는 `&lt;`가 됩니다.
pub fn decode_html_special_chars(input: &str) -> String {
    const ENTITIES: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&quot;", '"'),
        ("&#039;", '\''),
        ("&#39;", '\''),
        ("&lt;", '<'),
        ("&gt;", '>'),
    ];

    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(position) = rest.find('&') {
        output.push_str(&rest[..position]);
        rest = &rest[position..];

        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, replacement)) => {
                output.push(*replacement);
                rest = &rest[entity.len()..];
            }
            None => {
                output.push('&');
                rest = &rest[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// 테스트에서 클라이언트 쪽 암호화를 재현합니다.
#[cfg(test)]
pub fn encrypt_for_test(session_key: &str, iv: &str, plaintext: &str) -> String {
    use aes::cipher::BlockEncryptMut;

    type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

    let key = STANDARD.decode(session_key).unwrap();
    let iv = STANDARD.decode(iv).unwrap();

    let length = plaintext.len();
    let mut buffer = vec![0u8; length + 16];
    buffer[..length].copy_from_slice(plaintext.as_bytes());

    let ciphertext = Aes128CbcEnc::new_from_slices(&key, &iv)
        .unwrap()
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, length)
        .unwrap();

    STANDARD.encode(ciphertext)
}
