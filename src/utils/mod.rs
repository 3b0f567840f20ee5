//! # ماژول توابع کمکی (Utilities)
//!
//! تولید کد کوتاه و نرمال‌سازی ورودی‌های اختیاری.

use rand::Rng;

// =====================================
// Constants
// =====================================
/// کاراکترهای مجاز برای کدهای تولیدی: حروف کوچک و اعداد (base-36)
pub const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// طول کدهای تولیدی
pub const CODE_LENGTH: usize = 6;

// =====================================
// Short Code Generation
// =====================================
/// تولید کد کوتاه تصادفی
///
/// هر کاراکتر مستقل و یکنواخت از `CODE_ALPHABET` انتخاب میشه.
/// یکتا بودن تضمین نمیشه؛ تصادم رو UNIQUE دیتابیس تشخیص میده.
///
/// # مثال
/// ```rust
/// use link_shortener::utils::{generate_code, CODE_LENGTH};
///
/// let code = generate_code();
/// assert_eq!(code.len(), CODE_LENGTH);
/// ```
#[must_use]
pub fn generate_code() -> String {
    generate_code_with(&mut rand::thread_rng())
}

/// تولید کد با یک RNG مشخص
#[must_use]
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// آیا این کد شکل کدهای تولیدی رو داره؟
#[must_use]
pub fn is_generated_shape(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}

// =====================================
// Input Normalisation
// =====================================
/// رشته خالی رو مثل مقدار نداشتن در نظر میگیره
///
/// # مثال
/// ```rust
/// use link_shortener::utils::non_empty;
///
/// assert_eq!(non_empty(Some(String::new())), None);
/// assert_eq!(non_empty(Some("a".to_string())), Some("a".to_string()));
/// ```
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
