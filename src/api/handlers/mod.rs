//! # HTTP Handlers
//!
//! هر handler یک async function هست که از extractor‌ها ورودی میگیره،
//! سرویس رو صدا میزنه و خطا رو به صورت `AppError` برمیگردونه.

pub mod link;
pub mod health;
