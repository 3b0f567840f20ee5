//! # ماژول مدل‌ها (Domain Models)
//!
//! - **Entity**: داده‌ای که در دیتابیس ذخیره میشه (`link.rs`)
//! - **DTO**: برای ارسال/دریافت از API (`dto.rs`)

mod link;
mod dto;

pub use link::*;
pub use dto::*;
