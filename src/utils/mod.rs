//! Text utilities shared across modules

pub mod email_text;
