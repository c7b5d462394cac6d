//! CLI境界向けのエラーユーティリティ。
//! ドメインの DomainError はそのまま Box<dyn Error> へ持ち上がる。

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub struct SimpleError(String);

impl fmt::Display for SimpleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for SimpleError {}

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

pub fn err(msg: impl Into<String>) -> Box<dyn Error + Send + Sync> {
    Box::new(SimpleError(msg.into()))
}

/// 文脈を前置してエラーを持ち上げる。
pub fn wrap(context: &str, cause: impl fmt::Display) -> Box<dyn Error + Send + Sync> {
    err(format!("{context}: {cause}"))
}
