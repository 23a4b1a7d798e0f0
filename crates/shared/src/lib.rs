pub mod domain;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod protocol;
