//! Registration form demo built on `reform`.

pub mod form;
pub mod services;
