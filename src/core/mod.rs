// Core modules: SDK error model and the untagged-union decoder.
pub mod error;
pub mod union;
