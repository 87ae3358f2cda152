//! Background input detection.

pub mod activation;

pub use activation::ActivationHook;
