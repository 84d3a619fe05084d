pub mod client;

pub use client::GilgameshClient;
